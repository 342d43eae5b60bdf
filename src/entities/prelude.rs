pub use super::achievements::Entity as Achievements;
pub use super::trick_suggestions::Entity as TrickSuggestions;
pub use super::tricks::Entity as Tricks;
pub use super::user_achievements::Entity as UserAchievements;
pub use super::user_progress::Entity as UserProgress;
pub use super::users::Entity as Users;
