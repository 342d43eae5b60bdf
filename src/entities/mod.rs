pub mod prelude;

pub mod achievements;
pub mod trick_suggestions;
pub mod tricks;
pub mod user_achievements;
pub mod user_progress;
pub mod users;
