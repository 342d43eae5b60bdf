pub mod image;
pub use image::{ImageService, StoredImage, UploadError};

pub mod achievement_service;
pub mod achievement_service_impl;
pub use achievement_service::{
    AchievementError, AchievementService, AwardDto, EarnedAchievement, LeaderboardEntry,
    UserAchievementSummary,
};
pub use achievement_service_impl::SeaOrmAchievementService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, QuizQuestion};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod progress_service;
pub mod progress_service_impl;
pub use progress_service::{
    CategoryStats, LearnedTrick, MarkLearnedResult, ProgressError, ProgressService, UserStats,
};
pub use progress_service_impl::SeaOrmProgressService;

pub mod suggestion_service;
pub mod suggestion_service_impl;
pub use suggestion_service::{
    ModerationResult, SuggestionDto, SuggestionError, SuggestionService, UserSummary,
};
pub use suggestion_service_impl::SeaOrmSuggestionService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
