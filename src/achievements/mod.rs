//! Achievement evaluation.
//!
//! Definitions are decoded into a closed [`Condition`] set and evaluated
//! against an [`AchievementLedger`], the storage seam the engine reads
//! progress from and writes awards to.

pub mod condition;
pub mod defaults;
pub mod engine;
pub mod streak;

pub use condition::Condition;
pub use defaults::{DEFAULT_ACHIEVEMENTS, DefaultAchievement};
pub use engine::{AchievementEngine, AchievementLedger};
pub use streak::daily_streak;
