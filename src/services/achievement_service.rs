//! Domain service for achievements, awards and the leaderboard.
//!
//! Evaluation itself lives in [`crate::achievements::AchievementEngine`]; this
//! service wires the engine to the store and shapes results for callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::{LeaderboardRow, NewAchievement};
use crate::entities::achievements;

#[derive(Debug, Error)]
pub enum AchievementError {
    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Achievement '{0}' already exists")]
    DuplicateName(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AchievementError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AchievementError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Compact form of a newly awarded achievement, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwardDto {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub points: i32,
}

impl From<&achievements::Model> for AwardDto {
    fn from(model: &achievements::Model) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            icon: model.icon.clone(),
            points: model.points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EarnedAchievement {
    pub id: i32,
    pub earned_at: DateTime<Utc>,
    pub achievement: achievements::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAchievementSummary {
    pub total_points: i64,
    pub achievements_count: usize,
    /// Most recent first.
    pub achievements: Vec<EarnedAchievement>,
    pub recent_achievements: Vec<EarnedAchievement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i32,
    pub username: String,
    pub total_points: i64,
    pub achievements_count: i64,
    /// 1-based position.
    pub rank: usize,
}

/// Ranks rows already sorted best first.
#[must_use]
pub fn rank_rows(rows: Vec<LeaderboardRow>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| LeaderboardEntry {
            user_id: row.user_id,
            username: row.username,
            total_points: row.total_points,
            achievements_count: row.achievements_count,
            rank: idx + 1,
        })
        .collect()
}

#[async_trait::async_trait]
pub trait AchievementService: Send + Sync {
    /// Inserts the built-in definitions that are missing. Returns how many
    /// were inserted; running it again inserts nothing.
    async fn seed_defaults(&self) -> Result<u64, AchievementError>;

    /// Evaluates every pending definition for the user and returns the newly
    /// awarded ones. Unknown users yield an empty list.
    async fn check(&self, user_id: i32) -> Result<Vec<achievements::Model>, AchievementError>;

    async fn user_summary(&self, user_id: i32) -> Result<UserAchievementSummary, AchievementError>;

    async fn leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardEntry>, AchievementError>;

    async fn list_active(&self) -> Result<Vec<achievements::Model>, AchievementError>;

    /// # Errors
    ///
    /// Returns [`AchievementError::DuplicateName`] if the name is taken.
    async fn create(
        &self,
        achievement: NewAchievement,
    ) -> Result<achievements::Model, AchievementError>;
}
