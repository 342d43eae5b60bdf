//! Domain service for the progress ledger and the views derived from it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::entities::{tricks, user_progress};
use crate::services::achievement_service::AwardDto;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Trick not found: {0}")]
    TrickNotFound(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ProgressError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProgressError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkLearnedResult {
    pub message: String,
    /// False when the trick was already in the ledger.
    pub newly_learned: bool,
    pub new_achievements: Vec<AwardDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnedTrick {
    pub learned_at: DateTime<Utc>,
    pub trick: tricks::Model,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub total: i64,
    pub learned: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_tricks: i64,
    pub learned_tricks: i64,
    pub progress_percentage: f64,
    pub categories: BTreeMap<String, CategoryStats>,
}

/// Percentage rounded to one decimal; zero when there is nothing to learn.
#[must_use]
pub fn percentage(learned: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let raw = learned as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}

/// Folds per-category totals and learned counts into the stats view.
#[must_use]
pub fn build_stats(totals: &[(String, i64)], learned: &[(String, i64)]) -> UserStats {
    let learned_by_category: BTreeMap<&str, i64> =
        learned.iter().map(|(c, n)| (c.as_str(), *n)).collect();

    let categories: BTreeMap<String, CategoryStats> = totals
        .iter()
        .map(|(category, total)| {
            let learned = learned_by_category
                .get(category.as_str())
                .copied()
                .unwrap_or(0);
            (
                category.clone(),
                CategoryStats {
                    total: *total,
                    learned,
                    percentage: percentage(learned, *total),
                },
            )
        })
        .collect();

    let total_tricks = totals.iter().map(|(_, n)| n).sum();
    let learned_tricks = learned.iter().map(|(_, n)| n).sum();

    UserStats {
        total_tricks,
        learned_tricks,
        progress_percentage: percentage(learned_tricks, total_tricks),
        categories,
    }
}

#[async_trait::async_trait]
pub trait ProgressService: Send + Sync {
    /// Records the trick as learned and, when it is new, re-evaluates the
    /// user's achievements. Marking twice is a no-op that awards nothing.
    async fn mark_learned(
        &self,
        user_id: i32,
        trick_id: i32,
    ) -> Result<MarkLearnedResult, ProgressError>;

    async fn list_progress(&self, user_id: i32)
    -> Result<Vec<user_progress::Model>, ProgressError>;

    /// Newest first.
    async fn learned_tricks(&self, user_id: i32) -> Result<Vec<LearnedTrick>, ProgressError>;

    async fn user_stats(&self, user_id: i32) -> Result<UserStats, ProgressError>;
}
