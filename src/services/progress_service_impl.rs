//! `SeaORM` implementation of the `ProgressService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::achievements::AchievementEngine;
use crate::db::Store;
use crate::entities::user_progress;
use crate::services::achievement_service::AwardDto;
use crate::services::progress_service::{
    LearnedTrick, MarkLearnedResult, ProgressError, ProgressService, UserStats, build_stats,
};

pub struct SeaOrmProgressService {
    store: Store,
}

impl SeaOrmProgressService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_user(&self, user_id: i32) -> Result<(), ProgressError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(ProgressError::UserNotFound(user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressService for SeaOrmProgressService {
    async fn mark_learned(
        &self,
        user_id: i32,
        trick_id: i32,
    ) -> Result<MarkLearnedResult, ProgressError> {
        self.ensure_user(user_id).await?;
        if self.store.get_trick(trick_id).await?.is_none() {
            return Err(ProgressError::TrickNotFound(trick_id));
        }

        let now = Utc::now();
        let newly_learned = self.store.record_learned(user_id, trick_id, now).await?;

        if !newly_learned {
            return Ok(MarkLearnedResult {
                message: "Trick already marked as learned".to_string(),
                newly_learned: false,
                new_achievements: Vec::new(),
            });
        }

        metrics::counter!("tricks_learned_total").increment(1);

        let awarded = AchievementEngine::new(&self.store)
            .check(user_id, now)
            .await?;
        if !awarded.is_empty() {
            metrics::counter!("achievements_awarded_total").increment(awarded.len() as u64);
        }

        info!(user_id, trick_id, awards = awarded.len(), "Trick marked as learned");

        Ok(MarkLearnedResult {
            message: "Trick marked as learned".to_string(),
            newly_learned: true,
            new_achievements: awarded.iter().map(AwardDto::from).collect(),
        })
    }

    async fn list_progress(
        &self,
        user_id: i32,
    ) -> Result<Vec<user_progress::Model>, ProgressError> {
        self.ensure_user(user_id).await?;
        Ok(self.store.list_progress(user_id).await?)
    }

    async fn learned_tricks(&self, user_id: i32) -> Result<Vec<LearnedTrick>, ProgressError> {
        self.ensure_user(user_id).await?;

        let rows = self.store.learned_tricks(user_id).await?;
        Ok(rows
            .into_iter()
            .map(|(progress, trick)| LearnedTrick {
                learned_at: progress.learned_at,
                trick,
            })
            .collect())
    }

    async fn user_stats(&self, user_id: i32) -> Result<UserStats, ProgressError> {
        self.ensure_user(user_id).await?;

        let totals = self.store.trick_category_totals().await?;
        let learned = self.store.learned_per_category(user_id).await?;
        Ok(build_stats(&totals, &learned))
    }
}

#[cfg(test)]
mod tests {
    use crate::services::progress_service::{build_stats, percentage};

    fn pairs(items: &[(&str, i64)]) -> Vec<(String, i64)> {
        items.iter().map(|(c, n)| ((*c).to_string(), *n)).collect()
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert!((percentage(1, 3) - 33.3).abs() < f64::EPSILON);
        assert!((percentage(2, 3) - 66.7).abs() < f64::EPSILON);
        assert!((percentage(4, 4) - 100.0).abs() < f64::EPSILON);
        assert!(percentage(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_include_untouched_categories() {
        let stats = build_stats(
            &pairs(&[("grabs", 4), ("spins", 2)]),
            &pairs(&[("spins", 1)]),
        );

        assert_eq!(stats.total_tricks, 6);
        assert_eq!(stats.learned_tricks, 1);
        assert!((stats.progress_percentage - 16.7).abs() < f64::EPSILON);

        assert_eq!(stats.categories["grabs"].learned, 0);
        assert_eq!(stats.categories["spins"].learned, 1);
        assert!((stats.categories["spins"].percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_catalog_has_zero_progress() {
        let stats = build_stats(&[], &[]);
        assert_eq!(stats.total_tricks, 0);
        assert!(stats.categories.is_empty());
        assert!(stats.progress_percentage.abs() < f64::EPSILON);
    }
}
