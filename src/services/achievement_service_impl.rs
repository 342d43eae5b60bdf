//! `SeaORM` implementation of the `AchievementService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::achievements::{AchievementEngine, Condition, DEFAULT_ACHIEVEMENTS};
use crate::db::{NewAchievement, Store};
use crate::entities::achievements;
use crate::services::achievement_service::{
    AchievementError, AchievementService, EarnedAchievement, LeaderboardEntry,
    UserAchievementSummary, rank_rows,
};

const RECENT_COUNT: usize = 5;

pub struct SeaOrmAchievementService {
    store: Store,
}

impl SeaOrmAchievementService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AchievementService for SeaOrmAchievementService {
    async fn seed_defaults(&self) -> Result<u64, AchievementError> {
        let inserted = self.store.seed_achievements(DEFAULT_ACHIEVEMENTS).await?;
        if inserted > 0 {
            info!(inserted, "Seeded default achievements");
        }
        Ok(inserted)
    }

    async fn check(&self, user_id: i32) -> Result<Vec<achievements::Model>, AchievementError> {
        let engine = AchievementEngine::new(&self.store);
        let awarded = engine.check(user_id, Utc::now()).await?;

        if !awarded.is_empty() {
            metrics::counter!("achievements_awarded_total").increment(awarded.len() as u64);
        }

        Ok(awarded)
    }

    async fn user_summary(&self, user_id: i32) -> Result<UserAchievementSummary, AchievementError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AchievementError::UserNotFound(user_id));
        }

        let earned: Vec<EarnedAchievement> = self
            .store
            .user_awards(user_id)
            .await?
            .into_iter()
            .map(|(award, achievement)| EarnedAchievement {
                id: award.id,
                earned_at: award.earned_at,
                achievement,
            })
            .collect();

        let total_points = earned
            .iter()
            .map(|e| i64::from(e.achievement.points))
            .sum();

        Ok(UserAchievementSummary {
            total_points,
            achievements_count: earned.len(),
            recent_achievements: earned.iter().take(RECENT_COUNT).cloned().collect(),
            achievements: earned,
        })
    }

    async fn leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardEntry>, AchievementError> {
        let rows = self.store.leaderboard(limit).await?;
        Ok(rank_rows(rows))
    }

    async fn list_active(&self) -> Result<Vec<achievements::Model>, AchievementError> {
        Ok(self.store.list_active_achievements().await?)
    }

    async fn create(
        &self,
        achievement: NewAchievement,
    ) -> Result<achievements::Model, AchievementError> {
        if achievement.name.trim().is_empty() {
            return Err(AchievementError::Validation(
                "Achievement name is required".to_string(),
            ));
        }

        let condition = Condition::parse(
            &achievement.condition_type,
            achievement.condition_value,
            achievement.condition_data.as_deref(),
        );
        if !condition.is_recognized() {
            // Stored anyway; it simply never unlocks until the data is fixed.
            warn!(
                name = %achievement.name,
                condition_type = %achievement.condition_type,
                "Creating achievement with an unrecognized condition"
            );
        }

        let name = achievement.name.clone();
        let created = self
            .store
            .create_achievement(achievement)
            .await?
            .ok_or(AchievementError::DuplicateName(name))?;

        info!(achievement_id = created.id, name = %created.name, "Achievement created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::LeaderboardRow;
    use crate::services::achievement_service::rank_rows;

    fn row(user_id: i32, username: &str, total_points: i64) -> LeaderboardRow {
        LeaderboardRow {
            user_id,
            username: username.to_string(),
            total_points,
            achievements_count: total_points / 50,
        }
    }

    #[test]
    fn ranks_are_one_based_in_row_order() {
        let ranked = rank_rows(vec![row(2, "b", 300), row(1, "a", 150), row(3, "c", 0)]);

        let view: Vec<(&str, usize)> = ranked.iter().map(|e| (e.username.as_str(), e.rank)).collect();
        assert_eq!(view, vec![("b", 1), ("a", 2), ("c", 3)]);
        assert_eq!(ranked[2].total_points, 0);
    }

    #[test]
    fn empty_leaderboard() {
        assert!(rank_rows(Vec::new()).is_empty());
    }
}
