use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::entities::achievements;

use super::condition::Condition;
use super::streak::daily_streak;

/// Storage the engine evaluates against.
///
/// Reads may run outside a transaction. [`record_awards`](Self::record_awards)
/// must be atomic: either every new award of the batch is stored or none is.
#[async_trait]
pub trait AchievementLedger: Send + Sync {
    async fn user_exists(&self, user_id: i32) -> Result<bool>;

    async fn active_definitions(&self) -> Result<Vec<achievements::Model>>;

    async fn earned_achievement_ids(&self, user_id: i32) -> Result<HashSet<i32>>;

    async fn count_learned(&self, user_id: i32) -> Result<u64>;

    async fn count_learned_in_category(&self, user_id: i32, category: &str) -> Result<u64>;

    async fn count_tricks_in_category(&self, category: &str) -> Result<u64>;

    /// Distinct UTC calendar dates on which the user learned a trick.
    async fn distinct_learned_dates(&self, user_id: i32) -> Result<Vec<NaiveDate>>;

    async fn count_suggested(&self, user_id: i32) -> Result<u64>;

    /// Stores the awards in one transaction and returns the achievement ids
    /// that were actually inserted. Pairs that already exist (a concurrent
    /// evaluation got there first) are skipped without error.
    async fn record_awards(
        &self,
        user_id: i32,
        achievement_ids: &[i32],
        earned_at: DateTime<Utc>,
    ) -> Result<Vec<i32>>;
}

pub struct AchievementEngine<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L: AchievementLedger + ?Sized> AchievementEngine<'a, L> {
    #[must_use]
    pub const fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn is_satisfied(
        &self,
        user_id: i32,
        condition: &Condition,
        today: NaiveDate,
    ) -> Result<bool> {
        let satisfied = match condition {
            Condition::TricksLearned(threshold) => {
                to_i64(self.ledger.count_learned(user_id).await?) >= *threshold
            }
            Condition::CategoryMastered(category) => {
                let total = self.ledger.count_tricks_in_category(category).await?;
                if total == 0 {
                    false
                } else {
                    self.ledger
                        .count_learned_in_category(user_id, category)
                        .await?
                        == total
                }
            }
            Condition::DailyStreak(threshold) => {
                let dates = self.ledger.distinct_learned_dates(user_id).await?;
                i64::from(daily_streak(&dates, today)) >= *threshold
            }
            Condition::TricksSuggested(threshold) => {
                to_i64(self.ledger.count_suggested(user_id).await?) >= *threshold
            }
            Condition::Unrecognized(_) => false,
        };

        Ok(satisfied)
    }

    /// Awards every active, not yet earned achievement whose condition now
    /// holds and returns the definitions that were newly awarded.
    ///
    /// Unknown users get an empty list. Calling this repeatedly, or
    /// concurrently for the same user, never awards anything twice.
    pub async fn check(&self, user_id: i32, now: DateTime<Utc>) -> Result<Vec<achievements::Model>> {
        if !self.ledger.user_exists(user_id).await? {
            debug!(user_id, "Achievement check skipped: unknown user");
            return Ok(Vec::new());
        }

        let definitions = self.ledger.active_definitions().await?;
        let earned = self.ledger.earned_achievement_ids(user_id).await?;
        let today = now.date_naive();

        let mut pending = Vec::new();
        for definition in definitions {
            if earned.contains(&definition.id) {
                continue;
            }

            let condition = Condition::parse(
                &definition.condition_type,
                definition.condition_value,
                definition.condition_data.as_deref(),
            );

            if !condition.is_recognized() {
                debug!(
                    achievement = %definition.name,
                    condition_type = %definition.condition_type,
                    "Skipping achievement with unrecognized condition"
                );
                continue;
            }

            if self.is_satisfied(user_id, &condition, today).await? {
                pending.push(definition);
            }
        }

        if pending.is_empty() {
            return Ok(pending);
        }

        let ids: Vec<i32> = pending.iter().map(|d| d.id).collect();
        let inserted: HashSet<i32> = self
            .ledger
            .record_awards(user_id, &ids, now)
            .await?
            .into_iter()
            .collect();

        pending.retain(|d| inserted.contains(&d.id));

        if !pending.is_empty() {
            info!(
                user_id,
                count = pending.len(),
                names = ?pending.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
                "Achievements awarded"
            );
        }

        Ok(pending)
    }
}

fn to_i64(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
