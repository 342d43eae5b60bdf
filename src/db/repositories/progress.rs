use crate::entities::{prelude::*, tricks, user_progress};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

/// Repository for the append-only progress ledger.
pub struct ProgressRepository {
    conn: DatabaseConnection,
}

impl ProgressRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the (user, trick) pair. Returns `false` when it was already
    /// recorded, including when a concurrent request won the race.
    pub async fn record_learned(
        &self,
        user_id: i32,
        trick_id: i32,
        learned_at: DateTime<Utc>,
    ) -> Result<bool> {
        let active_model = user_progress::ActiveModel {
            user_id: Set(user_id),
            trick_id: Set(trick_id),
            learned_at: Set(learned_at),
            ..Default::default()
        };

        let inserted = UserProgress::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    user_progress::Column::UserId,
                    user_progress::Column::TrickId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to record learned trick")?;

        Ok(inserted > 0)
    }

    pub async fn count_learned(&self, user_id: i32) -> Result<u64> {
        let count = UserProgress::find()
            .filter(user_progress::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn count_learned_in_category(&self, user_id: i32, category: &str) -> Result<u64> {
        let count = UserProgress::find()
            .join(JoinType::InnerJoin, user_progress::Relation::Trick.def())
            .filter(user_progress::Column::UserId.eq(user_id))
            .filter(tricks::Column::Category.eq(category))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Distinct UTC dates with at least one learned trick, newest first.
    pub async fn distinct_learned_dates(&self, user_id: i32) -> Result<Vec<NaiveDate>> {
        let stamps: Vec<DateTime<Utc>> = UserProgress::find()
            .select_only()
            .column(user_progress::Column::LearnedAt)
            .filter(user_progress::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to load progress dates")?;

        let mut dates: Vec<NaiveDate> = stamps.iter().map(DateTime::date_naive).collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();

        Ok(dates)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<user_progress::Model>> {
        let rows = UserProgress::find()
            .filter(user_progress::Column::UserId.eq(user_id))
            .order_by_asc(user_progress::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Learned tricks with their progress timestamp, newest first.
    pub async fn learned_tricks(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_progress::Model, tricks::Model)>> {
        let rows = UserProgress::find()
            .find_also_related(Tricks)
            .filter(user_progress::Column::UserId.eq(user_id))
            .order_by_desc(user_progress::Column::LearnedAt)
            .order_by_desc(user_progress::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load learned tricks")?;

        Ok(rows
            .into_iter()
            .filter_map(|(progress, trick)| trick.map(|t| (progress, t)))
            .collect())
    }

    /// Learned trick count per category for one user.
    pub async fn learned_per_category(&self, user_id: i32) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = UserProgress::find()
            .select_only()
            .column(tricks::Column::Category)
            .column_as(user_progress::Column::Id.count(), "learned")
            .join(JoinType::InnerJoin, user_progress::Relation::Trick.def())
            .filter(user_progress::Column::UserId.eq(user_id))
            .group_by(tricks::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count learned tricks per category")?;

        Ok(rows)
    }
}
