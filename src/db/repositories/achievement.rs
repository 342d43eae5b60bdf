use crate::achievements::{DefaultAchievement, condition::category_payload};
use crate::domain::AchievementKind;
use crate::entities::{achievements, prelude::*, user_achievements};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use std::collections::HashSet;

/// Fields of an achievement definition created by an administrator.
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub kind: AchievementKind,
    pub condition_type: String,
    pub condition_value: Option<i32>,
    pub condition_data: Option<String>,
    pub points: i32,
    pub badge_color: String,
    pub is_active: bool,
}

impl From<&DefaultAchievement> for NewAchievement {
    fn from(d: &DefaultAchievement) -> Self {
        Self {
            name: d.name.to_string(),
            description: d.description.to_string(),
            icon: Some(d.icon.to_string()),
            kind: d.kind,
            condition_type: d.condition_type.to_string(),
            condition_value: d.condition_value,
            condition_data: d.category.map(category_payload),
            points: d.points,
            badge_color: d.badge_color.to_string(),
            is_active: true,
        }
    }
}

impl NewAchievement {
    fn into_active_model(self, now: DateTime<Utc>) -> achievements::ActiveModel {
        achievements::ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            icon: Set(self.icon),
            kind: Set(self.kind),
            condition_type: Set(self.condition_type),
            condition_value: Set(self.condition_value),
            condition_data: Set(self.condition_data),
            points: Set(self.points),
            badge_color: Set(self.badge_color),
            created_at: Set(now),
            is_active: Set(self.is_active),
            ..Default::default()
        }
    }
}

/// Leaderboard line before ranking.
#[derive(Debug, Clone, FromQueryResult)]
pub struct LeaderboardRow {
    pub user_id: i32,
    pub username: String,
    pub total_points: i64,
    pub achievements_count: i64,
}

const LEADERBOARD_SQL: &str = r"
SELECT u.id AS user_id,
       u.username AS username,
       COALESCE(SUM(a.points), 0) AS total_points,
       COUNT(ua.id) AS achievements_count
FROM users u
LEFT JOIN user_achievements ua ON ua.user_id = u.id
LEFT JOIN achievements a ON a.id = ua.achievement_id
GROUP BY u.id, u.username
ORDER BY total_points DESC, u.id ASC
LIMIT ?
";

pub struct AchievementRepository {
    conn: DatabaseConnection,
}

impl AchievementRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts each definition whose name is not taken yet. Existing rows,
    /// whatever their content, are left alone. Returns the number inserted.
    pub async fn seed(&self, defaults: &[DefaultAchievement]) -> Result<u64> {
        let now = Utc::now();
        let mut inserted = 0;

        for default in defaults {
            let active_model = NewAchievement::from(default).into_active_model(now);
            inserted += Achievements::insert(active_model)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::column(achievements::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await
                .with_context(|| format!("Failed to seed achievement '{}'", default.name))?;
        }

        Ok(inserted)
    }

    pub async fn list_active(&self) -> Result<Vec<achievements::Model>> {
        let rows = Achievements::find()
            .filter(achievements::Column::IsActive.eq(true))
            .order_by_asc(achievements::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list achievements")?;

        Ok(rows)
    }

    /// Returns `None` when the name is already used.
    pub async fn create(&self, achievement: NewAchievement) -> Result<Option<achievements::Model>> {
        let name = achievement.name.clone();
        let inserted = Achievements::insert(achievement.into_active_model(Utc::now()))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(achievements::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert achievement")?;

        if inserted == 0 {
            return Ok(None);
        }

        let model = Achievements::find()
            .filter(achievements::Column::Name.eq(name))
            .one(&self.conn)
            .await?;

        Ok(model)
    }

    pub async fn earned_ids(&self, user_id: i32) -> Result<HashSet<i32>> {
        let ids: Vec<i32> = UserAchievements::find()
            .select_only()
            .column(user_achievements::Column::AchievementId)
            .filter(user_achievements::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to load earned achievements")?;

        Ok(ids.into_iter().collect())
    }

    /// Stores all awards in one transaction and reports which ids were new.
    /// A pair that already exists is skipped rather than failing the batch.
    pub async fn record_awards(
        &self,
        user_id: i32,
        achievement_ids: &[i32],
        earned_at: DateTime<Utc>,
    ) -> Result<Vec<i32>> {
        let txn = self.conn.begin().await?;
        let mut inserted = Vec::with_capacity(achievement_ids.len());

        for &achievement_id in achievement_ids {
            let active_model = user_achievements::ActiveModel {
                user_id: Set(user_id),
                achievement_id: Set(achievement_id),
                earned_at: Set(earned_at),
                ..Default::default()
            };

            let rows = UserAchievements::insert(active_model)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::columns([
                        user_achievements::Column::UserId,
                        user_achievements::Column::AchievementId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .context("Failed to record achievement award")?;

            if rows > 0 {
                inserted.push(achievement_id);
            }
        }

        txn.commit().await.context("Failed to commit awards")?;
        Ok(inserted)
    }

    /// Earned awards with their definitions, most recent first.
    pub async fn earned_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_achievements::Model, achievements::Model)>> {
        let rows = UserAchievements::find()
            .find_also_related(Achievements)
            .filter(user_achievements::Column::UserId.eq(user_id))
            .order_by_desc(user_achievements::Column::EarnedAt)
            .order_by_desc(user_achievements::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load user achievements")?;

        Ok(rows
            .into_iter()
            .filter_map(|(award, definition)| definition.map(|d| (award, d)))
            .collect())
    }

    /// Every user with point total and award count, best first. Equal totals
    /// are ordered by user id.
    pub async fn leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardRow>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            LEADERBOARD_SQL,
            [limit.into()],
        );

        let rows = LeaderboardRow::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to compute leaderboard")?;

        Ok(rows)
    }

    pub async fn count_definitions(&self) -> Result<u64> {
        Ok(Achievements::find().count(&self.conn).await?)
    }
}
