use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::achievements::{AchievementLedger, DefaultAchievement};
use crate::config::SecurityConfig;
use crate::domain::SuggestionStatus;
use crate::entities::{achievements, trick_suggestions, tricks, user_achievements, user_progress};

pub mod migrator;
pub mod repositories;

pub use repositories::achievement::{LeaderboardRow, NewAchievement};
pub use repositories::suggestion::{Moderation, SuggestionWithUsers};
pub use repositories::trick::NewTrick;
pub use repositories::user::{NewUser, User, UserUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn trick_repo(&self) -> repositories::trick::TrickRepository {
        repositories::trick::TrickRepository::new(self.conn.clone())
    }

    fn progress_repo(&self) -> repositories::progress::ProgressRepository {
        repositories::progress::ProgressRepository::new(self.conn.clone())
    }

    fn suggestion_repo(&self) -> repositories::suggestion::SuggestionRepository {
        repositories::suggestion::SuggestionRepository::new(self.conn.clone())
    }

    fn achievement_repo(&self) -> repositories::achievement::AchievementRepository {
        repositories::achievement::AchievementRepository::new(self.conn.clone())
    }

    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn list_tricks(&self, category: Option<&str>) -> Result<Vec<tricks::Model>> {
        self.trick_repo().list(category).await
    }

    pub async fn get_trick(&self, id: i32) -> Result<Option<tricks::Model>> {
        self.trick_repo().get(id).await
    }

    pub async fn trick_categories(&self) -> Result<Vec<String>> {
        self.trick_repo().categories().await
    }

    pub async fn count_tricks(&self) -> Result<u64> {
        self.trick_repo().count().await
    }

    pub async fn trick_category_totals(&self) -> Result<Vec<(String, i64)>> {
        self.trick_repo().category_totals().await
    }

    pub async fn create_trick(&self, trick: NewTrick) -> Result<tricks::Model> {
        self.trick_repo().create(trick).await
    }

    pub async fn import_tricks(&self, tricks: Vec<NewTrick>) -> Result<usize> {
        self.trick_repo().insert_many(tricks).await
    }

    pub async fn update_trick(&self, id: i32, trick: NewTrick) -> Result<Option<tricks::Model>> {
        self.trick_repo().update(id, trick).await
    }

    pub async fn delete_trick(&self, id: i32) -> Result<bool> {
        self.trick_repo().delete(id).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn create_user(&self, user: NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, config).await
    }

    pub async fn is_username_or_email_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except_id: Option<i32>,
    ) -> Result<bool> {
        self.user_repo().is_taken(username, email, except_id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn check_user_password(&self, id: i32, password: &str) -> Result<bool> {
        self.user_repo().check_password(id, password).await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo().update_password(id, new_password, config).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, id: i32) -> Result<String> {
        self.user_repo().regenerate_api_key(id).await
    }

    pub async fn update_user(&self, id: i32, update: UserUpdate) -> Result<Option<User>> {
        self.user_repo().update(id, update).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn ensure_default_admin(&self, config: &SecurityConfig) -> Result<Option<User>> {
        self.user_repo().ensure_default_admin(config).await
    }

    // ========================================================================
    // Progress
    // ========================================================================

    pub async fn record_learned(
        &self,
        user_id: i32,
        trick_id: i32,
        learned_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.progress_repo()
            .record_learned(user_id, trick_id, learned_at)
            .await
    }

    pub async fn list_progress(&self, user_id: i32) -> Result<Vec<user_progress::Model>> {
        self.progress_repo().list_for_user(user_id).await
    }

    pub async fn learned_tricks(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_progress::Model, tricks::Model)>> {
        self.progress_repo().learned_tricks(user_id).await
    }

    pub async fn learned_per_category(&self, user_id: i32) -> Result<Vec<(String, i64)>> {
        self.progress_repo().learned_per_category(user_id).await
    }

    // ========================================================================
    // Suggestions
    // ========================================================================

    pub async fn create_suggestion(
        &self,
        user_id: i32,
        trick: NewTrick,
    ) -> Result<trick_suggestions::Model> {
        self.suggestion_repo().create(user_id, trick).await
    }

    pub async fn get_suggestion(&self, id: i32) -> Result<Option<trick_suggestions::Model>> {
        self.suggestion_repo().get(id).await
    }

    pub async fn list_suggestions(
        &self,
        status: Option<SuggestionStatus>,
    ) -> Result<Vec<SuggestionWithUsers>> {
        self.suggestion_repo().list(status).await
    }

    pub async fn list_user_suggestions(
        &self,
        user_id: i32,
    ) -> Result<Vec<trick_suggestions::Model>> {
        self.suggestion_repo().list_for_user(user_id).await
    }

    pub async fn moderate_suggestion(
        &self,
        id: i32,
        moderator_id: i32,
        status: SuggestionStatus,
        comment: Option<String>,
    ) -> Result<Moderation> {
        self.suggestion_repo()
            .moderate(id, moderator_id, status, comment)
            .await
    }

    pub async fn delete_suggestion(&self, id: i32) -> Result<bool> {
        self.suggestion_repo().delete(id).await
    }

    // ========================================================================
    // Achievements
    // ========================================================================

    pub async fn seed_achievements(&self, defaults: &[DefaultAchievement]) -> Result<u64> {
        self.achievement_repo().seed(defaults).await
    }

    pub async fn list_active_achievements(&self) -> Result<Vec<achievements::Model>> {
        self.achievement_repo().list_active().await
    }

    pub async fn create_achievement(
        &self,
        achievement: NewAchievement,
    ) -> Result<Option<achievements::Model>> {
        self.achievement_repo().create(achievement).await
    }

    pub async fn count_achievement_definitions(&self) -> Result<u64> {
        self.achievement_repo().count_definitions().await
    }

    pub async fn user_awards(
        &self,
        user_id: i32,
    ) -> Result<Vec<(user_achievements::Model, achievements::Model)>> {
        self.achievement_repo().earned_by_user(user_id).await
    }

    pub async fn leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardRow>> {
        self.achievement_repo().leaderboard(limit).await
    }
}

#[async_trait]
impl AchievementLedger for Store {
    async fn user_exists(&self, user_id: i32) -> Result<bool> {
        self.user_repo().exists(user_id).await
    }

    async fn active_definitions(&self) -> Result<Vec<achievements::Model>> {
        self.achievement_repo().list_active().await
    }

    async fn earned_achievement_ids(&self, user_id: i32) -> Result<HashSet<i32>> {
        self.achievement_repo().earned_ids(user_id).await
    }

    async fn count_learned(&self, user_id: i32) -> Result<u64> {
        self.progress_repo().count_learned(user_id).await
    }

    async fn count_learned_in_category(&self, user_id: i32, category: &str) -> Result<u64> {
        self.progress_repo()
            .count_learned_in_category(user_id, category)
            .await
    }

    async fn count_tricks_in_category(&self, category: &str) -> Result<u64> {
        self.trick_repo().count_in_category(category).await
    }

    async fn distinct_learned_dates(&self, user_id: i32) -> Result<Vec<NaiveDate>> {
        self.progress_repo().distinct_learned_dates(user_id).await
    }

    async fn count_suggested(&self, user_id: i32) -> Result<u64> {
        self.suggestion_repo().count_by_user(user_id).await
    }

    async fn record_awards(
        &self,
        user_id: i32,
        achievement_ids: &[i32],
        earned_at: DateTime<Utc>,
    ) -> Result<Vec<i32>> {
        self.achievement_repo()
            .record_awards(user_id, achievement_ids, earned_at)
            .await
    }
}
