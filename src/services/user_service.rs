//! Domain service for account administration and public profiles.

use thiserror::Error;

use crate::db::UserUpdate;
use crate::services::auth_service::UserInfo;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Username or email already in use")]
    Conflict,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn get_profile(&self, user_id: i32) -> Result<UserInfo, UserError>;

    async fn list(&self) -> Result<Vec<UserInfo>, UserError>;

    /// Applies the fields that are set. Username and email stay unique.
    async fn update(&self, user_id: i32, update: UserUpdate) -> Result<UserInfo, UserError>;

    /// Administrators cannot delete their own account.
    async fn delete(&self, user_id: i32, actor_id: i32) -> Result<(), UserError>;
}
