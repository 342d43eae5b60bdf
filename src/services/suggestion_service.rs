//! Domain service for user-submitted trick suggestions and their moderation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{NewTrick, SuggestionWithUsers};
use crate::domain::{Role, SuggestionStatus};
use crate::entities::trick_suggestions;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Suggestion not found: {0}")]
    NotFound(i32),

    #[error("Suggestion already {0}")]
    AlreadyModerated(SuggestionStatus),

    #[error("Not allowed to modify this suggestion")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SuggestionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SuggestionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

impl From<(i32, String)> for UserSummary {
    fn from((id, username): (i32, String)) -> Self {
        Self { id, username }
    }
}

/// A suggestion as listed for moderators.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionDto {
    #[serde(flatten)]
    pub suggestion: trick_suggestions::Model,
    pub suggester: Option<UserSummary>,
    pub moderator: Option<UserSummary>,
}

impl From<SuggestionWithUsers> for SuggestionDto {
    fn from(row: SuggestionWithUsers) -> Self {
        Self {
            suggestion: row.suggestion,
            suggester: row.suggester.map(UserSummary::from),
            moderator: row.moderator.map(UserSummary::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModerationResult {
    pub message: String,
    pub status: SuggestionStatus,
    /// Id of the trick created on approval.
    pub trick_id: Option<i32>,
}

#[async_trait::async_trait]
pub trait SuggestionService: Send + Sync {
    async fn create(
        &self,
        user_id: i32,
        trick: NewTrick,
    ) -> Result<trick_suggestions::Model, SuggestionError>;

    /// Newest first.
    async fn list(
        &self,
        status: Option<SuggestionStatus>,
    ) -> Result<Vec<SuggestionDto>, SuggestionError>;

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<trick_suggestions::Model>, SuggestionError>;

    /// Approves or rejects a pending suggestion. Approval adds the trick to
    /// the catalog.
    ///
    /// # Errors
    ///
    /// [`SuggestionError::Validation`] when `status` is `pending`,
    /// [`SuggestionError::AlreadyModerated`] when the suggestion has left
    /// `pending` already.
    async fn moderate(
        &self,
        id: i32,
        moderator_id: i32,
        status: SuggestionStatus,
        comment: Option<String>,
    ) -> Result<ModerationResult, SuggestionError>;

    /// Only the author or staff may delete.
    async fn delete(&self, id: i32, actor_id: i32, actor_role: Role)
    -> Result<(), SuggestionError>;
}
