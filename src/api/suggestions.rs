use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse, TrickRequest};
use crate::domain::SuggestionStatus;
use crate::entities::trick_suggestions;
use crate::services::{ModerationResult, SuggestionDto, SuggestionError};

impl From<SuggestionError> for ApiError {
    fn from(err: SuggestionError) -> Self {
        match err {
            SuggestionError::NotFound(id) => Self::not_found("Suggestion", id),
            SuggestionError::AlreadyModerated(status) => {
                Self::validation(format!("Suggestion already {status}"))
            }
            SuggestionError::Forbidden => Self::forbidden("Not allowed to delete this suggestion"),
            SuggestionError::Validation(msg) => Self::validation(msg),
            SuggestionError::Database(msg) => Self::DatabaseError(msg),
            SuggestionError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<SuggestionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub status: SuggestionStatus,
    #[serde(default)]
    pub moderation_comment: Option<String>,
}

/// POST /suggestions/tricks
pub async fn create_suggestion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<TrickRequest>,
) -> Result<Json<ApiResponse<trick_suggestions::Model>>, ApiError> {
    let suggestion = state
        .suggestion_service()
        .create(user.id, payload.into())
        .await?;
    Ok(Json(ApiResponse::success(suggestion)))
}

/// GET /suggestions/tricks?status=
pub async fn list_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<Vec<SuggestionDto>>>, ApiError> {
    let suggestions = state.suggestion_service().list(query.status).await?;
    Ok(Json(ApiResponse::success(suggestions)))
}

/// PUT /suggestions/tricks/{id}/moderate
pub async fn moderate_suggestion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ModerateRequest>,
) -> Result<Json<ApiResponse<ModerationResult>>, ApiError> {
    let id = validate_id(id, "suggestion")?;
    let comment = payload
        .moderation_comment
        .filter(|c| !c.trim().is_empty());

    let result = state
        .suggestion_service()
        .moderate(id, user.id, payload.status, comment)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// DELETE /suggestions/tricks/{id}
pub async fn delete_suggestion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id(id, "suggestion")?;
    state
        .suggestion_service()
        .delete(id, user.id, user.role)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Suggestion deleted",
    ))))
}
