//! Per-user endpoints: profile, progress views, achievements and suggestions.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState};
use crate::entities::{trick_suggestions, user_progress};
use crate::services::{
    AwardDto, LearnedTrick, MarkLearnedResult, ProgressError, UserAchievementSummary, UserInfo,
    UserStats,
};

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::UserNotFound(id) => Self::not_found("User", id),
            ProgressError::TrickNotFound(id) => Self::not_found("Trick", id),
            ProgressError::Database(msg) => Self::DatabaseError(msg),
            ProgressError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let id = validate_id(id, "user")?;
    let user = state.user_service().get_profile(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// GET /users/{id}/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<user_progress::Model>>>, ApiError> {
    let id = validate_id(id, "user")?;
    let progress = state.progress_service().list_progress(id).await?;
    Ok(Json(ApiResponse::success(progress)))
}

/// GET /users/{id}/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserStats>>, ApiError> {
    let id = validate_id(id, "user")?;
    let stats = state.progress_service().user_stats(id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// GET /users/{id}/learned-tricks
pub async fn get_learned_tricks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<LearnedTrick>>>, ApiError> {
    let id = validate_id(id, "user")?;
    let learned = state.progress_service().learned_tricks(id).await?;
    Ok(Json(ApiResponse::success(learned)))
}

/// POST /users/{id}/progress/{trick_id}
///
/// Newly unlocked achievements are returned with the result.
pub async fn mark_learned(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, trick_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<MarkLearnedResult>>, ApiError> {
    let id = validate_id(id, "user")?;
    let trick_id = validate_id(trick_id, "trick")?;
    user.ensure_self_or_staff(id)?;

    let result = state.progress_service().mark_learned(id, trick_id).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// POST /users/{id}/check-achievements
pub async fn check_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<AwardDto>>>, ApiError> {
    let id = validate_id(id, "user")?;
    user.ensure_self_or_staff(id)?;

    let awarded = state.achievement_service().check(id).await?;
    Ok(Json(ApiResponse::success(
        awarded.iter().map(AwardDto::from).collect(),
    )))
}

/// GET /users/{id}/achievements
pub async fn get_user_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserAchievementSummary>>, ApiError> {
    let id = validate_id(id, "user")?;
    user.ensure_self_or_staff(id)?;

    let summary = state.achievement_service().user_summary(id).await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// GET /users/{id}/suggestions
pub async fn get_user_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<trick_suggestions::Model>>>, ApiError> {
    let id = validate_id(id, "user")?;
    user.ensure_self_or_staff(id)?;

    let suggestions = state.suggestion_service().list_for_user(id).await?;
    Ok(Json(ApiResponse::success(suggestions)))
}
