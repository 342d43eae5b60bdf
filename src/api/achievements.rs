use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_limit, validate_required};
use super::{ApiError, ApiResponse, AppState, LimitQuery};
use crate::db::NewAchievement;
use crate::domain::AchievementKind;
use crate::entities::achievements;
use crate::services::{AchievementError, LeaderboardEntry};

impl From<AchievementError> for ApiError {
    fn from(err: AchievementError) -> Self {
        match err {
            AchievementError::UserNotFound(id) => Self::not_found("User", id),
            AchievementError::DuplicateName(name) => {
                Self::Conflict(format!("Achievement '{name}' already exists"))
            }
            AchievementError::Validation(msg) => Self::validation(msg),
            AchievementError::Database(msg) => Self::DatabaseError(msg),
            AchievementError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAchievementRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub condition_type: String,
    #[serde(default)]
    pub condition_value: Option<i32>,
    /// JSON text, e.g. `{"category": "spins"}`.
    #[serde(default)]
    pub condition_data: Option<String>,
    #[serde(default)]
    pub points: i32,
    #[serde(default = "default_badge_color")]
    pub badge_color: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_badge_color() -> String {
    "#667eea".to_string()
}

const fn default_active() -> bool {
    true
}

/// GET /achievements
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<achievements::Model>>>, ApiError> {
    let definitions = state.achievement_service().list_active().await?;
    Ok(Json(ApiResponse::success(definitions)))
}

/// GET /leaderboard?limit=
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>, ApiError> {
    let (default_limit, max_limit) = {
        let config = state.config().read().await;
        (
            config.achievements.leaderboard_default_limit,
            config.achievements.leaderboard_max_limit,
        )
    };
    let limit = validate_limit(query.limit, default_limit, max_limit)?;

    let entries = state.achievement_service().leaderboard(limit).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// POST /admin/achievements
pub async fn create_achievement(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAchievementRequest>,
) -> Result<Json<ApiResponse<achievements::Model>>, ApiError> {
    let name = validate_required(&payload.name, "Name")?.to_string();
    let condition_type = validate_required(&payload.condition_type, "Condition type")?.to_string();

    if let Some(data) = payload.condition_data.as_deref()
        && serde_json::from_str::<serde_json::Value>(data).is_err()
    {
        return Err(ApiError::validation("condition_data must be valid JSON"));
    }

    let created = state
        .achievement_service()
        .create(NewAchievement {
            name,
            description: payload.description,
            icon: payload.icon,
            kind: payload.kind,
            condition_type,
            condition_value: payload.condition_value,
            condition_data: payload.condition_data,
            points: payload.points,
            badge_color: payload.badge_color,
            is_active: payload.is_active,
        })
        .await?;

    Ok(Json(ApiResponse::success(created)))
}
