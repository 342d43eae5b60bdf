use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, CategoryQuery, MessageResponse, TrickRequest};
use crate::entities::tricks;
use crate::services::{CatalogError, QuizQuestion};

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::not_found("Trick", id),
            CatalogError::Empty => Self::NotFound("No tricks available".to_string()),
            CatalogError::Validation(msg) => Self::validation(msg),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::internal(msg),
        }
    }
}

fn category_filter(query: &CategoryQuery) -> Option<&str> {
    query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

/// GET /tricks?category=
pub async fn list_tricks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<tricks::Model>>>, ApiError> {
    let tricks = state
        .catalog_service()
        .list(category_filter(&query))
        .await?;
    Ok(Json(ApiResponse::success(tricks)))
}

/// GET /tricks/{id}
pub async fn get_trick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<tricks::Model>>, ApiError> {
    let id = validate_id(id, "trick")?;
    let trick = state.catalog_service().get(id).await?;
    Ok(Json(ApiResponse::success(trick)))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let categories = state.catalog_service().categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /quiz/random?category=
pub async fn random_quiz(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<QuizQuestion>>, ApiError> {
    let quiz = state
        .catalog_service()
        .random_quiz(category_filter(&query))
        .await?;
    Ok(Json(ApiResponse::success(quiz)))
}

// ============================================================================
// Staff
// ============================================================================

/// GET /admin/tricks
pub async fn admin_list_tricks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<tricks::Model>>>, ApiError> {
    let tricks = state.catalog_service().list(None).await?;
    Ok(Json(ApiResponse::success(tricks)))
}

/// POST /admin/tricks
pub async fn create_trick(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrickRequest>,
) -> Result<Json<ApiResponse<tricks::Model>>, ApiError> {
    let trick = state.catalog_service().create(payload.into()).await?;
    Ok(Json(ApiResponse::success(trick)))
}

/// PUT /admin/tricks/{id}
pub async fn update_trick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TrickRequest>,
) -> Result<Json<ApiResponse<tricks::Model>>, ApiError> {
    let id = validate_id(id, "trick")?;
    let trick = state.catalog_service().update(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(trick)))
}

/// DELETE /admin/tricks/{id}
pub async fn delete_trick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id(id, "trick")?;
    state.catalog_service().delete(id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new("Trick deleted"))))
}
