use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod achievements;
mod admin;
pub mod auth;
mod error;
mod observability;
mod suggestions;
mod system;
mod tricks;
mod types;
mod upload;
mod users;
pub mod validation;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{
    AchievementService, AuthService, CatalogService, ImageService, ProgressService,
    SuggestionService, UserService,
};
use metrics_exporter_prometheus::PrometheusHandle;

/// Room for multipart framing on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn progress_service(&self) -> &Arc<dyn ProgressService> {
        &self.shared.progress_service
    }

    #[must_use]
    pub fn suggestion_service(&self) -> &Arc<dyn SuggestionService> {
        &self.shared.suggestion_service
    }

    #[must_use]
    pub fn achievement_service(&self) -> &Arc<dyn AchievementService> {
        &self.shared.achievement_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

/// Opens the database, bootstraps it and builds the API state.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    shared.bootstrap().await?;
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (images_path, cors_origins, secure_cookies, session_minutes, max_image_bytes) = {
        let config = state.config().read().await;
        (
            config.general.images_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
            config.uploads.max_image_bytes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let api_router = Router::new()
        .merge(public_routes())
        .merge(user_routes(state.clone(), max_image_bytes))
        .merge(staff_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service(
            crate::services::image::IMAGES_ROUTE,
            tower_http::services::ServeDir::new(images_path),
        )
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::track_metrics))
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tricks", get(tricks::list_tricks))
        .route("/tricks/{id}", get(tricks::get_trick))
        .route("/categories", get(tricks::list_categories))
        .route("/quiz/random", get(tricks::random_quiz))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/progress", get(users::get_progress))
        .route("/users/{id}/stats", get(users::get_stats))
        .route("/users/{id}/learned-tricks", get(users::get_learned_tricks))
        .route("/achievements", get(achievements::list_achievements))
        .route("/leaderboard", get(achievements::get_leaderboard))
        .route("/system/health", get(system::health))
}

/// Any authenticated, active account. Self-or-owner checks happen in the handlers.
fn user_routes(state: Arc<AppState>, max_image_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/change-password", post(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route(
            "/users/{id}/progress/{trick_id}",
            post(users::mark_learned),
        )
        .route(
            "/users/{id}/check-achievements",
            post(users::check_achievements),
        )
        .route(
            "/users/{id}/achievements",
            get(users::get_user_achievements),
        )
        .route("/users/{id}/suggestions", get(users::get_user_suggestions))
        .route("/suggestions/tricks", post(suggestions::create_suggestion))
        .route(
            "/suggestions/tricks/{id}",
            delete(suggestions::delete_suggestion),
        )
        .route(
            "/upload/image",
            post(upload::upload_image).layer(DefaultBodyLimit::max(
                max_image_bytes + UPLOAD_OVERHEAD_BYTES,
            )),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// Managers and admins.
fn staff_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/suggestions/tricks", get(suggestions::list_suggestions))
        .route(
            "/suggestions/tricks/{id}/moderate",
            put(suggestions::moderate_suggestion),
        )
        .route("/admin/tricks", get(tricks::admin_list_tricks))
        .route("/admin/tricks", post(tricks::create_trick))
        .route("/admin/tricks/{id}", put(tricks::update_trick))
        .route("/admin/tricks/{id}", delete(tricks::delete_trick))
        .route_layer(middleware::from_fn(auth::require_staff))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", put(admin::update_user))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/achievements", post(achievements::create_achievement))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
