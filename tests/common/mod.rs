//! Shared harness: a router over a fresh temp-file database.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use snowtricks::api::AppState;
use snowtricks::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub root: PathBuf,
}

pub fn test_config(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", root.join("snowtricks.db").display());
    config.general.images_path = root.join("images").display().to_string();
    config.general.tricks_json_path = None;
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;
    config
}

pub fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("snowtricks-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&root).expect("failed to create temp dir");
    root
}

pub async fn spawn_app() -> TestApp {
    let root = temp_root();
    spawn_app_with_config(test_config(&root), root).await
}

pub async fn spawn_app_with_config(config: Config, root: PathBuf) -> TestApp {
    let state = snowtricks::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = snowtricks::api::router(state.clone()).await;

    TestApp {
        state,
        router,
        root,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header("X-Api-Key", key);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, api_key: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, api_key, None).await
    }

    pub async fn post(&self, uri: &str, api_key: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, api_key, Some(body)).await
    }

    /// Logs in and returns the account's API key.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["api_key"].as_str().unwrap().to_string()
    }

    pub async fn admin_key(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Registers a user and returns `(user_id, api_key)`.
    pub async fn register(&self, username: &str) -> (i32, String) {
        let password = "snowboard1";
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        let id = i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap();

        (id, self.login(username, password).await)
    }

    /// Creates a trick through the staff API and returns its id.
    pub async fn create_trick(&self, staff_key: &str, name: &str, category: &str) -> i32 {
        let (status, body) = self
            .post(
                "/api/admin/tricks",
                Some(staff_key),
                json!({ "name": name, "category": category, "description": "test" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create trick failed: {body}");
        i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap()
    }

    pub async fn mark_learned(&self, key: &str, user_id: i32, trick_id: i32) -> Value {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/users/{user_id}/progress/{trick_id}"),
                Some(key),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "mark learned failed: {body}");
        body["data"].clone()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn award_names(data: &Value, field: &str) -> Vec<String> {
    data[field]
        .as_array()
        .map(|awards| {
            awards
                .iter()
                .filter_map(|a| a["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
