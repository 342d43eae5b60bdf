use serde::{Deserialize, Serialize};

use crate::db::NewTrick;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trick fields as accepted by the catalog and suggestion endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TrickRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl From<TrickRequest> for NewTrick {
    fn from(req: TrickRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            category: req.category.trim().to_string(),
            description: req.description,
            image_url: req.image_url.filter(|s| !s.trim().is_empty()),
            technique: req.technique,
            video_url: req.video_url.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
    pub uptime: u64,
}
