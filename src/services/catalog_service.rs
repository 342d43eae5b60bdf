//! Domain service for the trick catalog.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::db::NewTrick;
use crate::entities::tricks;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Trick not found: {0}")]
    NotFound(i32),

    #[error("No tricks available")]
    Empty,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOption {
    pub id: i32,
    pub name: String,
}

/// "Name this trick": the correct trick is hidden among up to three others.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub image_url: Option<String>,
    pub category: String,
    pub options: Vec<QuizOption>,
    pub correct_answer_id: i32,
}

/// One entry of the catalog import file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image path or URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl From<CatalogEntry> for NewTrick {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            category: entry.category,
            description: entry.description,
            image_url: entry.image,
            technique: entry.technique,
            video_url: entry.video_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub tricks: Vec<CatalogEntry>,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list(&self, category: Option<&str>) -> Result<Vec<tricks::Model>, CatalogError>;

    async fn get(&self, id: i32) -> Result<tricks::Model, CatalogError>;

    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    async fn create(&self, trick: NewTrick) -> Result<tricks::Model, CatalogError>;

    async fn update(&self, id: i32, trick: NewTrick) -> Result<tricks::Model, CatalogError>;

    async fn delete(&self, id: i32) -> Result<(), CatalogError>;

    /// Picks a random trick, optionally within `category`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] when there is nothing to ask about.
    async fn random_quiz(&self, category: Option<&str>) -> Result<QuizQuestion, CatalogError>;

    /// Loads the catalog file into an empty catalog. Returns the number of
    /// imported tricks; a non-empty catalog or a missing file imports nothing.
    async fn import_if_empty(&self, path: &Path) -> Result<usize, CatalogError>;
}
