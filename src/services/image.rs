use crate::config::UploadConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// URL prefix uploaded images are served under.
pub const IMAGES_ROUTE: &str = "/images";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided")]
    Missing,

    #[error("File type '{0}' is not allowed")]
    UnsupportedType(String),

    #[error("Image exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredImage {
    pub filename: String,
    /// Public path, e.g. `/images/<uuid>.png`.
    pub url: String,
    pub size: usize,
}

pub struct ImageService {
    images_dir: PathBuf,
    config: UploadConfig,
}

impl ImageService {
    #[must_use]
    pub fn new(images_path: impl Into<PathBuf>, config: UploadConfig) -> Self {
        Self {
            images_dir: images_path.into(),
            config,
        }
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.config.max_image_bytes
    }

    /// Returns the lowercase extension if the upload looks like an allowed image.
    pub fn check_type(
        &self,
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, UploadError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| UploadError::UnsupportedType(original_name.to_string()))?;

        if !self.config.allowed_extensions.iter().any(|e| *e == extension) {
            return Err(UploadError::UnsupportedType(extension));
        }

        // Clients that omit the part content type get one guessed from the name.
        let mime = content_type.map_or_else(
            || {
                mime_guess::from_ext(&extension)
                    .first_or_octet_stream()
                    .to_string()
            },
            str::to_string,
        );
        if !mime.starts_with("image/") {
            return Err(UploadError::UnsupportedType(mime));
        }

        Ok(extension)
    }

    /// Writes the upload under a fresh UUID name.
    pub async fn save_upload(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredImage, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Missing);
        }

        let limit = self.config.max_image_bytes;
        if bytes.len() > limit {
            return Err(UploadError::TooLarge { limit });
        }

        let extension = self.check_type(original_name, content_type)?;

        fs::create_dir_all(&self.images_dir).await?;

        let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
        let file_path = self.images_dir.join(&filename);
        fs::write(&file_path, bytes).await?;

        info!(
            path = %file_path.display(),
            size = bytes.len(),
            original = %original_name,
            "Stored uploaded image"
        );

        Ok(StoredImage {
            url: format!("{IMAGES_ROUTE}/{filename}"),
            filename,
            size: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path) -> ImageService {
        ImageService::new(
            dir,
            UploadConfig {
                max_image_bytes: 16,
                ..UploadConfig::default()
            },
        )
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("snowtricks-images-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn rejects_disallowed_extensions() {
        let svc = service(&temp_dir());
        assert!(svc.check_type("photo.PNG", Some("image/png")).is_ok());
        assert!(svc.check_type("photo.jpeg", None).is_ok());
        assert!(matches!(
            svc.check_type("script.sh", Some("image/png")),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            svc.check_type("noext", None),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            svc.check_type("photo.png", Some("text/plain")),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn stores_under_uuid_name() {
        let dir = temp_dir();
        let svc = service(&dir);

        let stored = svc
            .save_upload("board.png", Some("image/png"), b"not really a png")
            .await
            .unwrap();

        assert!(stored.url.starts_with("/images/"));
        assert!(stored.filename.ends_with(".png"));
        assert_ne!(stored.filename, "board.png");
        assert_eq!(std::fs::read(dir.join(&stored.filename)).unwrap(), b"not really a png");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn enforces_size_limit() {
        let svc = service(&temp_dir());
        let result = svc
            .save_upload("big.png", Some("image/png"), &[0u8; 17])
            .await;
        assert!(matches!(result, Err(UploadError::TooLarge { limit: 16 })));

        let empty = svc.save_upload("empty.png", Some("image/png"), &[]).await;
        assert!(matches!(empty, Err(UploadError::Missing)));
    }
}
