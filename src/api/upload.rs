use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{StoredImage, UploadError};

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Missing => Self::validation("No file provided"),
            UploadError::UnsupportedType(kind) => Self::validation(format!(
                "File type '{kind}' is not allowed. Upload a jpg, png, gif or webp image"
            )),
            UploadError::TooLarge { limit } => {
                Self::PayloadTooLarge(format!("Image exceeds the {limit} byte limit"))
            }
            UploadError::Io(e) => Self::internal(format!("Failed to store image: {e}")),
        }
    }
}

/// POST /upload/image
///
/// Expects a multipart form with a `file` part.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<StoredImage>>, ApiError> {
    let images = state.image_service();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);

        // Reject by name before reading the body.
        images.check_type(&original_name, content_type.as_deref())?;

        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::from(UploadError::TooLarge {
                    limit: images.max_bytes(),
                })
            } else {
                ApiError::validation(format!("Failed to read upload: {e}"))
            }
        })?;

        let stored = images
            .save_upload(&original_name, content_type.as_deref(), &bytes)
            .await?;

        metrics::counter!("images_uploaded_total").increment(1);
        return Ok(Json(ApiResponse::success(stored)));
    }

    Err(UploadError::Missing.into())
}
