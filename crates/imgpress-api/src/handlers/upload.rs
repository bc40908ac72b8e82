use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    /// Storage-relative path, accepted by `GET /file?path=`
    pub compressed_path: String,
    pub compressed_size: u64,
    pub message: &'static str,
}

/// Upload handler
///
/// Compresses the uploaded file with the requested options and stores the result under a
/// freshly generated name.
///
/// # Errors
/// - `AppError::InvalidInput` - Missing file, bad option value or disallowed format
/// - `AppError::UnsupportedMediaType` - No processor accepts the upload
/// - `AppError::PayloadTooLarge` - Body exceeds the upload limit
/// - `AppError::Storage` - The result could not be written
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (mut file, options) =
        extract_upload(multipart, state.config.max_upload_size_bytes).await?;

    let saved = state.service.compress_and_save(&mut file, &options).await?;

    tracing::info!(
        compressed_path = %saved.key,
        original_size = file.size,
        compressed_size = saved.size,
        "Upload stored"
    );

    Ok(Json(UploadResponse {
        status: "success",
        compressed_path: saved.key,
        compressed_size: saved.size,
        message: "File saved successfully",
    }))
}
