use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use imgpress_core::constants::OCTET_STREAM;
use imgpress_core::AppError;
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::response::file_response;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    path: Option<String>,
}

/// Download a stored file by its storage-relative path
#[tracing::instrument(skip(state), fields(operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Response, HttpAppError> {
    let path = query
        .path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| AppError::BadRequest("path query parameter is required".to_string()))?;

    let file = state.service.get_file(&path).await?;

    let filename = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    tracing::debug!(path = %path, size_bytes = file.size, "Streaming stored file");

    Ok(file_response(file, OCTET_STREAM, &filename)?)
}
