use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Response,
};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::response::file_response;
use crate::utils::upload::extract_upload;

/// Process handler
///
/// Transforms the uploaded file and streams the result back without storing it.
#[tracing::instrument(skip(state, multipart), fields(operation = "process_file"))]
pub async fn process_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let (mut file, options) =
        extract_upload(multipart, state.config.max_upload_size_bytes).await?;

    let opts = state.service.resolve_options(&options);
    let output = state.service.process(&mut file, &opts).await?;

    tracing::info!(
        format = %opts.format,
        original_size = file.size,
        compressed_size = output.size,
        "File processed"
    );

    let content_type = output.content_type.clone();
    let filename = format!("processed.{}", opts.format);
    Ok(file_response(output, &content_type, &filename)?)
}
