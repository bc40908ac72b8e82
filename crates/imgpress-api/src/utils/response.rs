//! Streaming file responses

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use imgpress_core::{AppError, File};
use tokio_util::io::ReaderStream;

/// `attachment; filename="..."` with characters that could break the header replaced.
pub fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_control() || c == '"' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// Stream `file` back as a download. The response body takes ownership of the stream.
pub fn file_response(
    file: File,
    content_type: &str,
    filename: &str,
) -> Result<Response, AppError> {
    let body = Body::from_stream(ReaderStream::new(file.content));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file.size)
        .header(header::CONTENT_DISPOSITION, content_disposition(filename))
        .body(body)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })
}
