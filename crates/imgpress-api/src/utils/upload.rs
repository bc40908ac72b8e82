//! Multipart parsing shared by the upload and process handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use imgpress_core::{AppError, File, Options};
use imgpress_services::compressor::sniff_content_type;

use crate::constants::{FILE_FIELD, FILE_FIELD_ALIAS};

fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        ));
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

/// Parse an optional non-negative integer form value. Empty means unset.
fn parse_dimension(name: &str, value: &str) -> Result<Option<u32>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| AppError::InvalidInput(format!("{} must be a non-negative integer", name)))
}

/// Extract the uploaded file and the transformation options from a multipart form.
///
/// Exactly one file field (`file`, or its alias `image`) is accepted. When the part does
/// not declare a content type it is sniffed from the data.
pub async fn extract_upload(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<(File, Options), AppError> {
    let mut file: Option<File> = None;
    let mut options = Options::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILE_FIELD | FILE_FIELD_ALIAS => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }

                let declared = field
                    .content_type()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_default();

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_size))?;

                let content_type = if declared.is_empty() {
                    sniff_content_type(&data).to_string()
                } else {
                    declared
                };

                file = Some(File::from_bytes(data.to_vec(), content_type));
            }
            "format" | "quality" | "max_width" | "max_height" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_size))?;

                match field_name.as_str() {
                    "format" => {
                        let format = value.trim().to_lowercase();
                        options.format = (!format.is_empty()).then_some(format);
                    }
                    "quality" => options.quality = parse_dimension("quality", &value)?,
                    "max_width" => options.max_width = parse_dimension("max_width", &value)?,
                    _ => options.max_height = parse_dimension("max_height", &value)?,
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    tracing::debug!(
        content_type = %file.content_type,
        size_bytes = file.size,
        options = ?options,
        "Parsed upload"
    );

    Ok((file, options))
}
