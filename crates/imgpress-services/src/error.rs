//! Service errors
//!
//! Keeps the failure classes of the layers below apart so the transport can tell a bad
//! path from a missing file, and a bad upload from a server fault.

use imgpress_core::AppError;
use imgpress_processing::{DispatchError, ProcessorError};
use imgpress_storage::{StorageError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid path: {0}")]
    InvalidPath(#[from] ValidationError),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("format not allowed: {0}")]
    FormatNotAllowed(String),

    #[error("failed to process file: {0}")]
    Processing(#[from] ProcessorError),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(StorageError),
}

impl ServiceError {
    /// Whether the request itself was at fault
    pub fn is_client_fault(&self) -> bool {
        match self {
            ServiceError::InvalidPath(_)
            | ServiceError::UnsupportedMediaType(_)
            | ServiceError::FormatNotAllowed(_)
            | ServiceError::NotFound(_) => true,
            ServiceError::Processing(err) => err.is_input_fault(),
            ServiceError::Storage(_) => false,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath(reason) => ServiceError::InvalidPath(reason),
            StorageError::NotFound(key) => ServiceError::NotFound(key),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<DispatchError> for ServiceError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnsupportedMediaType(content_type) => {
                ServiceError::UnsupportedMediaType(content_type)
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidPath(reason) => AppError::InvalidPath(reason.to_string()),
            ServiceError::UnsupportedMediaType(content_type) => {
                AppError::UnsupportedMediaType(content_type)
            }
            err @ ServiceError::FormatNotAllowed(_) => AppError::InvalidInput(err.to_string()),
            ServiceError::Processing(ProcessorError::InvalidOptions(msg)) => {
                AppError::InvalidInput(format!("failed to process file: {}", msg))
            }
            err @ ServiceError::Processing(_) if err.is_client_fault() => {
                AppError::ImageProcessing(err.to_string())
            }
            err @ ServiceError::Processing(_) => AppError::Internal(err.to_string()),
            ServiceError::NotFound(key) => AppError::NotFound(key),
            ServiceError::Storage(err) => AppError::Storage(err.to_string()),
        }
    }
}
