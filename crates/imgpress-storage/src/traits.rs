//! Storage abstraction trait
//!
//! This module defines the [`FileRepository`] trait that all storage backends must implement.

use std::path::PathBuf;

use async_trait::async_trait;
use imgpress_core::File;
use thiserror::Error;

use crate::path_validator::ValidationError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(#[from] ValidationError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway
///
/// Backends accept an already-decided relative path; choosing unique names is the
/// caller's job. Every path is validated before it reaches the backend.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Persist `file` under `relative_path` and return the full resolved path.
    ///
    /// The input stream is rewound before copying. Writes are not atomic: a failure
    /// mid-copy can leave a partial file behind.
    async fn save(&self, file: &mut File, relative_path: &str) -> StorageResult<PathBuf>;

    /// Open the file at `relative_path` for reading.
    ///
    /// The returned content type is always `application/octet-stream`; the caller owns
    /// the returned stream.
    async fn get(&self, relative_path: &str) -> StorageResult<File>;
}
