use crate::path_validator::PathValidator;
use crate::traits::{FileRepository, StorageError, StorageResult};
use async_trait::async_trait;
use imgpress_core::constants::OCTET_STREAM;
use imgpress_core::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_path: PathBuf,
    validator: PathValidator,
}

impl LocalFileStorage {
    /// Create a new LocalFileStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/imgpress/storage").
    ///   Created when missing and canonicalized, so saved paths are absolute.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalFileStorage {
            validator: PathValidator::new(&base_path),
            base_path,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileRepository for LocalFileStorage {
    async fn save(&self, file: &mut File, relative_path: &str) -> StorageResult<PathBuf> {
        let path = self.validator.validate(relative_path)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut dst = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.content.rewind().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to seek file content: {}", e))
        })?;

        let bytes_copied = tokio::io::copy(&mut file.content, &mut dst)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file content to {}: {}",
                    path.display(),
                    e
                ))
            })?;

        dst.flush().await?;
        dst.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %relative_path,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage save successful"
        );

        Ok(path)
    }

    async fn get(&self, relative_path: &str) -> StorageResult<File> {
        let path = self.validator.validate(relative_path)?;

        let handle = match fs::File::open(&path).await {
            Ok(handle) => handle,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(relative_path.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let metadata = handle.metadata().await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to get file info {}: {}",
                path.display(),
                e
            ))
        })?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(relative_path.to_string()));
        }

        tracing::debug!(
            path = %path.display(),
            key = %relative_path,
            size_bytes = metadata.len(),
            "Local storage open successful"
        );

        Ok(File::new(Box::new(handle), OCTET_STREAM, metadata.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_validator::ValidationError;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_local_storage_save_get() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let mut file = File::from_bytes(b"test data".to_vec(), "image/jpeg");
        let path = storage.save(&mut file, "compressed/test.jpeg").await.unwrap();

        assert!(path.is_absolute());
        assert!(path.ends_with("compressed/test.jpeg"));
        assert!(path.starts_with(storage.base_path()));

        let mut stored = storage.get("compressed/test.jpeg").await.unwrap();
        assert_eq!(stored.size, 9);
        assert_eq!(stored.content_type, "application/octet-stream");
        assert_eq!(stored.read_to_vec().await.unwrap(), b"test data");
    }

    #[tokio::test]
    async fn test_save_creates_intermediate_directories() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("root")).await.unwrap();

        let mut file = File::from_bytes(b"nested".to_vec(), "image/png");
        let path = storage.save(&mut file, "a/b/c/d.png").await.unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"nested");
    }

    #[tokio::test]
    async fn test_save_rewinds_partially_read_stream() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let mut file = File::from_bytes(b"0123456789".to_vec(), "image/png");
        let mut prefix = [0u8; 4];
        file.content.read_exact(&mut prefix).await.unwrap();

        let path = storage.save(&mut file, "rewound.png").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("store")).await.unwrap();

        let mut file = File::from_bytes(b"x".to_vec(), "image/png");
        let result = storage.save(&mut file, "../escape.png").await;
        assert!(matches!(
            result,
            Err(StorageError::InvalidPath(ValidationError::Traversal))
        ));
        assert!(!dir.path().join("escape.png").exists());

        let result = storage.get("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_get_rejects_invalid_path_even_if_file_exists() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        let storage = LocalFileStorage::new(dir.path().join("store")).await.unwrap();

        let result = storage.get("../secret.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_get_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let result = storage.get("compressed/missing.jpeg").await;
        assert!(matches!(result, Err(StorageError::NotFound(key)) if key == "compressed/missing.jpeg"));
    }

    #[tokio::test]
    async fn test_get_directory_is_not_found() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("compressed")).unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let result = storage.get("compressed").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        let mut first = File::from_bytes(b"first version".to_vec(), "image/png");
        storage.save(&mut first, "same.png").await.unwrap();
        let mut second = File::from_bytes(b"second".to_vec(), "image/png");
        let path = storage.save(&mut second, "same.png").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
