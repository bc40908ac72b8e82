//! Domain models
//!
//! `File` carries a re-readable byte stream through the pipeline. Whoever holds a
//! `File` owns its stream; dropping the value releases it.

use std::fmt;
use std::io::{self, Cursor};
use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// Any seekable async byte source (an upload buffer, an open file on disk, ...).
pub trait ContentStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T> ContentStream for T where T: AsyncRead + AsyncSeek + Send + Unpin {}

/// A content stream together with its declared MIME type and byte size.
pub struct File {
    pub content: Box<dyn ContentStream>,
    /// Declared MIME type, may be empty when the source did not say.
    pub content_type: String,
    pub size: u64,
}

impl File {
    pub fn new(
        content: Box<dyn ContentStream>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            content,
            content_type: content_type.into(),
            size,
        }
    }

    /// Wrap an in-memory buffer. The stream starts at position 0.
    pub fn from_bytes(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(Box::new(Cursor::new(data)), content_type, size)
    }

    /// Rewind the stream and read it to the end.
    pub async fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        self.content.rewind().await?;
        let mut buffer = Vec::with_capacity(self.size as usize);
        self.content.read_to_end(&mut buffer).await?;
        Ok(buffer)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Per-request transformation overrides. `None` means "use the configured default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Target format identifier, e.g. "jpeg", "png", "webp"
    pub format: Option<String>,
    /// Encoder quality, 1-100
    pub quality: Option<u32>,
    /// Maximum width in pixels, `Some(0)` explicitly lifts the limit
    pub max_width: Option<u32>,
    /// Maximum height in pixels, `Some(0)` explicitly lifts the limit
    pub max_height: Option<u32>,
}

impl Options {
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// Fully merged options handed to a processor. Never sparse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub format: String,
    pub quality: u32,
    /// 0 means no limit
    pub max_width: u32,
    /// 0 means no limit
    pub max_height: u32,
}

/// Process-wide defaults, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub format: String,
    pub quality: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub allowed_formats: Vec<String>,
}

impl Defaults {
    /// Whether `format` may be produced. An empty allow-list permits everything.
    pub fn allows(&self, format: &str) -> bool {
        self.allowed_formats.is_empty()
            || self
                .allowed_formats
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(format))
    }
}

/// Descriptor of a persisted compression result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Full path on the storage backend
    pub path: PathBuf,
    /// Storage-relative key, accepted by retrieval
    pub key: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Defaults {
        Defaults {
            format: "jpeg".to_string(),
            quality: 80,
            max_width: 0,
            max_height: 0,
            allowed_formats: vec!["jpeg".to_string(), "png".to_string()],
        }
    }

    #[test]
    fn test_defaults_allows_is_case_insensitive() {
        let defaults = defaults();
        assert!(defaults.allows("jpeg"));
        assert!(defaults.allows("PNG"));
        assert!(!defaults.allows("webp"));
    }

    #[test]
    fn test_defaults_empty_allow_list_permits_all() {
        let defaults = Defaults {
            allowed_formats: Vec::new(),
            ..defaults()
        };
        assert!(defaults.allows("webp"));
    }

    #[tokio::test]
    async fn test_file_read_to_vec_rewinds() {
        let mut file = File::from_bytes(b"hello".to_vec(), "text/plain");
        assert_eq!(file.size, 5);

        let first = file.read_to_vec().await.unwrap();
        let second = file.read_to_vec().await.unwrap();
        assert_eq!(first, b"hello");
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_debug_omits_content() {
        let file = File::from_bytes(vec![1, 2, 3], "image/png");
        let rendered = format!("{:?}", file);
        assert!(rendered.contains("image/png"));
        assert!(rendered.contains("size: 3"));
    }
}
