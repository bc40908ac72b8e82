//! In-memory compression facade for library users
//!
//! Wraps a [`CompressionService`] so callers can hand over any async reader and get the
//! encoded bytes back without touching storage.

use tokio::io::{AsyncRead, AsyncReadExt};

use imgpress_core::{File, Options};

use crate::compression::CompressionService;
use crate::error::ServiceError;

/// Metadata about one compression run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// MIME type of the encoded output
    pub content_type: String,
    pub original_size: u64,
    pub compressed_size: u64,
}

#[derive(Clone)]
pub struct Compressor {
    service: CompressionService,
}

impl Compressor {
    pub fn new(service: CompressionService) -> Self {
        Self { service }
    }

    /// Build a compressor with the bundled image processor and local storage under
    /// `base_path`, using built-in defaults (JPEG at quality 80, bounded to 3840x2160).
    #[cfg(feature = "image")]
    pub async fn with_local_storage(
        base_path: impl Into<std::path::PathBuf>,
    ) -> Result<Self, ServiceError> {
        use std::sync::Arc;

        use imgpress_core::constants::SUPPORTED_FORMATS;
        use imgpress_core::Defaults;
        use imgpress_processing::{ImageProcessor, ProcessorRegistry};
        use imgpress_storage::LocalFileStorage;

        let storage = LocalFileStorage::new(base_path).await?;
        let defaults = Defaults {
            format: "jpeg".to_string(),
            quality: 80,
            max_width: 3840,
            max_height: 2160,
            allowed_formats: SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect(),
        };
        let processors = ProcessorRegistry::default().with(ImageProcessor::new());

        Ok(Self::new(CompressionService::new(
            Arc::new(storage),
            defaults,
            "compressed",
            processors,
        )))
    }

    /// Read `reader` to the end, transform it, and return the encoded bytes.
    ///
    /// `content_type` selects the processor. When it is empty the type is sniffed from the
    /// leading bytes.
    pub async fn compress<R>(
        &self,
        mut reader: R,
        content_type: &str,
        options: &Options,
    ) -> Result<(Vec<u8>, CompressionResult), ServiceError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| ServiceError::Processing(e.into()))?;

        let content_type = if content_type.is_empty() {
            sniff_content_type(&buffer).to_string()
        } else {
            content_type.to_string()
        };

        let mut input = File::from_bytes(buffer, content_type);
        let opts = self.service.resolve_options(options);
        let mut output = self.service.process(&mut input, &opts).await?;

        let data = output
            .read_to_vec()
            .await
            .map_err(|e| ServiceError::Processing(e.into()))?;

        let result = CompressionResult {
            content_type: output.content_type.clone(),
            original_size: input.size,
            compressed_size: data.len() as u64,
        };

        Ok((data, result))
    }
}

/// Best-effort MIME detection from magic bytes, `application/octet-stream` when unknown.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        imgpress_core::constants::OCTET_STREAM
    }
}
