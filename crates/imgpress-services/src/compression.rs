//! Compression orchestration
//!
//! Each call runs resolve -> dispatch -> transform -> (optional) persist with no state
//! carried between calls. Defaults and the processor list are fixed at construction, so a
//! single service can be shared across concurrent requests without locking.

use std::sync::Arc;
use std::time::Instant;

use imgpress_core::{resolve, Defaults, File, Options, ResolvedOptions, SavedFile};
use imgpress_processing::ProcessorRegistry;
use imgpress_storage::FileRepository;
use uuid::Uuid;

use crate::error::ServiceError;

#[derive(Clone)]
pub struct CompressionService {
    repository: Arc<dyn FileRepository>,
    defaults: Arc<Defaults>,
    compressed_subdir: String,
    processors: ProcessorRegistry,
}

impl CompressionService {
    /// Create a new CompressionService.
    ///
    /// # Arguments
    /// * `repository` - Storage gateway used for saves and reads
    /// * `defaults` - Option defaults and the allowed output formats
    /// * `compressed_subdir` - Storage-relative directory for saved results (e.g. "compressed")
    /// * `processors` - Processors in dispatch order
    pub fn new(
        repository: Arc<dyn FileRepository>,
        defaults: Defaults,
        compressed_subdir: impl Into<String>,
        processors: ProcessorRegistry,
    ) -> Self {
        Self {
            repository,
            defaults: Arc::new(defaults),
            compressed_subdir: compressed_subdir.into(),
            processors,
        }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Merge per-request overrides with the configured defaults.
    pub fn resolve_options(&self, overrides: &Options) -> ResolvedOptions {
        resolve(&self.defaults, overrides)
    }

    /// Dispatch `file` to the first supporting processor and transform it. Nothing is stored.
    pub async fn process(
        &self,
        file: &mut File,
        opts: &ResolvedOptions,
    ) -> Result<File, ServiceError> {
        if !self.defaults.allows(&opts.format) {
            return Err(ServiceError::FormatNotAllowed(opts.format.clone()));
        }

        let processor = self.processors.select(&file.content_type)?;

        tracing::debug!(
            processor = processor.name(),
            content_type = %file.content_type,
            format = %opts.format,
            quality = opts.quality,
            max_width = opts.max_width,
            max_height = opts.max_height,
            "Dispatching file to processor"
        );

        Ok(processor.process(file, opts).await?)
    }

    /// Resolve options, transform, and persist the result under a freshly generated name.
    pub async fn compress_and_save(
        &self,
        file: &mut File,
        overrides: &Options,
    ) -> Result<SavedFile, ServiceError> {
        let start = Instant::now();
        let opts = self.resolve_options(overrides);

        let mut output = self.process(file, &opts).await?;

        let key = self.storage_key(&opts.format);
        let path = self.repository.save(&mut output, &key).await?;

        tracing::info!(
            key = %key,
            original_size = file.size,
            compressed_size = output.size,
            format = %opts.format,
            quality = opts.quality,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File compressed and saved"
        );

        Ok(SavedFile {
            path,
            key,
            size: output.size,
        })
    }

    /// Open a stored file by its storage-relative path.
    pub async fn get_file(&self, path: &str) -> Result<File, ServiceError> {
        Ok(self.repository.get(path).await?)
    }

    /// `<subdir>/<uuid-v4>.<format>`
    fn storage_key(&self, format: &str) -> String {
        let file_name = format!("{}.{}", Uuid::new_v4(), format.to_ascii_lowercase());
        let subdir = self.compressed_subdir.trim_matches('/');
        if subdir.is_empty() {
            file_name
        } else {
            format!("{}/{}", subdir, file_name)
        }
    }
}
