//! Storage, processor and service wiring

use std::sync::Arc;

use anyhow::{Context, Result};
use imgpress_core::Config;
use imgpress_services::{CompressionService, LocalFileStorage, ProcessorRegistry};

use crate::state::AppState;

/// Build the processor list in dispatch order
fn setup_processors() -> ProcessorRegistry {
    #[cfg(feature = "image")]
    {
        ProcessorRegistry::default().with(imgpress_services::ImageProcessor::new())
    }
    #[cfg(not(feature = "image"))]
    {
        tracing::warn!("Built without the image feature - every upload will be rejected");
        ProcessorRegistry::default()
    }
}

/// Initialize storage and the compression service
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage = LocalFileStorage::new(&config.storage.path)
        .await
        .with_context(|| format!("Failed to open storage at {}", config.storage.path))?;

    tracing::info!(
        base_path = %storage.base_path().display(),
        compressed_subdir = %config.storage.compressed_subdir,
        "Local storage initialized"
    );

    let processors = setup_processors();
    tracing::info!(processors = ?processors, "Processors registered");

    let service = CompressionService::new(
        Arc::new(storage),
        config.defaults(),
        config.storage.compressed_subdir.clone(),
        processors,
    );

    Ok(Arc::new(AppState::new(service, config.clone())))
}
