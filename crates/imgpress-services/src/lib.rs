//! imgpress Services Layer
//!
//! This crate hosts the orchestration service that ties option resolution, processor
//! dispatch and storage together, and re-exports what the API crate needs so that it
//! depends on a single service facade. Keep coordination here; keep HTTP handling in
//! imgpress-api.

pub mod compression;
pub mod compressor;
pub mod error;

pub use compression::CompressionService;
pub use compressor::{CompressionResult, Compressor};
pub use error::ServiceError;

#[cfg(feature = "image")]
pub use imgpress_processing::ImageProcessor;
pub use imgpress_processing::{Processor, ProcessorRegistry};
pub use imgpress_storage::{FileRepository, LocalFileStorage, StorageError};
