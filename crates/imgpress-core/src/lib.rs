//! imgpress Core Library
//!
//! This crate provides the domain types, option resolution, error taxonomy and
//! configuration shared across all imgpress components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod options;

// Re-export commonly used types
pub use config::{Config, ImageConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ContentStream, Defaults, File, Options, ResolvedOptions, SavedFile};
pub use options::resolve;
