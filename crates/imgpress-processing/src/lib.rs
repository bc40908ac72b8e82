//! imgpress Processing Library
//!
//! This crate provides the processor capability trait, the ordered processor registry
//! used for dispatch, and the bundled image codecs.

pub mod dispatch;
pub mod traits;

#[cfg(feature = "image")]
pub mod compression;
#[cfg(feature = "image")]
pub mod image;

// Re-export commonly used types
pub use dispatch::{select, DispatchError, ProcessorRegistry};
pub use traits::{Processor, ProcessorError};

#[cfg(feature = "image")]
pub use compression::{ImageCompressor, OutputFormat};
#[cfg(feature = "image")]
pub use self::image::ImageProcessor;
