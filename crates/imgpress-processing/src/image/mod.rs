//! Image processing module
//!
//! - Bounded resizing (resize)
//! - The bundled JPEG/PNG/WebP processor (processor)

pub mod processor;
pub mod resize;

pub use processor::ImageProcessor;
pub use resize::fit_within;
