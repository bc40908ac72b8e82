//! Shared constants

/// Content type reported for files read back from storage. The gateway does not sniff content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Formats the bundled image processor knows how to encode.
pub const SUPPORTED_FORMATS: &[&str] = &["jpeg", "png", "webp"];

pub const MIN_QUALITY: u32 = 1;
pub const MAX_QUALITY: u32 = 100;
