//! Core traits for file processing
//!
//! A [`Processor`] declares which content types it accepts and turns one [`File`] into
//! another. The transformation itself is opaque to the orchestration layer; it only
//! relies on the contract below.

use async_trait::async_trait;
use imgpress_core::{File, ResolvedOptions};

/// Processing failures
///
/// Input faults (bad options, undecodable or unsupported input) are the client's doing;
/// everything else is an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode input: {0}")]
    Decode(String),

    #[error("failed to encode output: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ProcessorError {
    /// Whether the failure was caused by the request rather than the server
    pub fn is_input_fault(&self) -> bool {
        matches!(
            self,
            ProcessorError::InvalidOptions(_)
                | ProcessorError::UnsupportedFormat(_)
                | ProcessorError::Decode(_)
        )
    }
}

/// File processor capability
#[async_trait]
pub trait Processor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this processor accepts input declared as `content_type`
    fn supports(&self, content_type: &str) -> bool;

    /// Transform `input` according to fully resolved options.
    ///
    /// Implementations may rewind `input` to re-read it but must not otherwise depend on
    /// its position. The returned file is positioned at its start and carries an accurate
    /// byte size.
    async fn process(&self, input: &mut File, opts: &ResolvedOptions)
        -> Result<File, ProcessorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_faults() {
        assert!(ProcessorError::InvalidOptions("quality 0".into()).is_input_fault());
        assert!(ProcessorError::UnsupportedFormat("gif".into()).is_input_fault());
        assert!(ProcessorError::Decode("truncated".into()).is_input_fault());
    }

    #[test]
    fn test_internal_faults() {
        assert!(!ProcessorError::Encode("oom".into()).is_input_fault());
        assert!(!ProcessorError::Internal("join error".into()).is_input_fault());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!ProcessorError::from(io).is_input_fault());
    }
}
