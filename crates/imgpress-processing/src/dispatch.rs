//! Processor dispatch
//!
//! Processors are registered once, in order, and never change afterwards. Selection scans
//! that order and returns the first processor that accepts the content type, so when two
//! processors overlap the one registered first always wins.

use std::fmt;
use std::sync::Arc;

use crate::traits::Processor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

/// Return the first processor in `processors` that supports `content_type`.
pub fn select<'a>(
    processors: &'a [Arc<dyn Processor>],
    content_type: &str,
) -> Result<&'a Arc<dyn Processor>, DispatchError> {
    processors
        .iter()
        .find(|processor| processor.supports(content_type))
        .ok_or_else(|| DispatchError::UnsupportedMediaType(content_type.to_string()))
}

/// Ordered, immutable set of processors
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    pub fn new(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self { processors }
    }

    /// Append a processor after the ones already registered.
    pub fn with(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    pub fn select(&self, content_type: &str) -> Result<&Arc<dyn Processor>, DispatchError> {
        select(&self.processors, content_type)
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.processors.iter().map(|processor| processor.name()))
            .finish()
    }
}
