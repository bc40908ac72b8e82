//! Option resolution
//!
//! Merges the process-wide [`Defaults`] with per-request [`Options`]. Each field is
//! taken from the override when it is set and from the defaults otherwise. Values are
//! passed through verbatim; range checks belong to the processor.

use crate::models::{Defaults, Options, ResolvedOptions};

/// Build the effective option set for one request.
pub fn resolve(defaults: &Defaults, overrides: &Options) -> ResolvedOptions {
    let format = overrides
        .format
        .as_deref()
        .filter(|format| !format.is_empty())
        .unwrap_or(&defaults.format)
        .to_string();

    ResolvedOptions {
        format,
        quality: overrides.quality.unwrap_or(defaults.quality),
        max_width: overrides.max_width.unwrap_or(defaults.max_width),
        max_height: overrides.max_height.unwrap_or(defaults.max_height),
    }
}
