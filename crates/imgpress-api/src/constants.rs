//! API constants

/// Prefix every route is nested under
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field carrying the upload. `image` is accepted as an alias.
pub const FILE_FIELD: &str = "file";
pub const FILE_FIELD_ALIAS: &str = "image";
