//! imgpress Storage Library
//!
//! This crate provides the storage gateway contract ([`FileRepository`]), the path
//! validator that confines every caller-supplied path to the storage root, and the
//! local filesystem implementation.
//!
//! # Path rules
//!
//! Storage paths are relative to the storage root. They must not be empty, absolute,
//! or begin with a separator, must not contain `..` after normalisation, null bytes or
//! any of `* | " < > ?`, and must not exceed 4096 characters. All checks live in
//! [`path_validator`] so every backend applies the same rules.

pub mod local;
pub mod path_validator;
pub mod traits;

// Re-export commonly used types
pub use local::LocalFileStorage;
pub use path_validator::{PathValidator, ValidationError};
pub use traits::{FileRepository, StorageError, StorageResult};
