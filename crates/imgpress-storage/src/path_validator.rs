//! Path validation for storage access
//!
//! Every relative path handed to a storage backend goes through [`PathValidator::validate`]
//! first. The checks run in a fixed order and stop at the first failure, so a given input
//! always produces the same [`ValidationError`].

use std::path::{Component, Path, PathBuf};

/// Longest accepted relative path, in characters
pub const MAX_PATH_LENGTH: usize = 4096;

/// Characters that are unsafe on at least one common filesystem
const UNSAFE_CHARS: &[char] = &['*', '|', '"', '<', '>', '?'];

/// Reason a path was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty path")]
    Empty,

    #[error("path traversal attempt: contains ..")]
    Traversal,

    #[error("absolute path not allowed")]
    Absolute,

    #[error("null bytes not allowed")]
    NullByte,

    #[error("path escapes base directory")]
    EscapesBase,

    #[error("unsafe characters not allowed")]
    UnsafeCharacters,

    #[error("path too long")]
    TooLong,

    #[error("leading slash not allowed")]
    LeadingSeparator,
}

/// Confines relative paths to a base directory
#[derive(Debug, Clone)]
pub struct PathValidator {
    base_path: PathBuf,
}

impl PathValidator {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: clean_path(base_path.as_ref()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate `relative_path` and return the confined full path.
    pub fn validate(&self, relative_path: &str) -> Result<PathBuf, ValidationError> {
        if relative_path.is_empty() {
            return Err(ValidationError::Empty);
        }

        let cleaned = clean_path(Path::new(relative_path));

        if cleaned
            .components()
            .any(|component| component == Component::ParentDir)
        {
            return Err(ValidationError::Traversal);
        }

        if cleaned.is_absolute() {
            return Err(ValidationError::Absolute);
        }

        let cleaned_str = cleaned.to_string_lossy();

        if cleaned_str.contains('\0') {
            return Err(ValidationError::NullByte);
        }

        let resolved = clean_path(&self.base_path.join(&cleaned));
        if !is_within(&self.base_path, &resolved) {
            return Err(ValidationError::EscapesBase);
        }

        if cleaned_str.contains(UNSAFE_CHARS) {
            return Err(ValidationError::UnsafeCharacters);
        }

        if relative_path.chars().count() > MAX_PATH_LENGTH {
            return Err(ValidationError::TooLong);
        }

        if cleaned_str.starts_with('/') || cleaned_str.starts_with('\\') {
            return Err(ValidationError::LeadingSeparator);
        }

        Ok(resolved)
    }
}

/// Lexically resolve `.` and `..` segments without touching the filesystem.
///
/// Leading `..` segments of a relative path are kept; `..` directly under a root is dropped.
/// An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }

    components.iter().collect()
}

/// Whether `candidate` equals `base` or lies below it.
///
/// Comparison is per path component, so `/data/store-evil` is not inside `/data/store`.
/// Both paths are expected to be cleaned with [`clean_path`].
pub fn is_within(base: &Path, candidate: &Path) -> bool {
    if base == Path::new(".") {
        return !candidate.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    }

    candidate == base || candidate.starts_with(base)
}
