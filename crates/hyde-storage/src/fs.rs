//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for listing and reading source files below a
//! project root on the local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use glob::{MatchOptions, Pattern};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Glob options: case sensitive, and dot-prefixed entries only match literally.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Filesystem storage implementation.
///
/// All paths are resolved against the project root given at construction.
/// Paths that try to escape the root with `..` are rejected.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use hyde_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("my-site"));
/// let sources = storage.list(Path::new("_posts"), ".md")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Project root directory.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Validate that a path doesn't escape the project root.
    ///
    /// Rejects paths containing parent directory components (`..`) or
    /// absolute paths.
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Build the recursive glob pattern for `dir` and `extension`.
    fn pattern_for(&self, dir: &Path, extension: &str) -> Result<String, StorageError> {
        let base = self.root.join(dir);
        let base = base.to_str().ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(dir)
                .with_backend(BACKEND)
        })?;
        Ok(format!(
            "{}/**/*{}",
            Pattern::escape(base.trim_end_matches(['/', '\\'])),
            Pattern::escape(extension)
        ))
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>, StorageError> {
        Self::validate_path(dir)?;

        if !self.root.join(dir).is_dir() {
            tracing::debug!(dir = %dir.display(), "Source directory missing, nothing to list");
            return Ok(Vec::new());
        }

        let pattern = self.pattern_for(dir, extension)?;
        let entries = glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(dir)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                StorageError::io(e.into(), Some(path)).with_backend(BACKEND)
            })?;
            if !path.is_file() {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(&self.root) {
                paths.push(relative.to_path_buf());
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        let metadata = fs::metadata(&full_path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;
        let modified = metadata
            .modified()
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}
