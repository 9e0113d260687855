//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores file contents in memory. Use the builder methods to configure the
/// mock with test data.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use hyde_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("_docs/index.md", "# Docs")
///     .with_mtime("_docs/index.md", 1000.0);
///
/// let content = storage.read(Path::new("_docs/index.md")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<PathBuf, String>>,
    mtimes: RwLock<HashMap<PathBuf, f64>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Set modification time for a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<PathBuf>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }

    /// Replace the contents of a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn write(&self, path: impl Into<PathBuf>, content: impl Into<String>, mtime: f64) {
        let path = path.into();
        self.mtimes.write().unwrap().insert(path.clone(), mtime);
        self.files.write().unwrap().insert(path, content.into());
    }

    /// Remove a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, path: &Path) {
        self.files.write().unwrap().remove(path);
        self.mtimes.write().unwrap().remove(path);
    }

    fn not_found(path: &Path) -> StorageError {
        StorageError::new(StorageErrorKind::NotFound)
            .with_path(path)
            .with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>, StorageError> {
        let files = self.files.read().unwrap();
        Ok(files
            .keys()
            .filter(|path| path.starts_with(dir))
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().ends_with(extension))
            })
            .filter(|path| {
                !path
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            })
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        if let Some(mtime) = self.mtimes.read().unwrap().get(path) {
            return Ok(*mtime);
        }
        if self.files.read().unwrap().contains_key(path) {
            return Ok(0.0);
        }
        Err(Self::not_found(path))
    }
}
