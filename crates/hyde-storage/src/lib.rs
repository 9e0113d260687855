//! Storage abstraction for the Hyde page pipeline.
//!
//! This crate provides a [`Storage`] trait covering the small filesystem
//! surface the pipeline needs: listing candidate source files, reading them,
//! checking existence, and reporting modification times. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between page discovery logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `list()`, `read()` and `mtime()` methods
//! - [`FsStorage`] implementation rooted at a project directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use hyde_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("."));
//! for path in storage.list(Path::new("_docs"), ".md")? {
//!     println!("{}", path.display());
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
