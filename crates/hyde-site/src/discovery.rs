//! Source file discovery.
//!
//! [`FileDiscoverer`] lists `source_dir/**/*<extension>` for each kind through
//! the [`Storage`] backend. Files whose basename starts with `_` are partials
//! and never become pages. When two kinds share a source directory, a file
//! is claimed only by the kind with the most specific matching extension
//! (`welcome.blade.php` belongs to Blade even if another kind uses `.php`).
//!
//! Registered [`DiscoveryExtension`]s contribute extra sources after the
//! directory listing.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use hyde_storage::Storage;

use crate::error::{SiteError, normalize_path};
use crate::kind::KindDescriptor;
use crate::source::SourceFile;

/// Hook contributing sources that are not found by directory listing.
///
/// Contributed files may carry inline contents (see
/// [`SourceFile::with_contents`]) when they don't exist in storage.
pub trait DiscoveryExtension: Send + Sync {
    /// Extra sources for `descriptor`.
    fn discover(&self, descriptor: &Arc<KindDescriptor>) -> Vec<SourceFile>;
}

/// Lists source files for every kind in the dispatch table.
pub struct FileDiscoverer {
    storage: Arc<dyn Storage>,
    descriptors: Vec<Arc<KindDescriptor>>,
    extensions: Vec<Arc<dyn DiscoveryExtension>>,
}

impl FileDiscoverer {
    /// Create a discoverer over `descriptors`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, descriptors: Vec<Arc<KindDescriptor>>) -> Self {
        Self {
            storage,
            descriptors,
            extensions: Vec::new(),
        }
    }

    /// Register a discovery extension.
    pub fn register(&mut self, extension: Arc<dyn DiscoveryExtension>) {
        self.extensions.push(extension);
    }

    /// Dispatch table this discoverer walks.
    #[must_use]
    pub fn descriptors(&self) -> &[Arc<KindDescriptor>] {
        &self.descriptors
    }

    /// Discover sources for one kind.
    ///
    /// Listed files come first in lexical order, followed by extension
    /// contributions in registration order. A missing source directory
    /// yields no files.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::DuplicateSourcePath`] if an extension contributes
    /// a path already discovered, or [`SiteError::Storage`] if listing fails.
    pub fn discover(&self, descriptor: &Arc<KindDescriptor>) -> Result<Vec<SourceFile>, SiteError> {
        let mut seen = HashSet::new();
        self.discover_into(descriptor, &mut seen)
    }

    /// Discover sources for every kind in dispatch table order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::DuplicateSourcePath`] if two kinds claim the same
    /// file, or any error from [`discover`](Self::discover).
    pub fn discover_all(&self) -> Result<Vec<SourceFile>, SiteError> {
        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for descriptor in &self.descriptors {
            sources.extend(self.discover_into(descriptor, &mut seen)?);
        }
        Ok(sources)
    }

    fn discover_into(
        &self,
        descriptor: &Arc<KindDescriptor>,
        seen: &mut HashSet<String>,
    ) -> Result<Vec<SourceFile>, SiteError> {
        let shadowing = self.shadowing_extensions(descriptor);
        let listed = self
            .storage
            .list(Path::new(&descriptor.source_dir), &descriptor.extension)?;

        let mut sources = Vec::with_capacity(listed.len());
        for path in listed {
            let relative = normalize_path(&path);
            let basename = relative.rsplit('/').next().unwrap_or(&relative);
            if basename.starts_with('_') {
                tracing::debug!(path = %relative, "Skipping partial");
                continue;
            }
            if shadowing.iter().any(|ext| basename.ends_with(ext)) {
                continue;
            }

            let mut source = SourceFile::new(descriptor, relative);
            if let Ok(mtime) = self.storage.mtime(&path) {
                source = source.with_mtime(mtime);
            }
            claim(seen, source.path())?;
            sources.push(source);
        }

        for extension in &self.extensions {
            for source in extension.discover(descriptor) {
                claim(seen, source.path())?;
                sources.push(source);
            }
        }

        tracing::debug!(
            kind = %descriptor.kind,
            dir = %descriptor.source_dir,
            count = sources.len(),
            "Discovered sources"
        );
        Ok(sources)
    }

    /// Longer extensions of other kinds sharing the directory that end with
    /// this descriptor's extension.
    fn shadowing_extensions(&self, descriptor: &KindDescriptor) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|other| other.source_dir == descriptor.source_dir)
            .filter(|other| {
                other.extension.len() > descriptor.extension.len()
                    && other.extension.ends_with(descriptor.extension.as_str())
            })
            .map(|other| other.extension.as_str())
            .collect()
    }
}

fn claim(seen: &mut HashSet<String>, path: &str) -> Result<(), SiteError> {
    if seen.insert(path.to_owned()) {
        Ok(())
    } else {
        Err(SiteError::DuplicateSourcePath {
            path: path.to_owned(),
        })
    }
}
