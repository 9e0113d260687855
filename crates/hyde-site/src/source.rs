//! Discovered source files and change tracking between builds.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::kind::{KindDescriptor, PageKind};

/// A source file claimed by a page kind.
///
/// Immutable once created. `path` is relative to the project root and uses
/// forward slashes; `identifier` is the path relative to the kind's source
/// directory without the extension.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    path: String,
    identifier: String,
    descriptor: Arc<KindDescriptor>,
    mtime: Option<f64>,
    contents: Option<String>,
}

impl SourceFile {
    /// Create a source file for `path` under `descriptor`.
    ///
    /// The identifier is derived by stripping the source directory and the
    /// extension from `path`.
    #[must_use]
    pub fn new(descriptor: &Arc<KindDescriptor>, path: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let identifier = derive_identifier(&path, descriptor);
        Self {
            path,
            identifier,
            descriptor: Arc::clone(descriptor),
            mtime: None,
            contents: None,
        }
    }

    /// Attach a modification time.
    #[must_use]
    pub fn with_mtime(mut self, mtime: f64) -> Self {
        self.mtime = Some(mtime);
        self
    }

    /// Attach inline contents, used instead of reading through storage.
    #[must_use]
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Path relative to the project root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Identifier relative to the kind's source directory.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Page kind.
    #[must_use]
    pub fn kind(&self) -> PageKind {
        self.descriptor.kind
    }

    /// Descriptor of the claiming kind.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<KindDescriptor> {
        &self.descriptor
    }

    /// Modification time in seconds since the Unix epoch, if known.
    #[must_use]
    pub fn mtime(&self) -> Option<f64> {
        self.mtime
    }

    /// Inline contents, if the file was contributed without backing storage.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

fn derive_identifier(path: &str, descriptor: &KindDescriptor) -> String {
    let relative = if descriptor.source_dir.is_empty() {
        path
    } else {
        path.strip_prefix(descriptor.source_dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };
    relative
        .strip_suffix(descriptor.extension.as_str())
        .unwrap_or(relative)
        .to_owned()
}

/// Modification times of every source in a build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSnapshot {
    mtimes: BTreeMap<String, Option<f64>>,
}

impl SourceSnapshot {
    /// Record the sources of a build.
    #[must_use]
    pub fn from_sources(sources: &[SourceFile]) -> Self {
        Self {
            mtimes: sources
                .iter()
                .map(|source| (source.path.clone(), source.mtime))
                .collect(),
        }
    }

    /// Number of recorded sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mtimes.len()
    }

    /// Whether no sources were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mtimes.is_empty()
    }

    /// Compare against a newer snapshot.
    ///
    /// A source is modified when its modification time changed. Sources
    /// without a known time are never reported as modified.
    #[must_use]
    pub fn diff(&self, current: &SourceSnapshot) -> SourceDiff {
        let mut diff = SourceDiff::default();
        for (path, mtime) in &current.mtimes {
            match self.mtimes.get(path) {
                None => diff.added.push(path.clone()),
                Some(previous) if previous != mtime => diff.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        diff.removed = self
            .mtimes
            .keys()
            .filter(|path| !current.mtimes.contains_key(*path))
            .cloned()
            .collect();
        diff
    }
}

/// Source paths that changed between two snapshots (each sorted).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceDiff {
    /// Sources present only in the newer snapshot.
    pub added: Vec<String>,
    /// Sources whose modification time changed.
    pub modified: Vec<String>,
    /// Sources present only in the older snapshot.
    pub removed: Vec<String>,
}

impl SourceDiff {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Whether `path` must be parsed again.
    #[must_use]
    pub fn needs_parse(&self, path: &str) -> bool {
        self.added.iter().chain(&self.modified).any(|p| p == path)
    }
}
