//! Error types for the page pipeline.
//!
//! Every error carries the project-relative source path of the file it was
//! raised for, so build reports can point at the offending file.

use std::fmt;

use hyde_storage::{StorageError, StorageErrorKind};

/// Category of a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed front matter block (bad YAML, non-mapping top level).
    FrontMatter,
    /// A front matter key holds a value that cannot be interpreted.
    InvalidValue {
        /// Dot-notation key of the offending value (e.g. `date`).
        key: String,
    },
}

/// Error raised while parsing a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Source path relative to the project root (empty until attached).
    pub path: String,
    /// 1-based line within the source file, when known.
    pub line: Option<usize>,
    /// Human readable detail.
    pub message: String,
}

impl ParseError {
    /// Create a front matter error at `line`.
    #[must_use]
    pub fn front_matter(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::FrontMatter,
            path: String::new(),
            line,
            message: message.into(),
        }
    }

    /// Create an error for an uninterpretable front matter value.
    #[must_use]
    pub fn invalid_value(key: &str, message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::InvalidValue {
                key: key.to_owned(),
            },
            path: String::new(),
            line: None,
            message: message.into(),
        }
    }

    /// Attach the source path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "path:line: message" or "path: invalid `key`: message"
        write!(f, "{}", self.path)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        match &self.kind {
            ParseErrorKind::FrontMatter => write!(f, ": invalid front matter: {}", self.message),
            ParseErrorKind::InvalidValue { key } => {
                write!(f, ": invalid `{key}`: {}", self.message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Error returned by the page pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Source file does not exist.
    #[error("Source file not found: {path}")]
    FileNotFound {
        /// Source path relative to the project root.
        path: String,
    },
    /// Source file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Two pages resolve to the same route key.
    #[error("Duplicate route key '{route_key}': {incoming} conflicts with {existing}")]
    DuplicateRouteKey {
        /// Conflicting route key.
        route_key: String,
        /// Source path of the page already in the collection.
        existing: String,
        /// Source path of the rejected page.
        incoming: String,
    },
    /// The same source path was discovered twice.
    #[error("Source file discovered twice: {path}")]
    DuplicateSourcePath {
        /// Source path relative to the project root.
        path: String,
    },
    /// A cross reference names an unknown route.
    #[error("{path}:{line}: unknown route '{route_key}'")]
    RouteNotFound {
        /// Route key as written in the reference.
        route_key: String,
        /// Path of the page containing the reference.
        path: String,
        /// 1-based line of the reference.
        line: usize,
    },
    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for SiteError {
    fn from(e: StorageError) -> Self {
        match (e.kind(), e.path()) {
            (StorageErrorKind::NotFound, Some(path)) => Self::FileNotFound {
                path: normalize_path(path),
            },
            _ => Self::Storage(e),
        }
    }
}

impl SiteError {
    /// Source path the error was raised for, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { path }
            | Self::DuplicateSourcePath { path }
            | Self::RouteNotFound { path, .. } => Some(path),
            Self::Parse(e) => Some(&e.path),
            Self::DuplicateRouteKey { incoming, .. } => Some(incoming),
            Self::Storage(_) => None,
        }
    }
}

/// Convert a relative path to a forward-slash string.
pub(crate) fn normalize_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
