//! Page kinds and their dispatch table.
//!
//! Each [`PageKind`] has fixed [`Capabilities`]; its directories and source
//! extension come from configuration and are carried by a [`KindDescriptor`].
//! Publications produce one descriptor per configured publication type.

use std::fmt;
use std::sync::Arc;

use hyde_config::{Config, KindDirs};
use serde::Serialize;

/// Closed set of page kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Raw HTML page, copied as is.
    Html,
    /// Blade template page.
    Blade,
    /// Markdown page.
    Markdown,
    /// Blog post.
    Post,
    /// Documentation page.
    Documentation,
    /// Page of a configured publication type.
    Publication,
}

/// Behaviour switches for a page kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Source starts with an optional YAML front matter block.
    pub has_front_matter: bool,
    /// Pages are grouped into categories.
    pub is_grouped: bool,
    /// Pages appear in the documentation sidebar.
    pub has_sidebar: bool,
    /// Pages are candidates for the main navigation menu.
    pub in_main_menu: bool,
    /// Pages carry date, author, image and description.
    pub has_blog_metadata: bool,
}

impl PageKind {
    /// Every kind, in dispatch table order.
    pub const ALL: [PageKind; 6] = [
        PageKind::Html,
        PageKind::Blade,
        PageKind::Markdown,
        PageKind::Post,
        PageKind::Documentation,
        PageKind::Publication,
    ];

    /// Lowercase name used in logs and CLI output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Blade => "blade",
            Self::Markdown => "markdown",
            Self::Post => "post",
            Self::Documentation => "documentation",
            Self::Publication => "publication",
        }
    }

    /// Fixed capabilities of this kind.
    #[must_use]
    pub fn capabilities(self) -> Capabilities {
        let none = Capabilities {
            has_front_matter: false,
            is_grouped: false,
            has_sidebar: false,
            in_main_menu: false,
            has_blog_metadata: false,
        };
        match self {
            Self::Html | Self::Blade => Capabilities {
                in_main_menu: true,
                ..none
            },
            Self::Markdown => Capabilities {
                has_front_matter: true,
                in_main_menu: true,
                ..none
            },
            Self::Post => Capabilities {
                has_front_matter: true,
                is_grouped: true,
                has_blog_metadata: true,
                ..none
            },
            Self::Documentation => Capabilities {
                has_front_matter: true,
                is_grouped: true,
                has_sidebar: true,
                ..none
            },
            Self::Publication => Capabilities {
                has_front_matter: true,
                has_blog_metadata: true,
                ..none
            },
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Where a kind's sources live and where its pages are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindDescriptor {
    /// Page kind.
    pub kind: PageKind,
    /// Source directory relative to the project root (forward slashes).
    pub source_dir: String,
    /// Output directory relative to the site root (empty for the root).
    pub output_dir: String,
    /// Source extension including the leading dot.
    pub extension: String,
    /// Publication type name, for [`PageKind::Publication`] descriptors.
    pub publication_type: Option<String>,
}

impl KindDescriptor {
    /// Create a descriptor from explicit directories.
    #[must_use]
    pub fn new(kind: PageKind, source_dir: &str, output_dir: &str, extension: &str) -> Self {
        Self {
            kind,
            source_dir: source_dir.trim_matches('/').to_owned(),
            output_dir: output_dir.trim_matches('/').to_owned(),
            extension: extension.to_owned(),
            publication_type: None,
        }
    }

    fn from_dirs(kind: PageKind, dirs: &KindDirs) -> Self {
        Self::new(kind, &dirs.source_dir, &dirs.output_dir, &dirs.extension)
    }

    /// Descriptor for a publication type.
    #[must_use]
    pub fn publication(name: &str) -> Self {
        Self {
            publication_type: Some(name.to_owned()),
            ..Self::new(PageKind::Publication, name, name, ".md")
        }
    }

    /// Capabilities of the described kind.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Build the dispatch table from configuration.
    ///
    /// Order matches [`PageKind::ALL`], with publication types last in
    /// configuration order.
    #[must_use]
    pub fn table(config: &Config) -> Vec<Arc<KindDescriptor>> {
        let pages = &config.pages;
        let mut table = vec![
            Self::from_dirs(PageKind::Html, &pages.html),
            Self::from_dirs(PageKind::Blade, &pages.blade),
            Self::from_dirs(PageKind::Markdown, &pages.markdown),
            Self::from_dirs(PageKind::Post, &pages.posts),
            Self::from_dirs(PageKind::Documentation, &pages.docs),
        ];
        table.extend(
            config
                .publications
                .types
                .iter()
                .map(|name| Self::publication(name)),
        );
        table.into_iter().map(Arc::new).collect()
    }

    /// Route key for a page with `identifier`.
    ///
    /// `output_dir/identifier` with surrounding slashes trimmed.
    #[must_use]
    pub fn route_key(&self, identifier: &str) -> String {
        format!("{}/{}", self.output_dir, identifier)
            .trim_matches('/')
            .to_owned()
    }
}
