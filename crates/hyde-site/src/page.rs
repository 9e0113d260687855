//! Page model.
//!
//! [`PageModelBuilder`] turns a [`SourceFile`] and its parsed
//! [`FrontMatterDocument`] into a [`Page`] with derived title, category,
//! navigation data and kind-specific metadata.
//!
//! # Title
//!
//! 1. `title` front matter value (non-empty)
//! 2. First `# Heading` line of the body
//! 3. Identifier converted to title case (`guide/my-page` → `Guide My Page`)
//!
//! # Navigation defaults
//!
//! | Field      | Front matter                            | Default |
//! |------------|-----------------------------------------|---------|
//! | `hidden`   | `navigation.hidden`, `hidden`           | `true` for documentation `index`, else `false` |
//! | `priority` | `navigation.priority`, `priority`       | position in `docs.sidebar.order`; `0` for the root `index` of menu pages; else `999` |
//! | `label`    | `navigation.label`                      | `Home` for the root `index` of menu pages; else the title |

use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use hyde_storage::Storage;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::author::{GUEST_USERNAME, PostAuthor};
use crate::context::BuildContext;
use crate::error::{ParseError, SiteError};
use crate::front_matter::FrontMatterDocument;
use crate::kind::{Capabilities, PageKind};
use crate::source::SourceFile;

/// Priority of pages that set none and have no positional default.
pub const DEFAULT_PRIORITY: i64 = 999;

/// Maximum length of a description derived from the body.
const DESCRIPTION_LENGTH: usize = 125;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());

static MARKDOWN_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`~>#]+").unwrap());

/// Navigation data for menus and the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationData {
    /// Excluded from every navigation tree.
    pub hidden: bool,
    /// Sort priority (lower first).
    pub priority: i64,
    /// Display label.
    pub label: String,
}

/// Featured image of a post.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeaturedImage {
    /// Local path or remote URL.
    pub source: String,
    /// Alternative text.
    pub alt: Option<String>,
    /// Title attribute.
    pub title: Option<String>,
    /// Credited author.
    pub credit: Option<String>,
    /// License name.
    pub license: Option<String>,
    /// Copyright notice.
    pub copyright: Option<String>,
}

impl FeaturedImage {
    /// Image with only a source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Whether the source is a remote URL.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://")
            || self.source.starts_with("https://")
            || self.source.starts_with("//")
    }

    fn from_mapping(mapping: &Mapping) -> Result<Self, ParseError> {
        let field = |key: &str| mapping.get(key).and_then(Value::as_str).map(str::to_owned);
        let source = ["source", "path", "url"]
            .into_iter()
            .find_map(field)
            .ok_or_else(|| ParseError::invalid_value("image", "needs a source, path or url"))?;
        Ok(Self {
            source,
            alt: field("alt"),
            title: field("title"),
            credit: field("credit"),
            license: field("license"),
            copyright: field("copyright"),
        })
    }
}

/// Metadata of posts and publication pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlogMetadata {
    /// Publication date.
    pub date: Option<NaiveDateTime>,
    /// Author, shared with the registry.
    pub author: Option<Arc<PostAuthor>>,
    /// Featured image.
    pub image: Option<FeaturedImage>,
    /// Short description.
    pub description: Option<String>,
}

/// Metadata of documentation pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocsMetadata {
    /// Link to edit the source, when an edit base URL is configured.
    pub edit_url: Option<String>,
}

/// A page built from one source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Page kind.
    pub kind: PageKind,
    /// Path relative to the kind's source directory without extension.
    pub identifier: String,
    /// Unique key across the site (`output_dir/identifier`).
    pub route_key: String,
    /// Source path relative to the project root.
    pub source_path: String,
    /// Resolved title.
    pub title: String,
    /// Category of grouped kinds.
    pub category: Option<String>,
    /// Navigation data.
    pub navigation: NavigationData,
    /// Front matter, kept for templates.
    pub matter: Mapping,
    /// Body without front matter.
    pub body: String,
    /// Source lines preceding the body.
    pub body_offset: usize,
    /// Post and publication metadata.
    pub blog: Option<BlogMetadata>,
    /// Documentation metadata.
    pub docs: Option<DocsMetadata>,
}

impl Page {
    /// Output path relative to the site root (`route_key.html`).
    #[must_use]
    pub fn output_path(&self) -> String {
        format!("{}.html", self.route_key)
    }

    /// Publication date, for kinds with blog metadata.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.blog.as_ref().and_then(|blog| blog.date)
    }
}

/// Builds [`Page`]s from sources.
pub struct PageModelBuilder<'a> {
    context: &'a BuildContext,
}

impl<'a> PageModelBuilder<'a> {
    /// Create a builder for one build.
    #[must_use]
    pub fn new(context: &'a BuildContext) -> Self {
        Self { context }
    }

    /// Read and parse `source`, then build its page.
    ///
    /// Inline contents contributed by a discovery extension take precedence
    /// over storage.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::FileNotFound`] if the source is missing and
    /// [`SiteError::Parse`] if it cannot be parsed.
    pub fn build_from_file(
        &self,
        source: &SourceFile,
        storage: &dyn Storage,
    ) -> Result<Page, SiteError> {
        let raw = match source.contents() {
            Some(contents) => contents.to_owned(),
            None => storage.read(Path::new(source.path()))?,
        };
        let document = if source.descriptor().capabilities().has_front_matter {
            FrontMatterDocument::parse(&raw).map_err(|e| e.with_path(source.path()))?
        } else {
            FrontMatterDocument::from_body(&raw)
        };
        Ok(self.build(source, document)?)
    }

    /// Build the page for `source` from an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a blog metadata value cannot be interpreted.
    pub fn build(
        &self,
        source: &SourceFile,
        document: FrontMatterDocument,
    ) -> Result<Page, ParseError> {
        let descriptor = source.descriptor();
        let capabilities = descriptor.capabilities();
        let identifier = source.identifier();

        let title = resolve_title(&document, identifier);
        let category = capabilities
            .is_grouped
            .then(|| resolve_category(&document, identifier))
            .flatten();
        let navigation = self.resolve_navigation(&document, capabilities, identifier, &title);
        let blog = if capabilities.has_blog_metadata {
            Some(
                self.resolve_blog(&document)
                    .map_err(|e| e.with_path(source.path()))?,
            )
        } else {
            None
        };
        let docs = capabilities.has_sidebar.then(|| DocsMetadata {
            edit_url: self.context.docs().edit_base_url.as_ref().map(|base| {
                format!("{}/{}", base.trim_end_matches('/'), source.path())
            }),
        });

        let body_offset = document.body_offset();
        let (matter, body) = document.into_parts();
        Ok(Page {
            kind: descriptor.kind,
            identifier: identifier.to_owned(),
            route_key: descriptor.route_key(identifier),
            source_path: source.path().to_owned(),
            title,
            category,
            navigation,
            matter,
            body,
            body_offset,
            blog,
            docs,
        })
    }

    fn resolve_navigation(
        &self,
        document: &FrontMatterDocument,
        capabilities: Capabilities,
        identifier: &str,
        title: &str,
    ) -> NavigationData {
        let is_index = identifier == "index";
        let is_home = capabilities.in_main_menu && is_index;

        let hidden = document
            .get_bool("navigation.hidden")
            .or_else(|| document.get_bool("hidden"))
            .unwrap_or(capabilities.has_sidebar && is_index);

        let priority = document
            .get_i64("navigation.priority")
            .or_else(|| document.get_i64("priority"))
            .or_else(|| {
                capabilities
                    .has_sidebar
                    .then(|| self.context.sidebar_position(identifier))
                    .flatten()
                    .and_then(|position| i64::try_from(position).ok())
            })
            .unwrap_or(if is_home { 0 } else { DEFAULT_PRIORITY });

        let label = match document.get_scalar("navigation.label") {
            Some(label) => label,
            None if is_home => "Home".to_owned(),
            None => title.to_owned(),
        };

        NavigationData {
            hidden,
            priority,
            label,
        }
    }

    fn resolve_blog(&self, document: &FrontMatterDocument) -> Result<BlogMetadata, ParseError> {
        let date = match document.get_value("date") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(parse_date(raw).ok_or_else(|| {
                ParseError::invalid_value(
                    "date",
                    format!("'{raw}' is not a date (expected YYYY-MM-DD [HH:MM[:SS]] or RFC 3339)"),
                )
            })?),
            Some(_) => {
                return Err(ParseError::invalid_value("date", "expected a date string"));
            }
        };

        let image = match document.get_value("image") {
            None | Some(Value::Null) => None,
            Some(Value::String(source)) => Some(FeaturedImage::new(source.as_str())),
            Some(Value::Mapping(mapping)) => Some(FeaturedImage::from_mapping(mapping)?),
            Some(_) => {
                return Err(ParseError::invalid_value(
                    "image",
                    "expected a path, a URL or a mapping",
                ));
            }
        };

        let description = document
            .get_str("description")
            .map(str::to_owned)
            .or_else(|| excerpt(document.body()));

        Ok(BlogMetadata {
            date,
            author: self.resolve_author(document)?,
            image,
            description,
        })
    }

    fn resolve_author(
        &self,
        document: &FrontMatterDocument,
    ) -> Result<Option<Arc<PostAuthor>>, ParseError> {
        let authors = self.context.authors();
        match document.get_value("author") {
            None | Some(Value::Null) => Ok(self
                .context
                .default_author()
                .map(|username| authors.resolve(username))),
            Some(Value::String(username)) => Ok(Some(authors.resolve(username))),
            Some(Value::Mapping(mapping)) => {
                let field = |key: &str| mapping.get(key).and_then(Value::as_str).map(str::to_owned);
                let username = field("username").unwrap_or_else(|| GUEST_USERNAME.to_owned());
                if let Some(author) = authors.get(&username) {
                    return Ok(Some(author));
                }
                Ok(Some(Arc::new(PostAuthor {
                    name: field("name").unwrap_or_else(|| username.clone()),
                    website: field("website"),
                    username,
                })))
            }
            Some(_) => Err(ParseError::invalid_value(
                "author",
                "expected a username or a mapping",
            )),
        }
    }
}

fn resolve_title(document: &FrontMatterDocument, identifier: &str) -> String {
    if let Some(title) = document.get_scalar("title")
        && !title.trim().is_empty()
    {
        return title.trim().to_owned();
    }
    H1_RE
        .captures(document.body())
        .map(|caps| caps[1].trim().to_owned())
        .filter(|heading| !heading.is_empty())
        .unwrap_or_else(|| titleize(identifier))
}

fn resolve_category(document: &FrontMatterDocument, identifier: &str) -> Option<String> {
    if let Some((dir, _)) = identifier.split_once('/') {
        return Some(dir.to_owned());
    }
    document
        .get_scalar("category")
        .or_else(|| document.get_scalar("navigation.group"))
}

/// Convert an identifier to title case.
///
/// Splits on `/` and `-`, capitalizes each word and joins with spaces.
/// Underscores are kept inside words.
#[must_use]
pub fn titleize(identifier: &str) -> String {
    identifier
        .split(['/', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parse a front matter date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` and
/// RFC 3339 (converted to UTC).
fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Plain-text excerpt of the first paragraph that is not a heading.
fn excerpt(body: &str) -> Option<String> {
    let paragraph = body
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))?;
    let text = MARKDOWN_LINK_RE.replace_all(paragraph, "$1");
    let text = MARKDOWN_MARKER_RE.replace_all(&text, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let excerpt: String = text.chars().take(DESCRIPTION_LENGTH).collect();
    let excerpt = excerpt.trim_end();
    (!excerpt.is_empty()).then(|| excerpt.to_owned())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{NaiveDate, Timelike};
    use hyde_config::Config;
    use hyde_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ParseErrorKind;
    use crate::kind::KindDescriptor;

    fn context(toml: &str) -> BuildContext {
        BuildContext::from_config(&Config::from_toml_str(toml, Path::new("/site")).unwrap())
    }

    fn descriptor(context: &BuildContext, kind: PageKind) -> Arc<KindDescriptor> {
        context
            .descriptors()
            .iter()
            .find(|d| d.kind == kind)
            .map(Arc::clone)
            .unwrap()
    }

    fn build(context: &BuildContext, kind: PageKind, path: &str, raw: &str) -> Page {
        try_build(context, kind, path, raw).unwrap()
    }

    fn try_build(
        context: &BuildContext,
        kind: PageKind,
        path: &str,
        raw: &str,
    ) -> Result<Page, SiteError> {
        let source = SourceFile::new(&descriptor(context, kind), path).with_contents(raw);
        PageModelBuilder::new(context).build_from_file(&source, &MockStorage::new())
    }

    // ========================================================================
    // Title
    // ========================================================================

    #[test]
    fn test_title_from_front_matter() {
        let ctx = context("");
        let page = build(
            &ctx,
            PageKind::Documentation,
            "_docs/guide/install.md",
            "---\ntitle: Installing\n---\n# Install Guide",
        );

        assert_eq!(page.title, "Installing");
        assert_eq!(page.category.as_deref(), Some("guide"));
        assert_eq!(page.route_key, "docs/guide/install");
        assert_eq!(page.identifier, "guide/install");
    }

    #[test]
    fn test_title_from_heading() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Markdown, "_pages/about.md", "Intro\n\n#  About Us  \n");

        assert_eq!(page.title, "About Us");
    }

    #[test]
    fn test_title_empty_front_matter_falls_through() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Markdown, "_pages/about.md", "---\ntitle: \"  \"\n---\n# Heading");

        assert_eq!(page.title, "Heading");
    }

    #[test]
    fn test_title_from_identifier() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Markdown, "_pages/my-page.md", "No heading here.");

        assert_eq!(page.title, "My Page");
    }

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("my-page"), "My Page");
        assert_eq!(titleize("guide/getting-started"), "Guide Getting Started");
        assert_eq!(titleize("--x--"), "X");
        assert_eq!(titleize(""), "");
    }

    #[test]
    fn test_titleize_keeps_underscores() {
        assert_eq!(titleize("my_page"), "My_page");
        assert_eq!(titleize("api/rest_v2-notes"), "Api Rest_v2 Notes");
    }

    #[test]
    fn test_non_string_scalars_resolve_as_text() {
        let ctx = context("");
        let year = build(&ctx, PageKind::Markdown, "_pages/recap.md", "---\ntitle: 2024\n---\nBody text");
        let flag = build(&ctx, PageKind::Markdown, "_pages/flag.md", "---\ntitle: true\n---\n# Heading");
        let release = build(
            &ctx,
            PageKind::Post,
            "_posts/notes.md",
            "---\ncategory: 2024\nnavigation:\n  label: 404\n---\n",
        );

        assert_eq!(year.title, "2024");
        assert_eq!(flag.title, "true");
        assert_eq!(release.category.as_deref(), Some("2024"));
        assert_eq!(release.navigation.label, "404");
    }

    #[test]
    fn test_body_offset_from_front_matter() {
        let ctx = context("");
        let with_block = build(&ctx, PageKind::Markdown, "_pages/a.md", "---\ntitle: A\n---\n\nBody");
        let plain = build(&ctx, PageKind::Markdown, "_pages/b.md", "Body");
        let html = build(&ctx, PageKind::Html, "_pages/c.html", "---\ntitle: x\n---\n<p>hi</p>");

        assert_eq!(with_block.body_offset, 4);
        assert_eq!(plain.body_offset, 0);
        assert_eq!(html.body_offset, 0);
    }

    // ========================================================================
    // Category
    // ========================================================================

    #[test]
    fn test_subdirectory_category_wins_over_front_matter() {
        let ctx = context("");
        let page = build(
            &ctx,
            PageKind::Documentation,
            "_docs/guide/install.md",
            "---\ncategory: other\n---\n",
        );

        assert_eq!(page.category.as_deref(), Some("guide"));
    }

    #[test]
    fn test_category_from_front_matter() {
        let ctx = context("");
        let from_category = build(&ctx, PageKind::Post, "_posts/a.md", "---\ncategory: news\n---\n");
        let from_group = build(
            &ctx,
            PageKind::Documentation,
            "_docs/b.md",
            "---\nnavigation:\n  group: reference\n---\n",
        );

        assert_eq!(from_category.category.as_deref(), Some("news"));
        assert_eq!(from_group.category.as_deref(), Some("reference"));
    }

    #[test]
    fn test_ungrouped_kind_has_no_category() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Markdown, "_pages/blog/a.md", "---\ncategory: x\n---\n");

        assert_eq!(page.category, None);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn test_docs_index_hidden_by_default() {
        let ctx = context("");
        let index = build(&ctx, PageKind::Documentation, "_docs/index.md", "# Docs");
        let other = build(&ctx, PageKind::Documentation, "_docs/setup.md", "# Setup");

        assert!(index.navigation.hidden);
        assert!(!other.navigation.hidden);
    }

    #[test]
    fn test_hidden_front_matter_overrides_default() {
        let ctx = context("");
        let index = build(
            &ctx,
            PageKind::Documentation,
            "_docs/index.md",
            "---\nnavigation:\n  hidden: false\n---\n",
        );
        let page = build(&ctx, PageKind::Markdown, "_pages/secret.md", "---\nhidden: true\n---\n");

        assert!(!index.navigation.hidden);
        assert!(page.navigation.hidden);
    }

    #[test]
    fn test_root_index_is_home() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Blade, "_pages/index.blade.php", "<h1>Welcome</h1>");

        assert_eq!(page.navigation.label, "Home");
        assert_eq!(page.navigation.priority, 0);
        assert!(!page.navigation.hidden);
        assert_eq!(page.output_path(), "index.html");
    }

    #[test]
    fn test_priority_sources() {
        let ctx = context("[docs.sidebar]\norder = [\"readme\", \"installation\"]");
        let explicit = build(
            &ctx,
            PageKind::Documentation,
            "_docs/installation.md",
            "---\nnavigation:\n  priority: 5\n---\n",
        );
        let ordered = build(&ctx, PageKind::Documentation, "_docs/installation.md", "");
        let flat = build(&ctx, PageKind::Markdown, "_pages/a.md", "---\npriority: 7\n---\n");
        let fallback = build(&ctx, PageKind::Markdown, "_pages/b.md", "");

        assert_eq!(explicit.navigation.priority, 5);
        assert_eq!(ordered.navigation.priority, 1);
        assert_eq!(flat.navigation.priority, 7);
        assert_eq!(fallback.navigation.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_label_defaults_to_title() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Markdown, "_pages/about.md", "# About Us");
        let labelled = build(
            &ctx,
            PageKind::Markdown,
            "_pages/contact.md",
            "---\nnavigation:\n  label: Reach Out\n---\n",
        );

        assert_eq!(page.navigation.label, "About Us");
        assert_eq!(labelled.navigation.label, "Reach Out");
    }

    // ========================================================================
    // Kind-specific metadata
    // ========================================================================

    #[test]
    fn test_html_front_matter_is_body() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Html, "_pages/raw.html", "---\ntitle: x\n---\n<p>hi</p>");

        assert!(page.matter.is_empty());
        assert!(page.body.starts_with("---"));
        assert_eq!(page.title, "Raw");
        assert!(page.blog.is_none());
        assert!(page.docs.is_none());
    }

    #[test]
    fn test_docs_edit_url() {
        let ctx = context("[docs]\nedit_base_url = \"https://github.com/org/repo/blob/main/\"");
        let page = build(&ctx, PageKind::Documentation, "_docs/guide/install.md", "");

        assert_eq!(
            page.docs.unwrap().edit_url.as_deref(),
            Some("https://github.com/org/repo/blob/main/_docs/guide/install.md")
        );
    }

    #[test]
    fn test_docs_without_edit_base() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Documentation, "_docs/a.md", "");

        assert_eq!(page.docs, Some(DocsMetadata { edit_url: None }));
    }

    #[test]
    fn test_post_dates() {
        let ctx = context("");
        let date_only = build(&ctx, PageKind::Post, "_posts/a.md", "---\ndate: 2024-06-01\n---\n");
        let minutes = build(&ctx, PageKind::Post, "_posts/b.md", "---\ndate: \"2024-06-01 14:30\"\n---\n");
        let rfc = build(
            &ctx,
            PageKind::Post,
            "_posts/c.md",
            "---\ndate: \"2024-06-01T14:30:00+02:00\"\n---\n",
        );
        let none = build(&ctx, PageKind::Post, "_posts/d.md", "");

        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(date_only.date(), day.and_hms_opt(0, 0, 0));
        assert_eq!(minutes.date(), day.and_hms_opt(14, 30, 0));
        assert_eq!(rfc.date().unwrap().hour(), 12);
        assert_eq!(none.date(), None);
    }

    #[test]
    fn test_invalid_date_names_key() {
        let ctx = context("");
        let err = try_build(&ctx, PageKind::Post, "_posts/bad.md", "---\ndate: next tuesday\n---\n")
            .unwrap_err();

        let SiteError::Parse(err) = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert_eq!(
            err.kind,
            ParseErrorKind::InvalidValue {
                key: "date".to_owned()
            }
        );
        assert_eq!(err.path, "_posts/bad.md");
    }

    #[test]
    fn test_malformed_front_matter_carries_path() {
        let ctx = context("");
        let err = try_build(&ctx, PageKind::Markdown, "_pages/x.md", "---\ntitle: [unclosed\n---\n")
            .unwrap_err();

        assert!(matches!(err, SiteError::Parse(ref e) if e.path == "_pages/x.md"));
    }

    #[test]
    fn test_missing_source_is_file_not_found() {
        let ctx = context("");
        let source = SourceFile::new(&descriptor(&ctx, PageKind::Markdown), "_pages/gone.md");

        let err = PageModelBuilder::new(&ctx)
            .build_from_file(&source, &MockStorage::new())
            .unwrap_err();

        assert!(matches!(err, SiteError::FileNotFound { ref path } if path == "_pages/gone.md"));
    }

    #[test]
    fn test_build_reads_storage() {
        let ctx = context("");
        let storage = MockStorage::new().with_file("_pages/about.md", "# About");
        let source = SourceFile::new(&descriptor(&ctx, PageKind::Markdown), "_pages/about.md");

        let page = PageModelBuilder::new(&ctx).build_from_file(&source, &storage).unwrap();

        assert_eq!(page.title, "About");
    }

    #[test]
    fn test_author_resolution() {
        let ctx = context(
            "[authors.mr_hyde]\nname = \"Mr. Hyde\"\n\n[posts]\ndefault_author = \"mr_hyde\"",
        );
        let by_name = build(&ctx, PageKind::Post, "_posts/a.md", "---\nauthor: mr_hyde\n---\n");
        let unknown = build(&ctx, PageKind::Post, "_posts/b.md", "---\nauthor: jane\n---\n");
        let inline = build(
            &ctx,
            PageKind::Post,
            "_posts/c.md",
            "---\nauthor:\n  name: Anon\n  website: https://anon.dev\n---\n",
        );
        let registered_inline = build(
            &ctx,
            PageKind::Post,
            "_posts/d.md",
            "---\nauthor:\n  username: mr_hyde\n  name: Ignored\n---\n",
        );
        let defaulted = build(&ctx, PageKind::Post, "_posts/e.md", "");

        let author = |page: &Page| page.blog.as_ref().unwrap().author.clone().unwrap();
        assert_eq!(author(&by_name).name, "Mr. Hyde");
        assert_eq!(*author(&unknown), PostAuthor::from_username("jane"));
        assert_eq!(author(&inline).username, GUEST_USERNAME);
        assert_eq!(author(&inline).name, "Anon");
        assert_eq!(author(&inline).website.as_deref(), Some("https://anon.dev"));
        assert_eq!(author(&registered_inline).name, "Mr. Hyde");
        assert!(Arc::ptr_eq(&author(&defaulted), &author(&by_name)));
    }

    #[test]
    fn test_no_author_without_default() {
        let ctx = context("");
        let page = build(&ctx, PageKind::Post, "_posts/a.md", "");

        assert!(page.blog.unwrap().author.is_none());
    }

    #[test]
    fn test_featured_image() {
        let ctx = context("");
        let bare = build(&ctx, PageKind::Post, "_posts/a.md", "---\nimage: cat.png\n---\n");
        let mapped = build(
            &ctx,
            PageKind::Post,
            "_posts/b.md",
            "---\nimage:\n  url: https://img.dev/cat.png\n  alt: A cat\n  credit: Jane\n---\n",
        );

        let bare = bare.blog.unwrap().image.unwrap();
        assert_eq!(bare, FeaturedImage::new("cat.png"));
        assert!(!bare.is_remote());
        let mapped = mapped.blog.unwrap().image.unwrap();
        assert!(mapped.is_remote());
        assert_eq!(mapped.alt.as_deref(), Some("A cat"));
        assert_eq!(mapped.credit.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_image_mapping_without_source() {
        let ctx = context("");
        let err = try_build(&ctx, PageKind::Post, "_posts/a.md", "---\nimage:\n  alt: x\n---\n")
            .unwrap_err();

        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn test_description_from_body() {
        let ctx = context("");
        let page = build(
            &ctx,
            PageKind::Post,
            "_posts/a.md",
            "# Title\n\nSome **bold** text with a [link](https://x.dev) and `code`.\n\nSecond.",
        );

        assert_eq!(
            page.blog.unwrap().description.as_deref(),
            Some("Some bold text with a link and code.")
        );
    }

    #[test]
    fn test_description_truncated() {
        let ctx = context("[publications]\ntypes = [\"changelog\"]");
        let body = "word ".repeat(60);
        let page = build(&ctx, PageKind::Publication, "changelog/v1.md", &body);

        let description = page.blog.unwrap().description.unwrap();
        assert!(description.chars().count() <= DESCRIPTION_LENGTH);
        assert!(description.starts_with("word word"));
    }

    #[test]
    fn test_publication_page() {
        let ctx = context("[publications]\ntypes = [\"changelog\"]");
        let page = build(
            &ctx,
            PageKind::Publication,
            "changelog/v1.md",
            "---\ndescription: First release\n---\n# v1",
        );

        assert_eq!(page.route_key, "changelog/v1");
        assert_eq!(page.blog.unwrap().description.as_deref(), Some("First release"));
        assert_eq!(page.category, None);
    }
}
