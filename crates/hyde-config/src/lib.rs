//! Configuration management for Hyde.
//!
//! Parses `hyde.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `docs.edit_base_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the project root directory.
    pub project_dir: Option<PathBuf>,
    /// Override the pretty URLs flag.
    pub pretty_urls: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "hyde.toml";

/// Priority assigned to custom navigation items without an explicit one.
const DEFAULT_CUSTOM_PRIORITY: i64 = 500;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,
    /// Per-kind source and output directories (as written in TOML).
    #[serde(rename = "pages")]
    pages_raw: PagesConfigRaw,
    /// Publication types.
    pub publications: PublicationsConfig,
    /// Documentation settings.
    pub docs: DocsConfig,
    /// Main navigation settings.
    pub navigation: NavigationConfig,
    /// Author registry entries keyed by username.
    pub authors: BTreeMap<String, AuthorConfig>,
    /// Blog post settings.
    pub posts: PostsConfig,

    /// Resolved per-kind directories (set after loading).
    #[serde(skip)]
    pub pages: PagesConfig,
    /// Absolute project root all source directories are relative to.
    #[serde(skip)]
    pub project_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical site URL used for absolute links.
    pub url: Option<String>,
    /// Strip `.html` from generated links.
    pub pretty_urls: bool,
    /// Project root relative to the config file (default: the config directory).
    pub source_root: Option<String>,
}

/// Raw directories for one page kind as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KindDirsRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    extension: Option<String>,
}

/// Raw `[pages.*]` tables as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesConfigRaw {
    html: KindDirsRaw,
    blade: KindDirsRaw,
    markdown: KindDirsRaw,
    posts: KindDirsRaw,
    docs: KindDirsRaw,
}

/// Resolved directories for one page kind.
///
/// Directories are relative to [`Config::project_dir`] and use forward
/// slashes. An empty `output_dir` places pages at the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDirs {
    /// Directory scanned for sources.
    pub source_dir: String,
    /// Directory the compiled pages are written to.
    pub output_dir: String,
    /// Source file extension including the leading dot.
    pub extension: String,
}

impl KindDirs {
    fn new(source_dir: &str, output_dir: &str, extension: &str) -> Self {
        Self {
            source_dir: source_dir.to_owned(),
            output_dir: output_dir.to_owned(),
            extension: extension.to_owned(),
        }
    }

    fn resolve(raw: &KindDirsRaw, default: Self) -> Self {
        let normalize = |s: &str| s.replace('\\', "/").trim_matches('/').to_owned();
        Self {
            source_dir: raw
                .source_dir
                .as_deref()
                .map_or(default.source_dir, normalize),
            output_dir: raw
                .output_dir
                .as_deref()
                .map_or(default.output_dir, normalize),
            extension: raw.extension.clone().unwrap_or(default.extension),
        }
    }
}

/// Resolved per-kind directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesConfig {
    /// Raw HTML pages.
    pub html: KindDirs,
    /// Blade template pages.
    pub blade: KindDirs,
    /// Markdown pages.
    pub markdown: KindDirs,
    /// Blog posts.
    pub posts: KindDirs,
    /// Documentation pages.
    pub docs: KindDirs,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            html: KindDirs::new("_pages", "", ".html"),
            blade: KindDirs::new("_pages", "", ".blade.php"),
            markdown: KindDirs::new("_pages", "", ".md"),
            posts: KindDirs::new("_posts", "posts", ".md"),
            docs: KindDirs::new("_docs", "docs", ".md"),
        }
    }
}

impl PagesConfig {
    fn resolve(raw: &PagesConfigRaw) -> Self {
        let defaults = Self::default();
        Self {
            html: KindDirs::resolve(&raw.html, defaults.html),
            blade: KindDirs::resolve(&raw.blade, defaults.blade),
            markdown: KindDirs::resolve(&raw.markdown, defaults.markdown),
            posts: KindDirs::resolve(&raw.posts, defaults.posts),
            docs: KindDirs::resolve(&raw.docs, defaults.docs),
        }
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, &KindDirs)> {
        [
            ("pages.html", &self.html),
            ("pages.blade", &self.blade),
            ("pages.markdown", &self.markdown),
            ("pages.posts", &self.posts),
            ("pages.docs", &self.docs),
        ]
        .into_iter()
    }
}

/// Publication types.
///
/// Each type is a directory holding Markdown sources; pages are written to
/// an output directory of the same name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicationsConfig {
    /// Publication type names.
    pub types: Vec<String>,
}

/// Documentation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Base URL for "edit this page" links (source path is appended).
    pub edit_base_url: Option<String>,
    /// Sidebar settings.
    pub sidebar: SidebarConfig,
}

/// Documentation sidebar settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Sidebar heading.
    pub header: String,
    /// Whether groups can be collapsed in the UI.
    pub collapsible: bool,
    /// Documentation identifiers in the order they should appear.
    pub order: Vec<String>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            header: "Documentation".to_owned(),
            collapsible: true,
            order: Vec::new(),
        }
    }
}

/// How pages in subdirectories appear in the main navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubdirectoryMode {
    /// Omit pages in subdirectories.
    #[default]
    Hidden,
    /// List them alongside root pages.
    Flat,
    /// Group them under one dropdown item per directory.
    Dropdown,
}

/// Main navigation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Subdirectory presentation.
    pub subdirectories: SubdirectoryMode,
    /// Route keys never shown in the main menu.
    pub exclude: Vec<String>,
    /// Extra menu entries.
    pub custom: Vec<CustomNavItem>,
}

/// Configured navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomNavItem {
    /// Display label.
    pub label: String,
    /// Route key or external URL.
    pub destination: String,
    /// Sort priority (lower first).
    #[serde(default = "default_custom_priority")]
    pub priority: i64,
}

fn default_custom_priority() -> i64 {
    DEFAULT_CUSTOM_PRIORITY
}

/// Author registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    /// Display name (defaults to the username).
    pub name: Option<String>,
    /// Author website.
    pub website: Option<String>,
}

/// Blog post settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    /// Username used for posts that do not name an author.
    pub default_author: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a directory to stay inside the project root.
fn require_relative_dir(dir: &str, field: &str) -> Result<(), ConfigError> {
    let escapes = Path::new(dir)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path inside the project"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `hyde.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation rejects a value.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(project_dir) = &settings.project_dir {
            self.project_dir.clone_from(project_dir);
        }
        if let Some(pretty_urls) = settings.pretty_urls {
            self.site.pretty_urls = pretty_urls;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            pages_raw: PagesConfigRaw::default(),
            publications: PublicationsConfig::default(),
            docs: DocsConfig::default(),
            navigation: NavigationConfig::default(),
            authors: BTreeMap::new(),
            posts: PostsConfig::default(),
            pages: PagesConfig::default(),
            project_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_pages()?;
        self.validate_publications()?;
        self.validate_navigation()?;
        self.validate_authors()?;
        Ok(())
    }

    /// Validate site and docs URLs.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.url {
            require_non_empty(url, "site.url")?;
            require_http_url(url, "site.url")?;
        }
        if let Some(ref url) = self.docs.edit_base_url {
            require_non_empty(url, "docs.edit_base_url")?;
            require_http_url(url, "docs.edit_base_url")?;
        }
        for (i, entry) in self.docs.sidebar.order.iter().enumerate() {
            require_non_empty(entry, &format!("docs.sidebar.order[{i}]"))?;
        }
        Ok(())
    }

    /// Validate per-kind directories and extensions.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        for (field, dirs) in self.pages.fields() {
            require_relative_dir(&dirs.source_dir, &format!("{field}.source_dir"))?;
            require_relative_dir(&dirs.output_dir, &format!("{field}.output_dir"))?;
            if !dirs.extension.starts_with('.') || dirs.extension.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "{field}.extension must start with a dot, got '{}'",
                    dirs.extension
                )));
            }
        }
        Ok(())
    }

    /// Validate publication type names.
    ///
    /// Each type becomes both a source and an output directory, so it must be
    /// a single path segment that no other kind already uses.
    fn validate_publications(&self) -> Result<(), ConfigError> {
        let reserved: Vec<&str> = self
            .pages
            .fields()
            .flat_map(|(_, dirs)| [dirs.source_dir.as_str(), dirs.output_dir.as_str()])
            .filter(|dir| !dir.is_empty())
            .collect();

        let mut seen = Vec::new();
        for name in &self.publications.types {
            require_non_empty(name, "publications.types")?;
            if name.contains(['/', '\\']) || name.starts_with(['.', '_']) {
                return Err(ConfigError::Validation(format!(
                    "publications.types entry '{name}' must be a plain directory name"
                )));
            }
            if reserved.contains(&name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "publications.types entry '{name}' collides with a page directory"
                )));
            }
            if seen.contains(&name) {
                return Err(ConfigError::Validation(format!(
                    "publications.types entry '{name}' is listed twice"
                )));
            }
            seen.push(name);
        }
        Ok(())
    }

    /// Validate custom navigation entries.
    fn validate_navigation(&self) -> Result<(), ConfigError> {
        for (i, item) in self.navigation.custom.iter().enumerate() {
            require_non_empty(&item.label, &format!("navigation.custom[{i}].label"))?;
            require_non_empty(
                &item.destination,
                &format!("navigation.custom[{i}].destination"),
            )?;
        }
        Ok(())
    }

    /// Validate the author registry.
    fn validate_authors(&self) -> Result<(), ConfigError> {
        for (username, author) in &self.authors {
            if username.trim().is_empty() || username.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "authors: invalid username '{username}'"
                )));
            }
            if let Some(ref name) = author.name {
                require_non_empty(name, &format!("authors.{username}.name"))?;
            }
            if let Some(ref website) = author.website {
                require_http_url(website, &format!("authors.{username}.website"))?;
            }
        }

        if let Some(ref default_author) = self.posts.default_author
            && !self.authors.contains_key(default_author)
        {
            return Err(ConfigError::Validation(format!(
                "posts.default_author '{default_author}' is not defined in [authors]"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.url {
            self.site.url = Some(expand::expand_env(url, "site.url")?);
        }
        if let Some(ref url) = self.docs.edit_base_url {
            self.docs.edit_base_url = Some(expand::expand_env(url, "docs.edit_base_url")?);
        }
        Ok(())
    }

    /// Resolve the project root and per-kind directories.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.project_dir = match self.site.source_root.as_deref() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
        self.pages = PagesConfig::resolve(&self.pages_raw);
    }
}
