//! Per-build context.
//!
//! Everything the pipeline needs from configuration is resolved once into a
//! [`BuildContext`] and passed explicitly to the phases that use it.

use std::sync::Arc;

use hyde_config::{Config, DocsConfig, NavigationConfig};

use crate::author::AuthorRegistry;
use crate::kind::KindDescriptor;

/// Immutable settings shared by every phase of one build.
#[derive(Debug)]
pub struct BuildContext {
    descriptors: Vec<Arc<KindDescriptor>>,
    authors: AuthorRegistry,
    default_author: Option<String>,
    docs: DocsConfig,
    navigation: NavigationConfig,
    pretty_urls: bool,
    site_url: Option<String>,
}

impl BuildContext {
    /// Resolve the context from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            descriptors: KindDescriptor::table(config),
            authors: AuthorRegistry::from_config(&config.authors),
            default_author: config.posts.default_author.clone(),
            docs: config.docs.clone(),
            navigation: config.navigation.clone(),
            pretty_urls: config.site.pretty_urls,
            site_url: config.site.url.clone(),
        }
    }

    /// Kind dispatch table.
    #[must_use]
    pub fn descriptors(&self) -> &[Arc<KindDescriptor>] {
        &self.descriptors
    }

    /// Author registry.
    #[must_use]
    pub fn authors(&self) -> &AuthorRegistry {
        &self.authors
    }

    /// Username of the author assigned to posts that name none.
    #[must_use]
    pub fn default_author(&self) -> Option<&str> {
        self.default_author.as_deref()
    }

    /// Documentation settings.
    #[must_use]
    pub fn docs(&self) -> &DocsConfig {
        &self.docs
    }

    /// Main navigation settings.
    #[must_use]
    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    /// Whether links drop the `.html` suffix.
    #[must_use]
    pub fn pretty_urls(&self) -> bool {
        self.pretty_urls
    }

    /// Canonical site URL.
    #[must_use]
    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref()
    }

    /// Position of a documentation identifier in `docs.sidebar.order`.
    #[must_use]
    pub fn sidebar_position(&self, identifier: &str) -> Option<usize> {
        self.docs.sidebar.order.iter().position(|id| id == identifier)
    }
}
