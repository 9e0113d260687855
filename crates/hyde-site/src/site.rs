//! Build orchestration.
//!
//! [`Site`] runs the pipeline for one configuration:
//!
//! 1. Discover sources for every kind ([`FileDiscoverer`])
//! 2. Parse sources into pages, in parallel on the global rayon pool
//! 3. Add pages to the [`PageCollection`] one by one in discovery order, so
//!    duplicate route keys are always reported against the same page
//! 4. Build the [`RouteTable`]
//!
//! The resulting [`SiteBuild`] is immutable and exposes navigation and
//! cross reference rewriting for renderers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hyde_config::Config;
//! use hyde_site::{ErrorMode, Site};
//! use hyde_storage::FsStorage;
//!
//! let config = Config::load(None, None)?;
//! let storage = Arc::new(FsStorage::new(config.project_dir.clone()));
//! let site = Site::new(&config, storage);
//!
//! let build = site.build(ErrorMode::FailFast)?;
//! let menu = build.main_menu();
//! ```

use std::sync::Arc;
use std::time::Instant;

use hyde_config::Config;
use hyde_storage::Storage;
use rayon::prelude::*;

use crate::collection::PageCollection;
use crate::context::BuildContext;
use crate::discovery::{DiscoveryExtension, FileDiscoverer};
use crate::error::SiteError;
use crate::navigation::{MenuTree, NavigationAssembler, Sidebar};
use crate::page::{Page, PageModelBuilder};
use crate::routes::RouteTable;
use crate::source::{SourceDiff, SourceFile, SourceSnapshot};
use crate::xref::{AssetResolver, CrossReferenceResolver};

/// Elapsed time in milliseconds.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// How per-file errors are handled during a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Stop at the first error in discovery order.
    #[default]
    FailFast,
    /// Skip failing files, record their errors and keep going.
    Collect,
}

/// Page pipeline for one configuration.
pub struct Site {
    context: Arc<BuildContext>,
    storage: Arc<dyn Storage>,
    discoverer: FileDiscoverer,
    xref: CrossReferenceResolver,
}

impl Site {
    /// Create a pipeline reading sources from `storage`.
    #[must_use]
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Self {
        let context = Arc::new(BuildContext::from_config(config));
        let discoverer =
            FileDiscoverer::new(Arc::clone(&storage), context.descriptors().to_vec());
        Self {
            context,
            storage,
            discoverer,
            xref: CrossReferenceResolver::new(),
        }
    }

    /// Register a discovery extension.
    #[must_use]
    pub fn with_extension(mut self, extension: Arc<dyn DiscoveryExtension>) -> Self {
        self.discoverer.register(extension);
        self
    }

    /// Register an asset resolver for `hyde::asset(...)` placeholders.
    #[must_use]
    pub fn with_asset_resolver(mut self, assets: Arc<dyn AssetResolver>) -> Self {
        self.xref = self.xref.with_asset_resolver(assets);
        self
    }

    /// Build context shared by every phase.
    #[must_use]
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Discover every source.
    ///
    /// # Errors
    ///
    /// Returns discovery errors (duplicate sources, storage failures).
    pub fn discover(&self) -> Result<Vec<SourceFile>, SiteError> {
        self.discoverer.discover_all()
    }

    /// Snapshot of the current sources, for diffing against a build.
    ///
    /// # Errors
    ///
    /// Returns discovery errors (duplicate sources, storage failures).
    pub fn scan(&self) -> Result<SourceSnapshot, SiteError> {
        Ok(SourceSnapshot::from_sources(&self.discover()?))
    }

    /// Run the full pipeline.
    ///
    /// Discovery errors are always fatal. Per-file errors (missing files,
    /// parse errors, duplicate route keys) follow `mode`.
    ///
    /// # Errors
    ///
    /// Returns the first error in discovery order with [`ErrorMode::FailFast`],
    /// and discovery errors in either mode.
    pub fn build(&self, mode: ErrorMode) -> Result<SiteBuild, SiteError> {
        let start = Instant::now();
        let sources = self.discover()?;
        self.assemble(sources, mode, |_| None, start)
    }

    /// Rebuild after source changes.
    ///
    /// Sources listed as added or modified in `diff` are parsed again; all
    /// other pages are taken from `previous`. Removed sources drop out.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn rebuild(
        &self,
        previous: &SiteBuild,
        diff: &SourceDiff,
        mode: ErrorMode,
    ) -> Result<SiteBuild, SiteError> {
        let start = Instant::now();
        let sources = self.discover()?;
        let reuse = |source: &SourceFile| {
            if diff.needs_parse(source.path()) {
                None
            } else {
                previous.pages.find_by_source(source.path()).map(Arc::clone)
            }
        };
        let build = self.assemble(sources, mode, reuse, start)?;
        tracing::debug!(
            added = diff.added.len(),
            modified = diff.modified.len(),
            removed = diff.removed.len(),
            "Rebuilt changed sources"
        );
        Ok(build)
    }

    fn assemble(
        &self,
        sources: Vec<SourceFile>,
        mode: ErrorMode,
        reuse: impl Fn(&SourceFile) -> Option<Arc<Page>> + Sync,
        start: Instant,
    ) -> Result<SiteBuild, SiteError> {
        let builder = PageModelBuilder::new(&self.context);
        let storage = self.storage.as_ref();

        let parse_start = Instant::now();
        let parsed: Vec<Result<Arc<Page>, SiteError>> = sources
            .par_iter()
            .map(|source| match reuse(source) {
                Some(page) => Ok(page),
                None => builder.build_from_file(source, storage).map(Arc::new),
            })
            .collect();
        let parse_ms = elapsed_ms(parse_start);

        let mut pages = PageCollection::new();
        let mut errors = Vec::new();
        for result in parsed {
            match result.and_then(|page| pages.add(page)) {
                Ok(()) => {}
                Err(e) if mode == ErrorMode::Collect => {
                    tracing::warn!(path = e.path().unwrap_or_default(), error = %e, "Skipping source");
                    errors.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        let routes = RouteTable::build(&pages, self.context.pretty_urls());

        tracing::info!(
            source_count = sources.len(),
            page_count = pages.len(),
            error_count = errors.len(),
            parse_ms,
            elapsed_ms = elapsed_ms(start),
            "Site built"
        );

        Ok(SiteBuild {
            snapshot: SourceSnapshot::from_sources(&sources),
            pages,
            routes,
            errors,
            context: Arc::clone(&self.context),
            xref: self.xref.clone(),
        })
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct SiteBuild {
    /// Pages in discovery order.
    pub pages: PageCollection,
    /// Routes of every page.
    pub routes: RouteTable,
    /// Per-file errors skipped in [`ErrorMode::Collect`].
    pub errors: Vec<SiteError>,
    snapshot: SourceSnapshot,
    context: Arc<BuildContext>,
    xref: CrossReferenceResolver,
}

impl SiteBuild {
    /// Source modification times at build time.
    #[must_use]
    pub fn snapshot(&self) -> &SourceSnapshot {
        &self.snapshot
    }

    /// Whether the build recorded no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn navigation(&self) -> NavigationAssembler<'_> {
        NavigationAssembler::new(self.context.navigation(), self.context.docs())
    }

    /// Main navigation menu.
    #[must_use]
    pub fn main_menu(&self) -> MenuTree {
        self.navigation().build_main_menu(&self.routes, &self.pages)
    }

    /// Documentation sidebar with the group of `current` marked active.
    #[must_use]
    pub fn sidebar(&self, current: Option<&str>) -> Sidebar {
        self.navigation()
            .build_sidebar(&self.routes, &self.pages, current)
    }

    /// Replace cross reference placeholders in HTML rendered for `page`.
    ///
    /// Lines of `html` are taken to follow the page's front matter, so
    /// errors point at the source file line.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::RouteNotFound`] naming the page's source path.
    pub fn rewrite(&self, html: &str, page: &Page) -> Result<String, SiteError> {
        self.xref.rewrite_for(
            html,
            &page.output_path(),
            (page.source_path.as_str(), page.body_offset),
            &self.routes,
        )
    }

    /// Latest posts, newest first.
    #[must_use]
    pub fn latest_posts(&self) -> Vec<&Page> {
        self.pages.latest_posts()
    }

    /// Absolute URL of the page with `route_key`, when a site URL is set.
    #[must_use]
    pub fn absolute_url(&self, route_key: &str) -> Option<String> {
        let site_url = self.context.site_url()?;
        let entry = self.routes.get(route_key)?;
        Some(self.routes.absolute_url(site_url, entry))
    }
}
