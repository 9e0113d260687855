//! Page model and site structure for Hyde.
//!
//! This crate provides:
//! - [`FileDiscoverer`]: Source discovery per page kind
//! - [`FrontMatterDocument`]: YAML front matter parsing
//! - [`PageModelBuilder`]: Typed page models with derived metadata
//! - [`PageCollection`] and [`RouteTable`]: Pages and routes of a build
//! - [`NavigationAssembler`]: Main menu and documentation sidebar
//! - [`CrossReferenceResolver`]: `hyde::route(...)` link rewriting
//! - [`Site`]: The pipeline tying them together
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
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
//! for entry in build.routes.entries() {
//!     tracing::info!(route_key = %entry.route_key, uri = %entry.uri_path, "Route");
//! }
//! # Ok(())
//! # }
//! ```

mod author;
mod collection;
mod context;
mod discovery;
mod error;
mod front_matter;
mod kind;
mod navigation;
mod page;
mod routes;
mod site;
mod source;
mod xref;

pub use author::{AuthorRegistry, GUEST_USERNAME, PostAuthor};
pub use collection::PageCollection;
pub use context::BuildContext;
pub use discovery::{DiscoveryExtension, FileDiscoverer};
pub use error::{ParseError, ParseErrorKind, SiteError};
pub use front_matter::FrontMatterDocument;
pub use kind::{Capabilities, KindDescriptor, PageKind};
pub use navigation::{MenuTree, NavItem, NavigationAssembler, Sidebar, SidebarGroup};
pub use page::{
    BlogMetadata, DEFAULT_PRIORITY, DocsMetadata, FeaturedImage, NavigationData, Page,
    PageModelBuilder, titleize,
};
pub use routes::{RouteEntry, RouteTable};
pub use site::{ErrorMode, Site, SiteBuild};
pub use source::{SourceDiff, SourceFile, SourceSnapshot};
pub use xref::{AssetResolver, CrossReferenceResolver};
