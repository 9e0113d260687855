//! Route table.
//!
//! Maps every page to its output path and public URI, and produces links
//! between pages.
//!
//! # URI paths
//!
//! | Output path        | `pretty_urls = false` | `pretty_urls = true` |
//! |--------------------|-----------------------|----------------------|
//! | `index.html`       | `index.html`          | `` (site root)       |
//! | `about.html`       | `about.html`          | `about`              |
//! | `docs/index.html`  | `docs/index.html`     | `docs/`              |

use std::collections::HashMap;

use serde::Serialize;

use crate::collection::PageCollection;
use crate::kind::PageKind;

/// One routed page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Unique route key.
    pub route_key: String,
    /// Page kind.
    pub kind: PageKind,
    /// Page identifier.
    pub identifier: String,
    /// Source path relative to the project root.
    pub source_path: String,
    /// Output path relative to the site root, always ending in `.html`.
    pub output_path: String,
    /// Public URI path relative to the site root.
    pub uri_path: String,
}

/// Route entries of a build with lookups by key, output path and identifier.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_key: HashMap<String, usize>,
    by_output: HashMap<String, usize>,
    /// `None` when more than one page shares the identifier.
    by_identifier: HashMap<String, Option<usize>>,
}

impl RouteTable {
    /// Build routes for every page in `pages`, in collection order.
    #[must_use]
    pub fn build(pages: &PageCollection, pretty_urls: bool) -> Self {
        let mut table = Self::default();
        for page in pages {
            let output_path = page.output_path();
            let entry = RouteEntry {
                route_key: page.route_key.clone(),
                kind: page.kind,
                identifier: page.identifier.clone(),
                source_path: page.source_path.clone(),
                uri_path: uri_path(&output_path, pretty_urls),
                output_path,
            };
            let i = table.entries.len();
            table.by_key.insert(entry.route_key.clone(), i);
            table.by_output.insert(entry.output_path.clone(), i);
            table
                .by_identifier
                .entry(entry.identifier.clone())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(i));
            table.entries.push(entry);
        }
        table
    }

    /// Resolve a reference to a route.
    ///
    /// Tries the route key, then the output path, then an identifier shared
    /// by no other page.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&RouteEntry> {
        let key = key.trim_matches('/');
        self.by_key
            .get(key)
            .or_else(|| self.by_output.get(key))
            .or_else(|| self.by_identifier.get(key).and_then(Option::as_ref))
            .map(|&i| &self.entries[i])
    }

    /// Entry with exactly `route_key`.
    #[must_use]
    pub fn get(&self, route_key: &str) -> Option<&RouteEntry> {
        self.by_key.get(route_key).map(|&i| &self.entries[i])
    }

    /// All entries in collection order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative link from the page at `from_output_path` to `entry`.
    ///
    /// Prefixes one `../` per directory level of the current page; a link
    /// that would be empty becomes `./`.
    #[must_use]
    pub fn relative_link(&self, from_output_path: &str, entry: &RouteEntry) -> String {
        relative_link(from_output_path, &entry.uri_path)
    }

    /// Absolute URL of `entry` under `site_url`.
    #[must_use]
    pub fn absolute_url(&self, site_url: &str, entry: &RouteEntry) -> String {
        format!("{}/{}", site_url.trim_end_matches('/'), entry.uri_path)
    }
}

/// URI path for an output path.
fn uri_path(output_path: &str, pretty_urls: bool) -> String {
    if !pretty_urls {
        return output_path.to_owned();
    }
    if output_path == "index.html" {
        return String::new();
    }
    if let Some(dir) = output_path.strip_suffix("/index.html") {
        return format!("{dir}/");
    }
    output_path
        .strip_suffix(".html")
        .unwrap_or(output_path)
        .to_owned()
}

/// Link from `from_output_path` to a site-relative `target`.
pub(crate) fn relative_link(from_output_path: &str, target: &str) -> String {
    let depth = from_output_path.trim_start_matches('/').matches('/').count();
    let link = format!("{}{target}", "../".repeat(depth));
    if link.is_empty() {
        "./".to_owned()
    } else {
        link
    }
}
