//! Cross reference placeholders in rendered HTML.
//!
//! Rendered pages refer to each other with `hyde::route('key')` (single or
//! double quotes). [`CrossReferenceResolver`] replaces each placeholder with
//! the link from the current page to the referenced one. `hyde::asset('path')`
//! placeholders are handed to an optional [`AssetResolver`] and kept verbatim
//! when none is registered or it declines.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::error::SiteError;
use crate::routes::RouteTable;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"hyde::(route|asset)\(\s*(?:'([^']*)'|"([^"]*)")\s*\)"#).unwrap()
});

/// Resolves `hyde::asset(...)` placeholders.
pub trait AssetResolver: Send + Sync {
    /// Link to the asset at `path` from the page at `from_output_path`.
    ///
    /// Returning `None` leaves the placeholder untouched.
    fn resolve(&self, path: &str, from_output_path: &str) -> Option<String>;
}

/// Rewrites cross reference placeholders.
#[derive(Clone, Default)]
pub struct CrossReferenceResolver {
    assets: Option<Arc<dyn AssetResolver>>,
}

impl CrossReferenceResolver {
    /// Create a resolver without asset support.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset resolver.
    #[must_use]
    pub fn with_asset_resolver(mut self, assets: Arc<dyn AssetResolver>) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Replace placeholders in `html` rendered for `current_output_path`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::RouteNotFound`] for the first reference to an
    /// unknown route.
    pub fn rewrite(
        &self,
        html: &str,
        current_output_path: &str,
        routes: &RouteTable,
    ) -> Result<String, SiteError> {
        self.rewrite_for(html, current_output_path, (current_output_path, 0), routes)
    }

    /// Like [`rewrite`](Self::rewrite), reporting errors against a source.
    ///
    /// `origin` is the source path and the number of its lines preceding
    /// `html`, so reported lines are file lines.
    pub(crate) fn rewrite_for(
        &self,
        html: &str,
        current_output_path: &str,
        origin: (&str, usize),
        routes: &RouteTable,
    ) -> Result<String, SiteError> {
        let (error_path, line_offset) = origin;
        let mut output = String::with_capacity(html.len());
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(html) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let argument = argument(&caps);
            let replacement = if &caps[1] == "route" {
                let entry = routes
                    .resolve(argument)
                    .ok_or_else(|| SiteError::RouteNotFound {
                        route_key: argument.to_owned(),
                        path: error_path.to_owned(),
                        line: line_offset + html[..whole.start()].matches('\n').count() + 1,
                    })?;
                Some(routes.relative_link(current_output_path, entry))
            } else {
                self.assets
                    .as_ref()
                    .and_then(|assets| assets.resolve(argument, current_output_path))
            };

            if let Some(replacement) = replacement {
                output.push_str(&html[last..whole.start()]);
                output.push_str(&replacement);
                last = whole.end();
            }
        }

        output.push_str(&html[last..]);
        Ok(output)
    }
}

impl fmt::Debug for CrossReferenceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossReferenceResolver")
            .field("has_asset_resolver", &self.assets.is_some())
            .finish()
    }
}

fn argument<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(2)
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_yaml::Mapping;

    use super::*;
    use crate::collection::PageCollection;
    use crate::kind::PageKind;
    use crate::page::{DEFAULT_PRIORITY, NavigationData, Page};
    use crate::routes::relative_link;

    fn routes(pretty_urls: bool) -> RouteTable {
        let mut pages = PageCollection::new();
        for (kind, route_key, identifier) in [
            (PageKind::Blade, "index", "index"),
            (PageKind::Documentation, "docs/guide/install", "guide/install"),
            (PageKind::Markdown, "about", "about"),
        ] {
            pages
                .add(Page {
                    kind,
                    identifier: identifier.to_owned(),
                    route_key: route_key.to_owned(),
                    source_path: format!("src/{route_key}.md"),
                    title: identifier.to_owned(),
                    category: None,
                    navigation: NavigationData {
                        hidden: false,
                        priority: DEFAULT_PRIORITY,
                        label: identifier.to_owned(),
                    },
                    matter: Mapping::new(),
                    body: String::new(),
                    body_offset: 0,
                    blog: None,
                    docs: None,
                })
                .unwrap();
        }
        RouteTable::build(&pages, pretty_urls)
    }

    struct PrefixAssets;

    impl AssetResolver for PrefixAssets {
        fn resolve(&self, path: &str, from_output_path: &str) -> Option<String> {
            (!path.starts_with("missing")).then(|| relative_link(from_output_path, &format!("media/{path}")))
        }
    }

    #[test]
    fn test_rewrite_known_route() {
        let html = r#"<a href="hyde::route('docs/guide/install')">Install</a>"#;

        let out = CrossReferenceResolver::new()
            .rewrite(html, "about.html", &routes(false))
            .unwrap();

        assert_eq!(out, r#"<a href="docs/guide/install.html">Install</a>"#);
    }

    #[test]
    fn test_rewrite_double_quotes_and_depth() {
        let html = "<a href='hyde::route(\"about\")'>About</a> <a href='hyde::route( \"index\" )'>Home</a>";

        let out = CrossReferenceResolver::new()
            .rewrite(html, "docs/guide/install.html", &routes(true))
            .unwrap();

        assert_eq!(out, "<a href='../../about'>About</a> <a href='../../'>Home</a>");
    }

    #[test]
    fn test_rewrite_unknown_route() {
        let html = "<p>intro</p>\n<p>more</p>\n<a href=\"hyde::route('nowhere')\">x</a>";

        let err = CrossReferenceResolver::new()
            .rewrite(html, "about.html", &routes(false))
            .unwrap_err();

        let SiteError::RouteNotFound {
            route_key,
            path,
            line,
        } = err
        else {
            panic!("expected route not found");
        };
        assert_eq!(route_key, "nowhere");
        assert_eq!(path, "about.html");
        assert_eq!(line, 3);
    }

    #[test]
    fn test_rewrite_for_shifts_error_line() {
        let html = "<p>intro</p>\n<a href=\"hyde::route('nowhere')\">x</a>";

        let err = CrossReferenceResolver::new()
            .rewrite_for(html, "about.html", ("_pages/about.md", 4), &routes(false))
            .unwrap_err();

        assert_eq!(err.to_string(), "_pages/about.md:6: unknown route 'nowhere'");
    }

    #[test]
    fn test_debug_reports_asset_resolver() {
        let plain = CrossReferenceResolver::new();
        let with_assets = CrossReferenceResolver::new().with_asset_resolver(Arc::new(PrefixAssets));

        assert_eq!(
            format!("{plain:?}"),
            "CrossReferenceResolver { has_asset_resolver: false }"
        );
        assert_eq!(
            format!("{with_assets:?}"),
            "CrossReferenceResolver { has_asset_resolver: true }"
        );
    }

    #[test]
    fn test_asset_without_resolver_untouched() {
        let html = r#"<img src="hyde::asset('logo.svg')">"#;

        let out = CrossReferenceResolver::new()
            .rewrite(html, "about.html", &routes(false))
            .unwrap();

        assert_eq!(out, html);
    }

    #[test]
    fn test_asset_with_resolver() {
        let html = r#"<img src="hyde::asset('logo.svg')"><img src="hyde::asset('missing.png')">"#;
        let resolver = CrossReferenceResolver::new().with_asset_resolver(Arc::new(PrefixAssets));

        let out = resolver
            .rewrite(html, "docs/guide/install.html", &routes(false))
            .unwrap();

        assert_eq!(
            out,
            r#"<img src="../../media/logo.svg"><img src="hyde::asset('missing.png')">"#
        );
    }

    #[test]
    fn test_text_without_placeholders_unchanged() {
        let html = "<p>hyde::routes are documented elsewhere</p>";

        let out = CrossReferenceResolver::new()
            .rewrite(html, "index.html", &routes(false))
            .unwrap();

        assert_eq!(out, html);
    }
}
