//! Page collection keyed by route key.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SiteError;
use crate::kind::PageKind;
use crate::page::Page;

/// Pages of a build in insertion order with route key lookups.
///
/// Route keys are unique: [`add`](Self::add) rejects a page whose key is
/// already taken and leaves the collection unchanged. Pages are shared via
/// `Arc` so incremental rebuilds and filtered views don't copy them.
#[derive(Clone, Debug, Default)]
pub struct PageCollection {
    pages: Vec<Arc<Page>>,
    index: HashMap<String, usize>,
    by_source: HashMap<String, usize>,
}

impl PageCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::DuplicateRouteKey`] naming both source paths if
    /// the route key is taken.
    pub fn add(&mut self, page: impl Into<Arc<Page>>) -> Result<(), SiteError> {
        let page = page.into();
        if let Some(&existing) = self.index.get(&page.route_key) {
            return Err(SiteError::DuplicateRouteKey {
                route_key: page.route_key.clone(),
                existing: self.pages[existing].source_path.clone(),
                incoming: page.source_path.clone(),
            });
        }
        self.index.insert(page.route_key.clone(), self.pages.len());
        self.by_source
            .insert(page.source_path.clone(), self.pages.len());
        self.pages.push(page);
        Ok(())
    }

    /// Page with `route_key`.
    #[must_use]
    pub fn get(&self, route_key: &str) -> Option<&Page> {
        self.index.get(route_key).map(|&i| &*self.pages[i])
    }

    /// Shared handle to the page with `route_key`.
    #[must_use]
    pub fn get_shared(&self, route_key: &str) -> Option<Arc<Page>> {
        self.index.get(route_key).map(|&i| Arc::clone(&self.pages[i]))
    }

    /// Page built from `source_path`.
    #[must_use]
    pub fn find_by_source(&self, source_path: &str) -> Option<&Arc<Page>> {
        self.by_source.get(source_path).map(|&i| &self.pages[i])
    }

    /// All pages in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Arc<Page>] {
        &self.pages
    }

    /// Pages of one kind, in insertion order.
    #[must_use]
    pub fn filter(&self, kind: PageKind) -> PageCollection {
        let mut filtered = PageCollection::new();
        for page in self.pages.iter().filter(|page| page.kind == kind) {
            let position = filtered.pages.len();
            filtered.index.insert(page.route_key.clone(), position);
            filtered.by_source.insert(page.source_path.clone(), position);
            filtered.pages.push(Arc::clone(page));
        }
        filtered
    }

    /// Iterate over pages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().map(|page| &**page)
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Blog posts, newest first.
    ///
    /// Undated posts come last; ties are ordered by route key.
    #[must_use]
    pub fn latest_posts(&self) -> Vec<&Page> {
        let mut posts: Vec<&Page> = self.iter().filter(|p| p.kind == PageKind::Post).collect();
        posts.sort_by(|a, b| match (a.date(), b.date()) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.route_key.cmp(&b.route_key)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.route_key.cmp(&b.route_key),
        });
        posts
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a Page;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Arc<Page>>, fn(&'a Arc<Page>) -> &'a Page>;

    fn into_iter(self) -> Self::IntoIter {
        let deref: fn(&'a Arc<Page>) -> &'a Page = |page| page;
        self.pages.iter().map(deref)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_yaml::Mapping;

    use super::*;
    use crate::page::{BlogMetadata, DEFAULT_PRIORITY, NavigationData};

    fn page(kind: PageKind, route_key: &str, source_path: &str) -> Page {
        Page {
            kind,
            identifier: route_key.rsplit('/').next().unwrap_or(route_key).to_owned(),
            route_key: route_key.to_owned(),
            source_path: source_path.to_owned(),
            title: route_key.to_owned(),
            category: None,
            navigation: NavigationData {
                hidden: false,
                priority: DEFAULT_PRIORITY,
                label: route_key.to_owned(),
            },
            matter: Mapping::new(),
            body: String::new(),
            body_offset: 0,
            blog: None,
            docs: None,
        }
    }

    fn post(route_key: &str, date: Option<(i32, u32, u32)>) -> Page {
        let mut page = page(PageKind::Post, route_key, &format!("_{route_key}.md"));
        page.blog = Some(BlogMetadata {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)),
            ..BlogMetadata::default()
        });
        page
    }

    #[test]
    fn test_add_and_get() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages.get("about").unwrap().source_path, "_pages/about.md");
        assert!(pages.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_route_key_rejected() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();

        let err = pages
            .add(page(PageKind::Blade, "about", "_pages/about.blade.php"))
            .unwrap_err();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages.get("about").unwrap().kind, PageKind::Markdown);
        let SiteError::DuplicateRouteKey {
            route_key,
            existing,
            incoming,
        } = err
        else {
            panic!("expected duplicate route key");
        };
        assert_eq!(route_key, "about");
        assert_eq!(existing, "_pages/about.md");
        assert_eq!(incoming, "_pages/about.blade.php");
    }

    #[test]
    fn test_all_keeps_insertion_order() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "zeta", "_pages/zeta.md")).unwrap();
        pages.add(page(PageKind::Markdown, "alpha", "_pages/alpha.md")).unwrap();

        let keys: Vec<&str> = pages.iter().map(|p| p.route_key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(pages.all().len(), 2);
    }

    #[test]
    fn test_filter_by_kind() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();
        pages.add(page(PageKind::Documentation, "docs/a", "_docs/a.md")).unwrap();
        pages.add(page(PageKind::Documentation, "docs/b", "_docs/b.md")).unwrap();

        let docs = pages.filter(PageKind::Documentation);

        assert_eq!(docs.len(), 2);
        assert!(docs.get("docs/b").is_some());
        assert!(docs.get("about").is_none());
        assert!(Arc::ptr_eq(
            &docs.get_shared("docs/a").unwrap(),
            &pages.get_shared("docs/a").unwrap()
        ));
    }

    #[test]
    fn test_latest_posts_ordering() {
        let mut pages = PageCollection::new();
        pages.add(post("posts/january", Some((2024, 1, 15)))).unwrap();
        pages.add(post("posts/undated", None)).unwrap();
        pages.add(post("posts/june", Some((2024, 6, 1)))).unwrap();
        pages.add(post("posts/june-too", Some((2024, 6, 1)))).unwrap();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();

        let keys: Vec<&str> = pages
            .latest_posts()
            .into_iter()
            .map(|p| p.route_key.as_str())
            .collect();

        assert_eq!(
            keys,
            vec!["posts/june", "posts/june-too", "posts/january", "posts/undated"]
        );
    }

    #[test]
    fn test_find_by_source() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();

        assert_eq!(pages.find_by_source("_pages/about.md").unwrap().route_key, "about");
        assert!(pages.find_by_source("_pages/other.md").is_none());
    }

    #[test]
    fn test_find_by_source_in_filtered_view() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();
        pages.add(page(PageKind::Documentation, "docs/a", "_docs/a.md")).unwrap();
        pages.add(page(PageKind::Documentation, "docs/b", "_docs/b.md")).unwrap();

        let docs = pages.filter(PageKind::Documentation);

        assert_eq!(docs.find_by_source("_docs/b.md").unwrap().route_key, "docs/b");
        assert!(docs.find_by_source("_pages/about.md").is_none());
    }

    #[test]
    fn test_rejected_page_not_indexed_by_source() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();
        pages
            .add(page(PageKind::Blade, "about", "_pages/about.blade.php"))
            .unwrap_err();

        assert!(pages.find_by_source("_pages/about.blade.php").is_none());
        assert_eq!(pages.find_by_source("_pages/about.md").unwrap().kind, PageKind::Markdown);
    }

    #[test]
    fn test_into_iterator() {
        let mut pages = PageCollection::new();
        pages.add(page(PageKind::Markdown, "about", "_pages/about.md")).unwrap();

        let mut count = 0;
        for page in &pages {
            assert_eq!(page.route_key, "about");
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
