//! Main menu and documentation sidebar.
//!
//! [`NavigationAssembler`] builds UI trees from the page collection and the
//! route table. Hidden pages never appear in either tree.
//!
//! Items are sorted by `(priority, label)`. Sidebar groups are sorted by the
//! lowest priority among their items, then by group name. Categories are
//! grouped case-insensitively, so `category: Guide` joins the `guide/`
//! subdirectory.

use std::collections::BTreeMap;

use hyde_config::{CustomNavItem, DocsConfig, NavigationConfig, SubdirectoryMode};
use serde::Serialize;

use crate::collection::PageCollection;
use crate::page::{Page, titleize};
use crate::routes::RouteTable;

/// Label of the sidebar group holding uncategorized pages.
const UNGROUPED_LABEL: &str = "Other";

/// Navigation item with children for UI tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display label.
    pub label: String,
    /// Route key or external URL.
    pub destination: String,
    /// Link target: route URI path, or the URL for external items.
    pub uri: String,
    /// Sort priority (lower first).
    pub priority: i64,
    /// Child items (dropdowns only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    fn for_page(page: &Page, routes: &RouteTable) -> Self {
        Self {
            label: page.navigation.label.clone(),
            destination: page.route_key.clone(),
            uri: routes
                .get(&page.route_key)
                .map(|entry| entry.uri_path.clone())
                .unwrap_or_default(),
            priority: page.navigation.priority,
            children: Vec::new(),
        }
    }

    fn for_custom(custom: &CustomNavItem, routes: &RouteTable) -> Self {
        Self {
            label: custom.label.clone(),
            destination: custom.destination.clone(),
            uri: routes
                .get(&custom.destination)
                .map_or_else(|| custom.destination.clone(), |entry| entry.uri_path.clone()),
            priority: custom.priority,
            children: Vec::new(),
        }
    }
}

/// Main navigation menu.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MenuTree {
    /// Top-level items.
    pub items: Vec<NavItem>,
}

/// Group of documentation pages in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    /// Category key (`None` for uncategorized pages).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Display label.
    pub label: String,
    /// Lowest priority among the items.
    pub priority: i64,
    /// Whether the current page belongs to this group.
    pub active: bool,
    /// Items of the group.
    pub items: Vec<NavItem>,
}

/// Documentation sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    /// Sidebar heading.
    pub header: String,
    /// Whether groups can be collapsed.
    pub collapsible: bool,
    /// Groups in display order.
    pub groups: Vec<SidebarGroup>,
}

/// Assembles navigation trees for one build.
pub struct NavigationAssembler<'a> {
    navigation: &'a NavigationConfig,
    docs: &'a DocsConfig,
}

impl<'a> NavigationAssembler<'a> {
    /// Create an assembler from navigation and documentation settings.
    #[must_use]
    pub fn new(navigation: &'a NavigationConfig, docs: &'a DocsConfig) -> Self {
        Self { navigation, docs }
    }

    /// Build the main navigation menu.
    ///
    /// Candidates are visible pages of main-menu kinds not listed in
    /// `navigation.exclude`. Custom items whose destination is the route key
    /// of a candidate replace that candidate.
    #[must_use]
    pub fn build_main_menu(&self, routes: &RouteTable, pages: &PageCollection) -> MenuTree {
        let mut root = Vec::new();
        let mut dropdowns: BTreeMap<String, Vec<NavItem>> = BTreeMap::new();

        let candidates = pages.iter().filter(|page| {
            page.kind.capabilities().in_main_menu
                && !page.navigation.hidden
                && !self.navigation.exclude.contains(&page.route_key)
        });
        for page in candidates {
            let item = self.custom_override(page, routes);
            match (page.identifier.split_once('/'), self.navigation.subdirectories) {
                (None, _) | (Some(_), SubdirectoryMode::Flat) => root.push(item),
                (Some(_), SubdirectoryMode::Hidden) => {}
                (Some((dir, _)), SubdirectoryMode::Dropdown) => {
                    dropdowns.entry(dir.to_owned()).or_default().push(item);
                }
            }
        }

        for (dir, mut children) in dropdowns {
            sort_items(&mut children);
            root.push(NavItem {
                label: titleize(&dir),
                uri: String::new(),
                priority: children.iter().map(|c| c.priority).min().unwrap_or_default(),
                destination: dir,
                children,
            });
        }

        let replaced = |custom: &CustomNavItem| {
            pages.get(&custom.destination).is_some_and(|page| {
                root.iter()
                    .chain(root.iter().flat_map(|item| &item.children))
                    .any(|item| item.destination == page.route_key)
            })
        };
        let extra: Vec<NavItem> = self
            .navigation
            .custom
            .iter()
            .filter(|custom| !replaced(custom))
            .map(|custom| NavItem::for_custom(custom, routes))
            .collect();
        root.extend(extra);

        sort_items(&mut root);
        MenuTree { items: root }
    }

    /// Build the documentation sidebar, marking the group of `current`.
    #[must_use]
    pub fn build_sidebar(
        &self,
        routes: &RouteTable,
        pages: &PageCollection,
        current: Option<&str>,
    ) -> Sidebar {
        let mut grouped: BTreeMap<Option<String>, Vec<&Page>> = BTreeMap::new();
        for page in pages
            .iter()
            .filter(|page| page.kind.capabilities().has_sidebar && !page.navigation.hidden)
        {
            let key = page.category.as_deref().and_then(group_key);
            grouped.entry(key).or_default().push(page);
        }

        let mut groups: Vec<SidebarGroup> = grouped
            .into_iter()
            .map(|(key, members)| {
                let mut items: Vec<NavItem> = members
                    .iter()
                    .map(|page| NavItem::for_page(page, routes))
                    .collect();
                sort_items(&mut items);
                // Label from the first member's spelling of the category
                let label = match members.first().and_then(|p| p.category.as_deref()) {
                    Some(category) if key.is_some() => {
                        titleize(&category.split_whitespace().collect::<Vec<_>>().join(" "))
                    }
                    _ => UNGROUPED_LABEL.to_owned(),
                };
                SidebarGroup {
                    label,
                    priority: items.iter().map(|i| i.priority).min().unwrap_or_default(),
                    active: current
                        .is_some_and(|current| members.iter().any(|p| p.route_key == current)),
                    key,
                    items,
                }
            })
            .collect();
        groups.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.key.as_deref().unwrap_or("").cmp(b.key.as_deref().unwrap_or("")))
        });

        Sidebar {
            header: self.docs.sidebar.header.clone(),
            collapsible: self.docs.sidebar.collapsible,
            groups,
        }
    }

    /// Menu item for `page`, with a matching custom item applied.
    fn custom_override(&self, page: &Page, routes: &RouteTable) -> NavItem {
        let mut item = NavItem::for_page(page, routes);
        if let Some(custom) = self
            .navigation
            .custom
            .iter()
            .find(|custom| custom.destination == page.route_key)
        {
            item.label.clone_from(&custom.label);
            item.priority = custom.priority;
        }
        item
    }
}

/// Grouping key of a category: trimmed, lowercased, whitespace runs as `-`.
fn group_key(category: &str) -> Option<String> {
    let key = category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    (!key.is_empty()).then_some(key)
}

fn sort_items(items: &mut [NavItem]) {
    items.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.label.cmp(&b.label))
    });
}
