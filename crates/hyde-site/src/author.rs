//! Blog post authors.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use hyde_config::AuthorConfig;
use serde::Serialize;

/// Username given to inline authors that don't name one.
pub const GUEST_USERNAME: &str = "guest";

/// Author of a post or publication page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostAuthor {
    /// Unique username.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Author website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl PostAuthor {
    /// Author known only by username.
    #[must_use]
    pub fn from_username(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            name: username.to_owned(),
            website: None,
        }
    }
}

/// Configured authors, shared by every page that references them.
#[derive(Debug, Default)]
pub struct AuthorRegistry {
    authors: HashMap<String, Arc<PostAuthor>>,
}

impl AuthorRegistry {
    /// Build the registry from `[authors.*]` configuration entries.
    #[must_use]
    pub fn from_config(authors: &BTreeMap<String, AuthorConfig>) -> Self {
        let authors = authors
            .iter()
            .map(|(username, config)| {
                let author = PostAuthor {
                    username: username.clone(),
                    name: config.name.clone().unwrap_or_else(|| username.clone()),
                    website: config.website.clone(),
                };
                (username.clone(), Arc::new(author))
            })
            .collect();
        Self { authors }
    }

    /// Registered author for `username`.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<Arc<PostAuthor>> {
        self.authors.get(username).map(Arc::clone)
    }

    /// Registered author for `username`, or a record named after it.
    #[must_use]
    pub fn resolve(&self, username: &str) -> Arc<PostAuthor> {
        self.get(username).unwrap_or_else(|| {
            tracing::warn!(username, "Author not found in configuration");
            Arc::new(PostAuthor::from_username(username))
        })
    }

    /// Number of registered authors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Whether no authors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AuthorRegistry {
        let mut authors = BTreeMap::new();
        authors.insert(
            "mr_hyde".to_owned(),
            AuthorConfig {
                name: Some("Mr. Hyde".to_owned()),
                website: Some("https://hydephp.com".to_owned()),
            },
        );
        authors.insert("jane".to_owned(), AuthorConfig::default());
        AuthorRegistry::from_config(&authors)
    }

    #[test]
    fn test_registered_author() {
        let author = registry().get("mr_hyde").unwrap();

        assert_eq!(author.name, "Mr. Hyde");
        assert_eq!(author.website.as_deref(), Some("https://hydephp.com"));
    }

    #[test]
    fn test_name_defaults_to_username() {
        assert_eq!(registry().get("jane").unwrap().name, "jane");
    }

    #[test]
    fn test_resolve_shares_instance() {
        let registry = registry();

        let a = registry.resolve("mr_hyde");
        let b = registry.resolve("mr_hyde");

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_resolve_unknown_username() {
        let author = registry().resolve("stranger");

        assert_eq!(*author, PostAuthor::from_username("stranger"));
        assert_eq!(registry().len(), 2);
    }
}
