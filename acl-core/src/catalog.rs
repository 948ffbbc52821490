//! # Resource Catalog
//!
//! The declared set of (resource, action) pairs the running system uses.
//! Route registration fills it during bootstrap; afterwards it is only read,
//! by catalog reconciliation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::WILDCARD;

/// Actions declared for the reserved `*` resource in a fresh catalog.
const SEED_ACTIONS: [&str; 5] = [WILDCARD, "read", "create", "update", "delete"];

/// Mapping from resource name to the actions it supports.
///
/// Every resource implicitly supports `*`, which is always the first action
/// of its list. Adding is idempotent.
///
/// # Example
///
/// ```
/// use acl_core::ResourceCatalog;
///
/// let mut catalog = ResourceCatalog::empty();
/// catalog.add_resource("account", "login");
/// catalog.add_resource("account", "login");
///
/// assert_eq!(catalog.actions("account"), Some(&["*".to_string(), "login".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    resources: BTreeMap<String, Vec<String>>,
}

impl ResourceCatalog {
    /// Create a catalog seeded with the wildcard resource and CRUD actions.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        for action in SEED_ACTIONS {
            catalog.add_resource(WILDCARD, action);
        }
        catalog
    }

    /// Create a catalog with no resources at all.
    pub fn empty() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Register `action` under `resource`.
    ///
    /// Creates the resource entry (seeded with `*`) if absent; a pair that is
    /// already present is left alone.
    pub fn add_resource(&mut self, resource: impl Into<String>, action: impl Into<String>) {
        let action = action.into();
        let actions = self
            .resources
            .entry(resource.into())
            .or_insert_with(|| vec![WILDCARD.to_string()]);
        if !actions.contains(&action) {
            actions.push(action);
        }
    }

    /// Full mapping of resource name to declared actions.
    pub fn resources(&self) -> &BTreeMap<String, Vec<String>> {
        &self.resources
    }

    /// Actions declared for a resource.
    pub fn actions(&self, resource: &str) -> Option<&[String]> {
        self.resources.get(resource).map(Vec::as_slice)
    }

    /// Whether the exact (resource, action) pair is declared.
    pub fn contains(&self, resource: &str, action: &str) -> bool {
        self.resources
            .get(resource)
            .is_some_and(|actions| actions.iter().any(|a| a == action))
    }

    /// Iterate over every declared (resource, action) pair.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.resources.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| (resource.as_str(), action.as_str()))
        })
    }

    /// Number of declared (resource, action) pairs.
    pub fn len(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }

    /// Check if no resource is declared.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = ResourceCatalog::new();
        assert_eq!(
            catalog.actions("*").unwrap(),
            &["*", "read", "create", "update", "delete"]
        );
        assert_eq!(catalog.len(), 5);
        assert!(ResourceCatalog::empty().is_empty());
    }

    #[test]
    fn test_new_resource_gets_wildcard() {
        let mut catalog = ResourceCatalog::empty();
        catalog.add_resource("post", "publish");

        assert!(catalog.contains("post", "*"));
        assert!(catalog.contains("post", "publish"));
        assert!(!catalog.contains("post", "delete"));
        assert!(!catalog.contains("comment", "*"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut catalog = ResourceCatalog::empty();
        catalog.add_resource("account", "login");
        catalog.add_resource("account", "logout");
        catalog.add_resource("account", "login");
        catalog.add_resource("account", "*");

        assert_eq!(catalog.actions("account").unwrap(), &["*", "login", "logout"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_pairs() {
        let mut catalog = ResourceCatalog::empty();
        catalog.add_resource("b", "read");
        catalog.add_resource("a", "edit");

        let pairs: Vec<_> = catalog.pairs().collect();
        assert_eq!(pairs, vec![("a", "*"), ("a", "edit"), ("b", "*"), ("b", "read")]);
    }
}
