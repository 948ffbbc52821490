//! Catalog reconciliation planning.
//!
//! Diffs the declared [`ResourceCatalog`] against persisted permission
//! records and produces the corrective operations, without touching a store.

use std::collections::HashSet;

use acl_core::ResourceCatalog;

use crate::store::{NewPermission, PermissionRecord};

/// Operations that bring the persisted records in line with the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Declared pairs with no persisted record.
    pub creates: Vec<NewPermission>,
    /// Ids of persisted records whose pair is no longer declared.
    pub deletes: Vec<String>,
}

impl ReconcilePlan {
    /// Check if there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of scheduled operations.
    pub fn len(&self) -> usize {
        self.creates.len() + self.deletes.len()
    }
}

/// Plan the creates and deletes for `catalog` given the `persisted` records.
///
/// Creates follow catalog order. Duplicate persisted records of a declared
/// pair are left in place; every record of an undeclared pair is deleted.
pub fn plan(catalog: &ResourceCatalog, persisted: &[PermissionRecord]) -> ReconcilePlan {
    let stored: HashSet<(&str, &str)> = persisted
        .iter()
        .map(|record| (record.resource.as_str(), record.action.as_str()))
        .collect();

    let creates = catalog
        .pairs()
        .filter(|pair| !stored.contains(pair))
        .map(|(resource, action)| NewPermission::new(resource, action))
        .collect();

    let deletes = persisted
        .iter()
        .filter(|record| !catalog.contains(&record.resource, &record.action))
        .map(|record| record.id.clone())
        .collect();

    ReconcilePlan { creates, deletes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, resource: &str, action: &str) -> PermissionRecord {
        PermissionRecord {
            id: id.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        }
    }

    #[test]
    fn test_plan_creates_missing_and_deletes_undeclared() {
        let mut catalog = ResourceCatalog::empty();
        catalog.add_resource("account", "login");
        catalog.add_resource("post", "read");

        let persisted = vec![
            record("1", "account", "*"),
            record("2", "account", "login"),
            record("3", "account", "register"),
            record("4", "legacy", "*"),
        ];

        let plan = plan(&catalog, &persisted);

        assert_eq!(
            plan.creates,
            vec![NewPermission::new("post", "*"), NewPermission::new("post", "read")]
        );
        assert_eq!(plan.deletes, vec!["3".to_string(), "4".to_string()]);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn test_plan_is_empty_when_in_sync() {
        let mut catalog = ResourceCatalog::empty();
        catalog.add_resource("post", "read");
        let persisted = vec![record("a", "post", "*"), record("b", "post", "read")];

        assert!(plan(&catalog, &persisted).is_empty());
    }

    #[test]
    fn test_plan_against_empty_store_creates_everything() {
        let catalog = ResourceCatalog::new();
        let plan = plan(&catalog, &[]);

        assert_eq!(plan.creates.len(), catalog.len());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn test_undeclared_pairs_are_always_deleted() {
        let catalog = ResourceCatalog::empty();
        let persisted = vec![record("x", "*", "*"), record("y", "post", "read")];

        let plan = plan(&catalog, &persisted);
        assert!(plan.creates.is_empty());
        assert_eq!(plan.deletes, vec!["x".to_string(), "y".to_string()]);
    }
}
