//! Role and group tables.
//!
//! Both are plain mappings built privately by the loader and then frozen
//! inside a [`PolicySnapshot`](crate::snapshot::PolicySnapshot).

use std::collections::HashMap;

use crate::model::{Permission, RoleMembership, WILDCARD};

/// Mapping from role name to its permission entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTable {
    roles: HashMap<String, Vec<Permission>>,
}

impl RoleTable {
    /// Create an empty role table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a permission entry to `role`, creating the role if absent.
    ///
    /// `action` defaults to `*`. Entries are not deduplicated: allowing the
    /// same pair twice stores it twice.
    pub fn allow(&mut self, role: impl Into<String>, resource: impl Into<String>, action: Option<&str>) {
        self.roles
            .entry(role.into())
            .or_default()
            .push(Permission::new(resource, action.unwrap_or(WILDCARD)));
    }

    /// Permission entries of a role, `None` if the role is unknown.
    pub fn permissions(&self, role: &str) -> Option<&[Permission]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    /// Check if the role has an entry.
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Mapping from group name to its role-membership list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: HashMap<String, Vec<RoleMembership>>,
}

impl GroupTable {
    /// Create an empty group table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the membership list of `group`.
    pub fn replace(&mut self, group: impl Into<String>, memberships: Vec<RoleMembership>) {
        self.groups.insert(group.into(), memberships);
    }

    /// Membership list of a group, `None` if the group is unknown.
    pub fn memberships(&self, group: &str) -> Option<&[RoleMembership]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Check if the group has an entry.
    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
