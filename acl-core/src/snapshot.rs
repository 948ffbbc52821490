//! Immutable policy snapshots and the loader that builds them.
//!
//! A refresh never edits live tables. The loader builds a fresh
//! [`RoleTable`] and [`GroupTable`] from the supplied records and wraps them
//! in a new [`PolicySnapshot`], which the engine then publishes in one swap.

use chrono::{DateTime, Utc};

use crate::error::AclResult;
use crate::model::{Group, Role};
use crate::tables::{GroupTable, RoleTable};

/// One consistent view of the role and group tables.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    roles: RoleTable,
    groups: GroupTable,
    version: u64,
    loaded_at: DateTime<Utc>,
}

impl PolicySnapshot {
    /// Snapshot with empty tables, as seen before the first load.
    pub fn empty() -> Self {
        Self {
            roles: RoleTable::new(),
            groups: GroupTable::new(),
            version: 0,
            loaded_at: Utc::now(),
        }
    }

    /// Build a snapshot from role and group records.
    ///
    /// - Every active permission of every active role is replayed through
    ///   [`RoleTable::allow`] into an empty table.
    /// - Every active group with a non-empty membership list gets that list
    ///   verbatim.
    ///
    /// All records are validated before anything is built.
    pub fn build(roles: &[Role], groups: &[Group], version: u64) -> AclResult<Self> {
        for role in roles {
            role.validate()?;
        }
        for group in groups {
            group.validate()?;
        }

        let mut role_table = RoleTable::new();
        for role in roles.iter().filter(|r| r.active) {
            for permission in role.permissions.iter().filter(|p| p.active) {
                role_table.allow(
                    role.name.as_str(),
                    permission.resource.as_str(),
                    Some(permission.action.as_str()),
                );
            }
        }

        let mut group_table = GroupTable::new();
        for group in groups.iter().filter(|g| g.active && !g.roles.is_empty()) {
            group_table.replace(group.name.as_str(), group.roles.clone());
        }

        Ok(Self {
            roles: role_table,
            groups: group_table,
            version,
            loaded_at: Utc::now(),
        })
    }

    /// The role table of this snapshot.
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// The group table of this snapshot.
    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    /// Load counter; 0 for the empty snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// When this snapshot was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Default for PolicySnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
