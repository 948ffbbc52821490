//! Persistence interfaces consumed by the synchronizer.
//!
//! The surrounding system provides these; how records are stored is its
//! concern. Roles and groups are exchanged as [`acl_core`] model records.

use acl_core::{Group, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A persisted catalog permission record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PermissionRecord {
    /// Store-assigned identifier.
    pub id: String,
    /// Resource name.
    pub resource: String,
    /// Action name.
    pub action: String,
}

/// A catalog permission to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NewPermission {
    /// Resource name.
    pub resource: String,
    /// Action name.
    pub action: String,
}

impl NewPermission {
    /// Create a new permission record payload.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

/// Persisted catalog permissions.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Fetch every persisted permission record.
    async fn find_all(&self) -> StoreResult<Vec<PermissionRecord>>;

    /// Persist a new permission record.
    async fn create(&self, permission: NewPermission) -> StoreResult<()>;

    /// Delete a permission record by id.
    async fn delete_by_id(&self, id: &str) -> StoreResult<()>;
}

/// Persisted roles.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch all active roles, each with its permission list.
    async fn find_all_active_with_permissions(&self) -> StoreResult<Vec<Role>>;
}

/// Persisted groups.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Fetch all active groups, each with its role-membership list.
    async fn find_all_active_with_roles(&self) -> StoreResult<Vec<Group>>;
}

/// Full schema/data reseed, run after reconciliation when configured.
#[async_trait]
pub trait ReseedHook: Send + Sync {
    /// Repopulate the store.
    async fn populate(&self) -> StoreResult<()>;
}
