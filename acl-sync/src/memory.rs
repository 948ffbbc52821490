//! In-memory store backend.
//!
//! Suitable for single-process deployments and testing. Implements every
//! store trait over shared `RwLock`-guarded collections; permission ids are
//! UUID v7 strings.

use std::collections::BTreeMap;
use std::sync::Arc;

use acl_core::{Group, Role};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{GroupStore, NewPermission, PermissionRecord, PermissionStore, ReseedHook, RoleStore};

/// Operation counters of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Permission records created
    pub permissions_created: u64,
    /// Permission records deleted
    pub permissions_deleted: u64,
    /// Reseed runs
    pub reseeds: u64,
}

#[derive(Debug, Default)]
struct Seed {
    roles: Vec<Role>,
    groups: Vec<Group>,
}

/// In-memory implementation of all store traits.
///
/// Cloning yields a handle onto the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    permissions: Arc<RwLock<BTreeMap<String, PermissionRecord>>>,
    roles: Arc<RwLock<BTreeMap<String, Role>>>,
    groups: Arc<RwLock<BTreeMap<String, Group>>>,
    seed: Arc<RwLock<Seed>>,
    stats: Arc<RwLock<MemoryStoreStats>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose reseed hook restores the given roles and groups.
    pub fn with_seed(roles: Vec<Role>, groups: Vec<Group>) -> Self {
        Self {
            seed: Arc::new(RwLock::new(Seed { roles, groups })),
            ..Self::default()
        }
    }

    /// Insert or replace a role, keyed by name.
    pub async fn put_role(&self, role: Role) {
        self.roles.write().await.insert(role.name.clone(), role);
    }

    /// Insert or replace a group, keyed by name.
    pub async fn put_group(&self, group: Group) {
        self.groups.write().await.insert(group.name.clone(), group);
    }

    /// Remove a group.
    pub async fn remove_group(&self, name: &str) -> StoreResult<Group> {
        self.groups
            .write()
            .await
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(format!("group `{name}`")))
    }

    /// Flip the active flag of a stored role.
    pub async fn set_role_active(&self, name: &str, active: bool) -> StoreResult<()> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(format!("role `{name}`")))?;
        role.active = active;
        Ok(())
    }

    /// Insert a permission record directly, returning its id.
    pub async fn insert_permission(&self, resource: &str, action: &str) -> String {
        let id = Uuid::now_v7().to_string();
        self.permissions.write().await.insert(
            id.clone(),
            PermissionRecord {
                id: id.clone(),
                resource: resource.to_string(),
                action: action.to_string(),
            },
        );
        id
    }

    /// Stored permission pairs, sorted.
    pub async fn permission_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .permissions
            .read()
            .await
            .values()
            .map(|p| (p.resource.clone(), p.action.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Operation counters.
    pub async fn stats(&self) -> MemoryStoreStats {
        self.stats.read().await.clone()
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<PermissionRecord>> {
        Ok(self.permissions.read().await.values().cloned().collect())
    }

    async fn create(&self, permission: NewPermission) -> StoreResult<()> {
        {
            let mut permissions = self.permissions.write().await;
            if permissions
                .values()
                .any(|p| p.resource == permission.resource && p.action == permission.action)
            {
                return Err(StoreError::Conflict(format!(
                    "permission {}:{}",
                    permission.resource, permission.action
                )));
            }
            let id = Uuid::now_v7().to_string();
            permissions.insert(
                id.clone(),
                PermissionRecord {
                    id,
                    resource: permission.resource,
                    action: permission.action,
                },
            );
        }

        self.stats.write().await.permissions_created += 1;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        self.permissions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("permission `{id}`")))?;

        self.stats.write().await.permissions_deleted += 1;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_all_active_with_permissions(&self) -> StoreResult<Vec<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .filter(|r| r.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn find_all_active_with_roles(&self) -> StoreResult<Vec<Group>> {
        Ok(self
            .groups
            .read()
            .await
            .values()
            .filter(|g| g.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReseedHook for MemoryStore {
    async fn populate(&self) -> StoreResult<()> {
        let seed = self.seed.read().await;

        *self.roles.write().await = seed
            .roles
            .iter()
            .map(|r| (r.name.clone(), r.clone()))
            .collect();
        *self.groups.write().await = seed
            .groups
            .iter()
            .map(|g| (g.name.clone(), g.clone()))
            .collect();

        self.stats.write().await.reseeds += 1;
        tracing::debug!(
            roles = seed.roles.len(),
            groups = seed.groups.len(),
            "Memory store reseeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acl_core::{Permission, RoleMembership};

    #[tokio::test]
    async fn test_permission_crud() {
        let store = MemoryStore::new();
        store.create(NewPermission::new("post", "read")).await.unwrap();
        let id = store.insert_permission("post", "*").await;

        assert_eq!(store.find_all().await.unwrap().len(), 2);
        assert!(matches!(
            store.create(NewPermission::new("post", "read")).await,
            Err(StoreError::Conflict(_))
        ));

        store.delete_by_id(&id).await.unwrap();
        assert!(matches!(store.delete_by_id(&id).await, Err(StoreError::NotFound(_))));
        assert_eq!(
            store.permission_pairs().await,
            vec![("post".to_string(), "read".to_string())]
        );

        let stats = store.stats().await;
        assert_eq!(stats.permissions_created, 1);
        assert_eq!(stats.permissions_deleted, 1);
    }

    #[tokio::test]
    async fn test_only_active_roles_and_groups_are_returned() {
        let store = MemoryStore::new();
        store
            .put_role(Role::new("editor").with_permission(Permission::new("post", "*")))
            .await;
        store.put_role(Role::new("old").with_active(false)).await;
        store
            .put_group(Group::new("writers").with_role(RoleMembership::new("editor")))
            .await;
        store.put_group(Group::new("gone").with_active(false)).await;

        let roles = store.find_all_active_with_permissions().await.unwrap();
        let groups = store.find_all_active_with_roles().await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "editor");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "writers");

        store.set_role_active("editor", false).await.unwrap();
        assert!(store.find_all_active_with_permissions().await.unwrap().is_empty());
        assert!(store.set_role_active("missing", true).await.is_err());
    }

    #[tokio::test]
    async fn test_populate_restores_seed() {
        let store = MemoryStore::with_seed(
            vec![Role::new("admin").with_permission(Permission::new("*", "*"))],
            vec![Group::new("admins").with_role(RoleMembership::new("admin"))],
        );
        store.put_role(Role::new("stray")).await;

        store.populate().await.unwrap();

        let roles = store.find_all_active_with_permissions().await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "admin");
        assert_eq!(store.stats().await.reseeds, 1);
    }
}
