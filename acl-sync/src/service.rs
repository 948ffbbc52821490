//! # ACL Service
//!
//! Ties the engine to persistence. Startup runs [`AclService::init_acl`]:
//! reconcile the catalog, optionally reseed, fetch roles and groups, load
//! the engine, then open the ready gate. Request handlers wait on the gate
//! before authorizing and afterwards read the engine without blocking.
//!
//! Refreshes (`init_acl`, `reload`, `update`) are serialized; reads run
//! concurrently with them and see either the old or the new snapshot.

use std::sync::Arc;

use acl_core::profile::{self, GroupProfile, GroupRef};
use acl_core::{has_access, Acl, Group, GroupRole, Principal, RecordQuery, ResourceCatalog, Role};
use tokio::sync::{watch, Mutex};
use tracing::{info, instrument, warn};

use crate::config::AclSettings;
use crate::error::{SyncError, SyncResult};
use crate::sync::{CatalogSync, ReconcileReport};

/// Access-control runtime: engine, catalog, synchronizer and ready gate.
#[derive(Debug)]
pub struct AclService {
    acl: Arc<Acl>,
    catalog: ResourceCatalog,
    sync: CatalogSync,
    settings: AclSettings,
    refresh: Mutex<()>,
    ready: watch::Sender<bool>,
}

impl AclService {
    /// Create a service. The engine starts empty and not ready.
    ///
    /// `catalog` is the fully registered resource catalog; it is not
    /// modified afterwards.
    pub fn new(catalog: ResourceCatalog, sync: CatalogSync, settings: AclSettings) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            acl: Arc::new(Acl::new(settings.default_policy)),
            catalog,
            sync: sync.with_settings(&settings),
            settings,
            refresh: Mutex::new(()),
            ready,
        }
    }

    /// Shared handle to the engine.
    pub fn acl(&self) -> &Arc<Acl> {
        &self.acl
    }

    /// The declared resource catalog.
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Active settings.
    pub fn settings(&self) -> &AclSettings {
        &self.settings
    }

    /// Startup entry point.
    ///
    /// Reconciles the catalog with persisted permissions, reseeds when
    /// configured, then loads roles and groups. Resolves once the engine is
    /// populated; the service is ready from then on.
    #[instrument(skip(self))]
    pub async fn init_acl(&self) -> SyncResult<ReconcileReport> {
        let _refresh = self.refresh.lock().await;

        let report = self.sync.reconcile(&self.catalog).await?;
        let version = self.load().await?;
        self.mark_ready();

        info!(version, "Access control initialized");
        Ok(report)
    }

    /// Re-fetch roles and groups and reload the engine, without catalog
    /// reconciliation. On failure the previous snapshot stays in place.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> SyncResult<u64> {
        let _refresh = self.refresh.lock().await;

        match self.load().await {
            Ok(version) => {
                self.mark_ready();
                Ok(version)
            }
            Err(e) => {
                warn!(error = %e, "Policy reload failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Load the engine from the given records.
    #[instrument(skip_all, fields(roles = roles.len(), groups = groups.len()))]
    pub async fn update(&self, roles: &[Role], groups: &[Group]) -> SyncResult<u64> {
        let _refresh = self.refresh.lock().await;

        let version = self.acl.update(roles, groups)?;
        self.mark_ready();
        Ok(version)
    }

    /// Check if the initial load has completed.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait until the initial load has completed.
    pub async fn wait_ready(&self) {
        let mut ready = self.ready.subscribe();
        // the sender lives as long as `self`, so the channel cannot close here
        let _ = ready.wait_for(|ready| *ready).await;
    }

    /// Decide whether `group` may perform `action` on `resource`.
    pub fn is_allowed(&self, group: &str, resource: &str, action: &str) -> bool {
        self.acl.is_allowed(group, resource, action)
    }

    /// Authorization guard for request handlers.
    ///
    /// Fails with [`SyncError::NotReady`] before the initial load and with
    /// [`acl_core::AclError::Forbidden`] when the request is refused.
    pub fn authorize(&self, group: &str, resource: &str, action: &str) -> SyncResult<()> {
        if !self.is_ready() {
            return Err(SyncError::NotReady);
        }
        Ok(self.acl.authorize(group, resource, action)?)
    }

    /// Permission-enriched copy of a group's role memberships.
    pub fn get_group_roles(&self, group: &str) -> Option<Vec<GroupRole>> {
        self.acl.get_group_roles(group)
    }

    /// Effective roles of a principal's groups, inactive entries removed.
    pub fn group_profiles(&self, groups: &[GroupRef]) -> Vec<GroupProfile> {
        profile::group_profiles(&self.acl, groups)
    }

    /// Effective roles of an unauthenticated principal.
    pub fn guest_profile(&self) -> GroupProfile {
        profile::guest_profile(&self.acl, &self.settings.guest_group)
    }

    /// Whether `principal` may execute `query`.
    pub fn has_access(&self, query: &RecordQuery, principal: &Principal) -> bool {
        has_access(query, principal)
    }

    async fn load(&self) -> SyncResult<u64> {
        let (roles, groups) = self.sync.fetch_policy().await?;
        Ok(self.acl.update(&roles, &groups)?)
    }

    fn mark_ready(&self) {
        self.ready.send_replace(true);
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use acl_core::{AclError, AclPolicy, Permission, RoleMembership};

    fn catalog() -> ResourceCatalog {
        let mut catalog = ResourceCatalog::new();
        catalog.add_resource("post", "read");
        catalog.add_resource("post", "delete");
        catalog
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_role(Role::new("editor").with_permission(Permission::new("post", "*")))
            .await;
        store
            .put_group(Group::new("writers").with_role(RoleMembership::new("editor")))
            .await;
        store
    }

    #[tokio::test]
    async fn test_not_ready_before_init() {
        let service = AclService::new(
            catalog(),
            CatalogSync::from_store(seeded_store().await),
            AclSettings::default(),
        );

        assert!(!service.is_ready());
        assert!(matches!(
            service.authorize("writers", "post", "read"),
            Err(SyncError::NotReady)
        ));
    }

    #[tokio::test]
    async fn test_init_then_authorize() {
        let service = AclService::new(
            catalog(),
            CatalogSync::from_store(seeded_store().await),
            AclSettings::default(),
        );

        service.init_acl().await.unwrap();
        service.wait_ready().await;

        assert!(service.authorize("writers", "post", "delete").is_ok());
        assert!(matches!(
            service.authorize("writers", "comment", "delete"),
            Err(SyncError::Acl(AclError::Forbidden { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_opens_gate() {
        let service = AclService::new(
            catalog(),
            CatalogSync::from_store(MemoryStore::new()),
            AclSettings::default().with_default_policy(AclPolicy::Allow),
        );

        let version = service
            .update(
                &[Role::new("editor").with_permission(Permission::new("post", "*"))],
                &[Group::new("writers").with_role(RoleMembership::new("editor"))],
            )
            .await
            .unwrap();

        assert_eq!(version, 1);
        assert!(service.is_ready());
        assert!(service.is_allowed("strangers", "anything", "at-all"));
    }

    #[tokio::test]
    async fn test_guest_profile_uses_configured_group() {
        let store = seeded_store().await;
        store
            .put_role(Role::new("visitor").with_permission(Permission::new("post", "read")))
            .await;
        store
            .put_group(Group::new("guest").with_role(RoleMembership::new("visitor")))
            .await;

        let service = AclService::new(catalog(), CatalogSync::from_store(store), AclSettings::default());
        service.init_acl().await.unwrap();

        let guest = service.guest_profile();
        assert_eq!(guest.name, "guest");
        assert_eq!(guest.roles[0].name, "visitor");
    }
}
