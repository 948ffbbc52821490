//! Catalog synchronizer.
//!
//! Executes a [`ReconcilePlan`](crate::reconcile::ReconcilePlan) against the
//! permission store, optionally reseeds, and fetches the role and group
//! records the engine is loaded from. Every persistence call can be bounded
//! by a timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use acl_core::{Group, ResourceCatalog, Role};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::config::AclSettings;
use crate::error::{StoreResult, SyncError, SyncResult};
use crate::reconcile;
use crate::store::{GroupStore, PermissionStore, ReseedHook, RoleStore};

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Permission records created
    pub created: usize,
    /// Permission records deleted
    pub deleted: usize,
    /// Whether the reseed hook ran
    pub reseeded: bool,
}

/// Reconciles the resource catalog with persistence and fetches policy records.
pub struct CatalogSync {
    permissions: Arc<dyn PermissionStore>,
    roles: Arc<dyn RoleStore>,
    groups: Arc<dyn GroupStore>,
    reseed: Option<Arc<dyn ReseedHook>>,
    regenerate_schema: bool,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for CatalogSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSync")
            .field("has_reseed", &self.reseed.is_some())
            .field("regenerate_schema", &self.regenerate_schema)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CatalogSync {
    /// Create a synchronizer over separate stores.
    pub fn new(
        permissions: Arc<dyn PermissionStore>,
        roles: Arc<dyn RoleStore>,
        groups: Arc<dyn GroupStore>,
    ) -> Self {
        Self {
            permissions,
            roles,
            groups,
            reseed: None,
            regenerate_schema: false,
            timeout: None,
        }
    }

    /// Create a synchronizer over one backend implementing every store trait.
    ///
    /// The backend also serves as reseed hook.
    pub fn from_store<S>(store: S) -> Self
    where
        S: PermissionStore + RoleStore + GroupStore + ReseedHook + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store.clone()).with_reseed(store)
    }

    /// Builder: set the reseed hook.
    pub fn with_reseed(mut self, hook: Arc<dyn ReseedHook>) -> Self {
        self.reseed = Some(hook);
        self
    }

    /// Builder: bound every persistence call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: run the reseed hook after reconciliation.
    pub fn with_regenerate_schema(mut self, regenerate: bool) -> Self {
        self.regenerate_schema = regenerate;
        self
    }

    /// Builder: apply the timeout and reseed flag from settings.
    pub fn with_settings(self, settings: &AclSettings) -> Self {
        self.with_timeout(settings.timeout())
            .with_regenerate_schema(settings.regenerate_schema)
    }

    /// Align persisted permission records with `catalog`.
    ///
    /// Creates and deletes run concurrently and every one of them is driven
    /// to completion. If any failed, the run fails with the first error in
    /// schedule order; operations that succeeded are kept. When configured,
    /// the reseed hook runs once all of them have finished.
    #[instrument(skip_all, fields(declared = catalog.len()))]
    pub async fn reconcile(&self, catalog: &ResourceCatalog) -> SyncResult<ReconcileReport> {
        let persisted = self
            .bounded("fetch permissions", self.permissions.find_all())
            .await?;
        let plan = reconcile::plan(catalog, &persisted);

        let creates = plan.creates.iter().map(|permission| {
            debug!(resource = %permission.resource, action = %permission.action, "Creating permission");
            self.bounded("create permission", self.permissions.create(permission.clone()))
        });
        let deletes = plan.deletes.iter().map(|id| {
            debug!(id = %id, "Deleting permission");
            self.bounded("delete permission", self.permissions.delete_by_id(id))
        });
        let (created, deleted) = futures::join!(join_all(creates), join_all(deletes));
        if let Some(e) = created.into_iter().chain(deleted).find_map(Result::err) {
            warn!(error = %e, "Permission catalog reconciliation failed");
            return Err(e);
        }

        let reseeded = self.reseed_if_requested().await?;

        let report = ReconcileReport {
            created: plan.creates.len(),
            deleted: plan.deletes.len(),
            reseeded,
        };
        info!(
            persisted = persisted.len(),
            created = report.created,
            deleted = report.deleted,
            reseeded = report.reseeded,
            "Permission catalog reconciled"
        );
        Ok(report)
    }

    /// Fetch all active roles and groups concurrently.
    #[instrument(skip_all)]
    pub async fn fetch_policy(&self) -> SyncResult<(Vec<Role>, Vec<Group>)> {
        let (roles, groups) = tokio::try_join!(
            self.bounded("fetch roles", self.roles.find_all_active_with_permissions()),
            self.bounded("fetch groups", self.groups.find_all_active_with_roles()),
        )?;
        debug!(roles = roles.len(), groups = groups.len(), "Fetched policy records");
        Ok((roles, groups))
    }

    async fn reseed_if_requested(&self) -> SyncResult<bool> {
        if !self.regenerate_schema {
            return Ok(false);
        }
        let Some(hook) = &self.reseed else {
            warn!("Schema regeneration requested but no reseed hook is configured");
            return Ok(false);
        };

        match self.bounded("reseed", hook.populate()).await {
            Ok(()) => Ok(true),
            Err(SyncError::Store(e)) => Err(SyncError::Reseed(e.to_string())),
            Err(e) => Err(e),
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> SyncResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let Some(limit) = self.timeout else {
            return Ok(call.await?);
        };

        match tokio::time::timeout(limit, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                warn!(operation, timeout_ms, "Persistence call timed out");
                Err(SyncError::Timeout {
                    operation,
                    timeout_ms,
                })
            }
        }
    }
}
