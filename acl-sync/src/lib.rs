//! # ACL Sync
//!
//! This crate keeps an [`acl_core::Acl`] engine synchronized with a
//! persisted permission catalog and with persisted roles and groups.
//!
//! ## Overview
//!
//! The acl-sync crate handles:
//! - **Stores**: async traits for permission, role and group persistence
//! - **Reconciliation**: diffing declared resources against persisted permissions
//! - **Loading**: fetching roles and groups and publishing a new snapshot
//! - **Readiness**: a gate request handlers wait on before authorizing
//!
//! ## Features
//!
//! - `memory` (default): in-memory store backend for single-process apps and tests
//!
//! ## Startup
//!
//! ```text
//! route registration ── add_resource ──> ResourceCatalog
//!                                              │
//! AclService::init_acl                         ▼
//!   1. PermissionStore::find_all ──> plan creates/deletes
//!   2. create/delete concurrently, all awaited (any failure fails the run)
//!   3. ReseedHook::populate          (if regenerate_schema)
//!   4. RoleStore + GroupStore fetched concurrently
//!   5. Acl::update ──> snapshot published, gate opened
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acl_core::ResourceCatalog;
//! use acl_sync::{AclService, AclSettings, CatalogSync, MemoryStore};
//!
//! async fn startup() -> acl_sync::SyncResult<()> {
//!     let mut catalog = ResourceCatalog::new();
//!     catalog.add_resource("account", "login");
//!     catalog.add_resource("account", "register");
//!
//!     let service = AclService::new(
//!         catalog,
//!         CatalogSync::from_store(MemoryStore::new()),
//!         AclSettings::from_env(),
//!     );
//!     service.init_acl().await?;
//!
//!     service.authorize("guest", "account", "login")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod reconcile;
pub mod service;
pub mod store;
pub mod sync;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types
pub use config::AclSettings;
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use reconcile::{plan, ReconcilePlan};
pub use service::AclService;
pub use store::{GroupStore, NewPermission, PermissionRecord, PermissionStore, ReseedHook, RoleStore};
pub use sync::{CatalogSync, ReconcileReport};

#[cfg(feature = "memory")]
pub use memory::{MemoryStore, MemoryStoreStats};
