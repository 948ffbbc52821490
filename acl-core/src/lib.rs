//! # ACL Core
//!
//! An in-memory access-control policy engine. It answers whether a group
//! may perform an action on a named resource, and projects a group's
//! effective roles and permissions for serialization.
//!
//! ## Overview
//!
//! The acl-core crate handles:
//! - **Resource catalog**: the (resource, action) pairs the system declares
//! - **Role table**: role name -> permission entries
//! - **Group table**: group name -> role memberships
//! - **Evaluation**: wildcard matching with a default-policy fallback
//! - **Snapshots**: tables rebuilt together and published in one swap
//!
//! ## Architecture
//!
//! ```text
//! Group ──< RoleMembership ──(name)──> Role ──< Permission(resource, action)
//!
//! Matching:
//!   resource "*" matches any resource
//!   action   "*" matches any action
//!   unknown group -> default policy (Allow | Deny)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use acl_core::{Acl, AclPolicy, Group, Permission, Role, RoleMembership};
//!
//! let acl = Acl::new(AclPolicy::Deny);
//! acl.update(
//!     &[Role::new("editor").with_permission(Permission::new("post", "*"))],
//!     &[Group::new("writers").with_role(RoleMembership::new("editor"))],
//! )
//! .unwrap();
//!
//! assert!(acl.is_allowed("writers", "post", "delete"));
//! assert!(!acl.is_allowed("writers", "comment", "delete"));
//! assert!(!acl.is_allowed("strangers", "post", "read"));
//! ```
//!
//! ## Inactive records
//!
//! - Inactive permissions and inactive roles are never loaded
//! - Inactive groups and groups without memberships are never loaded
//! - Inactive memberships are loaded but skipped during evaluation
//!
//! ## Integration with acl-sync
//!
//! `acl-sync` reconciles a [`ResourceCatalog`] against persisted permission
//! records, fetches roles and groups, and feeds them to [`Acl::update`].

pub mod access;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod profile;
pub mod snapshot;
pub mod tables;

// Re-export main types for convenience
pub use access::{has_access, AccessType, AclScope, Principal, RecordQuery};
pub use catalog::ResourceCatalog;
pub use engine::Acl;
pub use error::{AclError, AclResult};
pub use model::{AclPolicy, Group, GroupRole, Permission, Role, RoleMembership, WILDCARD};
pub use profile::{GroupProfile, GroupRef};
pub use snapshot::PolicySnapshot;
pub use tables::{GroupTable, RoleTable};
