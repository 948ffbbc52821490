//! # Policy Engine
//!
//! [`Acl`] holds the current [`PolicySnapshot`] behind a reference that is
//! swapped whole on every refresh. Readers clone the `Arc` under a read lock
//! held only for that clone, then evaluate without any lock, so they observe
//! either the fully-old or the fully-new tables.
//!
//! Writers are serialized: two refreshes never build concurrently.

use std::sync::{Arc, Mutex, RwLock};

use crate::error::{AclError, AclResult};
use crate::evaluator;
use crate::model::{AclPolicy, Group, GroupRole, Role};
use crate::snapshot::PolicySnapshot;

/// The access-control engine.
///
/// # Example
///
/// ```
/// use acl_core::{Acl, AclPolicy, Group, Permission, Role, RoleMembership};
///
/// let acl = Acl::new(AclPolicy::Deny);
/// acl.update(
///     &[Role::new("editor").with_permission(Permission::new("post", "*"))],
///     &[Group::new("writers").with_role(RoleMembership::new("editor"))],
/// )
/// .unwrap();
///
/// assert!(acl.is_allowed("writers", "post", "delete"));
/// assert!(!acl.is_allowed("writers", "comment", "delete"));
/// ```
#[derive(Debug)]
pub struct Acl {
    default_policy: AclPolicy,
    current: RwLock<Arc<PolicySnapshot>>,
    writer: Mutex<()>,
}

impl Acl {
    /// Create an engine with empty tables.
    pub fn new(default_policy: AclPolicy) -> Self {
        Self {
            default_policy,
            current: RwLock::new(Arc::new(PolicySnapshot::empty())),
            writer: Mutex::new(()),
        }
    }

    /// Create an engine and load it with an initial policy.
    pub fn with_policy(default_policy: AclPolicy, roles: &[Role], groups: &[Group]) -> AclResult<Self> {
        let acl = Self::new(default_policy);
        acl.update(roles, groups)?;
        Ok(acl)
    }

    /// Policy applied to groups with no entry in the group table.
    pub fn default_policy(&self) -> AclPolicy {
        self.default_policy
    }

    /// The currently published snapshot.
    ///
    /// Hold on to the returned `Arc` to run several queries against one
    /// consistent view.
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Rebuild both tables from `roles` and `groups` and publish them together.
    ///
    /// Malformed records are rejected before anything is published; on error
    /// the previous snapshot stays in place. Returns the new snapshot version.
    pub fn update(&self, roles: &[Role], groups: &[Group]) -> AclResult<u64> {
        let _writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let version = self.snapshot().version() + 1;
        let next = Arc::new(PolicySnapshot::build(roles, groups, version)?);

        tracing::info!(
            version,
            roles = next.roles().len(),
            groups = next.groups().len(),
            "Publishing policy snapshot"
        );

        let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = next;
        Ok(version)
    }

    /// Decide whether `group` may perform `action` on `resource`.
    pub fn is_allowed(&self, group: &str, resource: &str, action: &str) -> bool {
        evaluator::is_allowed(&self.snapshot(), self.default_policy, group, resource, action)
    }

    /// Like [`is_allowed`](Self::is_allowed), but refusals become
    /// [`AclError::Forbidden`].
    pub fn authorize(&self, group: &str, resource: &str, action: &str) -> AclResult<()> {
        if self.is_allowed(group, resource, action) {
            return Ok(());
        }
        tracing::debug!(group, resource, action, "Access denied");
        Err(AclError::Forbidden {
            group: group.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        })
    }

    /// Permission-enriched copy of a group's role memberships.
    ///
    /// `None` if the group has no entry in the group table.
    pub fn get_group_roles(&self, group: &str) -> Option<Vec<GroupRole>> {
        evaluator::group_roles(&self.snapshot(), group)
    }

    /// Like [`get_group_roles`](Self::get_group_roles), but an unknown group
    /// is an [`AclError::UnknownGroup`].
    pub fn require_group_roles(&self, group: &str) -> AclResult<Vec<GroupRole>> {
        self.get_group_roles(group)
            .ok_or_else(|| AclError::UnknownGroup(group.to_string()))
    }

    /// Check if the group has an entry in the group table.
    pub fn has_group(&self, group: &str) -> bool {
        self.snapshot().groups().contains(group)
    }
}

impl Default for Acl {
    fn default() -> Self {
        Self::new(AclPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Permission, RoleMembership};
    use std::thread;

    fn editor(active: bool) -> Role {
        Role::new("editor")
            .with_active(active)
            .with_permission(Permission::new("post", "*"))
    }

    fn writers() -> Group {
        Group::new("writers").with_role(RoleMembership::new("editor"))
    }

    #[test]
    fn test_empty_engine_uses_default_policy() {
        assert!(!Acl::new(AclPolicy::Deny).is_allowed("writers", "post", "read"));
        assert!(Acl::new(AclPolicy::Allow).is_allowed("writers", "post", "read"));
    }

    #[test]
    fn test_with_policy() {
        let acl = Acl::with_policy(AclPolicy::Deny, &[editor(true)], &[writers()]).unwrap();
        assert!(acl.is_allowed("writers", "post", "delete"));
        assert_eq!(acl.snapshot().version(), 1);
    }

    #[test]
    fn test_refresh_deactivating_role() {
        let acl = Acl::with_policy(AclPolicy::Deny, &[editor(true)], &[writers()]).unwrap();
        assert!(acl.is_allowed("writers", "post", "delete"));

        acl.update(&[editor(false)], &[writers()]).unwrap();
        assert!(!acl.is_allowed("writers", "post", "delete"));
    }

    #[test]
    fn test_update_is_idempotent() {
        let acl = Acl::new(AclPolicy::Deny);
        acl.update(&[editor(true)], &[writers()]).unwrap();
        let first = acl.snapshot();
        acl.update(&[editor(true)], &[writers()]).unwrap();
        let second = acl.snapshot();

        assert_eq!(first.roles(), second.roles());
        assert_eq!(first.groups(), second.groups());
        assert_eq!(second.version(), 2);
    }

    #[test]
    fn test_dropped_group_falls_back_to_default() {
        let acl = Acl::with_policy(AclPolicy::Allow, &[editor(true)], &[writers()]).unwrap();
        assert!(!acl.is_allowed("writers", "comment", "read"));

        acl.update(&[editor(true)], &[]).unwrap();
        assert!(!acl.has_group("writers"));
        assert!(acl.is_allowed("writers", "comment", "read"));
    }

    #[test]
    fn test_failed_update_keeps_previous_snapshot() {
        let acl = Acl::with_policy(AclPolicy::Deny, &[editor(true)], &[writers()]).unwrap();

        let err = acl.update(&[Role::new("")], &[writers()]).unwrap_err();
        assert!(matches!(err, AclError::InvalidRecord(_)));
        assert!(acl.is_allowed("writers", "post", "delete"));
        assert_eq!(acl.snapshot().version(), 1);
    }

    #[test]
    fn test_authorize() {
        let acl = Acl::with_policy(AclPolicy::Deny, &[editor(true)], &[writers()]).unwrap();
        assert!(acl.authorize("writers", "post", "read").is_ok());
        assert_eq!(
            acl.authorize("writers", "comment", "read"),
            Err(AclError::Forbidden {
                group: "writers".to_string(),
                resource: "comment".to_string(),
                action: "read".to_string(),
            })
        );
    }

    #[test]
    fn test_get_group_roles() {
        let acl = Acl::with_policy(AclPolicy::Deny, &[editor(true)], &[writers()]).unwrap();
        let roles = acl.get_group_roles("writers").unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].permissions, Some(vec![Permission::new("post", "*")]));
        assert!(acl.get_group_roles("nobody").is_none());
        assert_eq!(
            acl.require_group_roles("nobody"),
            Err(AclError::UnknownGroup("nobody".to_string()))
        );
    }

    #[test]
    fn test_readers_never_see_torn_state() {
        // Load A: group "a" -> role "ra". Load B: group "b" -> role "rb".
        // A torn read would show a group whose role is missing.
        let load_a = (
            vec![Role::new("ra").with_permission(Permission::new("*", "*"))],
            vec![Group::new("a").with_role(RoleMembership::new("ra"))],
        );
        let load_b = (
            vec![Role::new("rb").with_permission(Permission::new("*", "*"))],
            vec![Group::new("b").with_role(RoleMembership::new("rb"))],
        );

        let acl = Arc::new(Acl::with_policy(AclPolicy::Deny, &load_a.0, &load_a.1).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let acl = Arc::clone(&acl);
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = acl.snapshot();
                        let a = evaluator::is_allowed(&snapshot, AclPolicy::Deny, "a", "x", "y");
                        let b = evaluator::is_allowed(&snapshot, AclPolicy::Deny, "b", "x", "y");
                        assert!(a ^ b, "snapshot {} is torn", snapshot.version());
                    }
                })
            })
            .collect();

        for i in 0..200 {
            let (roles, groups) = if i % 2 == 0 { &load_b } else { &load_a };
            acl.update(roles, groups).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
