//! Effective-permission projection for a principal.
//!
//! Used when a session is established or a profile is fetched: the
//! principal's groups are expanded into their roles and permissions, with
//! everything inactive stripped before it leaves the process.

use serde::{Deserialize, Serialize};

use crate::engine::Acl;
use crate::model::GroupRole;

/// A principal's reference to a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupRef {
    /// Group name.
    pub name: String,
    /// Whether the principal's membership in the group is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl GroupRef {
    /// Create an active group reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
        }
    }
}

/// A group as exposed in a principal's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupProfile {
    /// Group name.
    pub name: String,
    /// Active role memberships, each with the role's permissions when known.
    pub roles: Vec<GroupRole>,
}

/// Expand a principal's groups into their effective roles.
///
/// Inactive groups are dropped. Active groups unknown to the engine are kept
/// with an empty role list. Inactive memberships are removed.
///
/// # Example
///
/// ```
/// use acl_core::{Acl, AclPolicy, Group, Permission, Role, RoleMembership};
/// use acl_core::profile::{group_profiles, GroupRef};
///
/// let acl = Acl::with_policy(
///     AclPolicy::Deny,
///     &[Role::new("editor").with_permission(Permission::new("post", "*"))],
///     &[Group::new("writers").with_role(RoleMembership::new("editor"))],
/// )
/// .unwrap();
///
/// let profiles = group_profiles(&acl, &[GroupRef::new("writers")]);
/// assert_eq!(profiles[0].roles[0].name, "editor");
/// ```
pub fn group_profiles(acl: &Acl, groups: &[GroupRef]) -> Vec<GroupProfile> {
    groups
        .iter()
        .filter(|group| group.active)
        .map(|group| profile_for(acl, &group.name))
        .collect()
}

/// Profile of an unauthenticated principal, taken from the guest group.
pub fn guest_profile(acl: &Acl, guest_group: &str) -> GroupProfile {
    profile_for(acl, guest_group)
}

fn profile_for(acl: &Acl, group: &str) -> GroupProfile {
    let roles = acl
        .get_group_roles(group)
        .unwrap_or_default()
        .into_iter()
        .filter(|role| role.active)
        .collect();

    GroupProfile {
        name: group.to_string(),
        roles,
    }
}

fn default_active() -> bool {
    true
}
