//! Policy evaluation and group-role resolution over a single snapshot.
//!
//! Both functions are pure reads. Callers take a snapshot once and pass it
//! in, so a concurrent refresh can never be observed half-way.

use crate::model::{AclPolicy, GroupRole};
use crate::snapshot::PolicySnapshot;

/// Decide whether `group` may perform `action` on `resource`.
///
/// 1. A group absent from the group table gets the default policy.
/// 2. Inactive memberships are skipped.
/// 3. A membership whose role is not in the role table contributes nothing.
/// 4. Any permission matching resource and action (with `*` wildcards) allows.
pub fn is_allowed(
    snapshot: &PolicySnapshot,
    default_policy: AclPolicy,
    group: &str,
    resource: &str,
    action: &str,
) -> bool {
    let Some(memberships) = snapshot.groups().memberships(group) else {
        return default_policy.is_allow();
    };

    memberships
        .iter()
        .filter(|membership| membership.active)
        .filter_map(|membership| snapshot.roles().permissions(&membership.name))
        .flatten()
        .any(|permission| permission.matches(resource, action))
}

/// Independent copy of a group's memberships, each enriched with the
/// permissions of its role when that role is known.
///
/// Returns `None` for a group absent from the group table. Memberships are
/// not filtered by their active flag.
pub fn group_roles(snapshot: &PolicySnapshot, group: &str) -> Option<Vec<GroupRole>> {
    let memberships = snapshot.groups().memberships(group)?;

    Some(
        memberships
            .iter()
            .map(|membership| GroupRole {
                name: membership.name.clone(),
                active: membership.active,
                permissions: snapshot
                    .roles()
                    .permissions(&membership.name)
                    .map(<[_]>::to_vec),
            })
            .collect(),
    )
}
