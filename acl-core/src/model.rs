//! # Policy Model
//!
//! Records the engine is loaded from and the projections it hands back.
//!
//! ```text
//! Group ──< RoleMembership ──(by name)──> Role ──< Permission
//! ```
//!
//! A group does not own its roles: a membership is a named reference plus a
//! status flag local to the membership. Roles are shared and looked up by name.

use serde::{Deserialize, Serialize};

use crate::error::{AclError, AclResult};

/// Reserved name matching any resource or any action.
pub const WILDCARD: &str = "*";

/// Decision returned for a group the engine has no policy for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AclPolicy {
    /// Unknown groups are allowed everything.
    Allow,
    /// Unknown groups are denied everything.
    #[default]
    Deny,
}

impl AclPolicy {
    /// Get the string representation of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            AclPolicy::Allow => "allow",
            AclPolicy::Deny => "deny",
        }
    }

    /// Parse policy from string representation.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::AclPolicy;
    ///
    /// assert_eq!(AclPolicy::parse("Allow"), Some(AclPolicy::Allow));
    /// assert_eq!(AclPolicy::parse("deny"), Some(AclPolicy::Deny));
    /// assert_eq!(AclPolicy::parse("maybe"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Some(AclPolicy::Allow),
            "deny" => Some(AclPolicy::Deny),
            _ => None,
        }
    }

    /// Whether this policy grants access.
    pub fn is_allow(&self) -> bool {
        matches!(self, AclPolicy::Allow)
    }
}

/// A (resource, action) grant owned by a role.
///
/// # Example
///
/// ```
/// use acl_core::Permission;
///
/// let perm = Permission::new("post", "*");
/// assert!(perm.matches("post", "delete"));
/// assert!(!perm.matches("comment", "delete"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// Resource name, or `*` for any resource.
    pub resource: String,
    /// Action name, or `*` for any action.
    pub action: String,
    /// Inactive permissions never contribute to an allow decision.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Permission {
    /// Create an active permission.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            active: true,
        }
    }

    /// Create an inactive permission.
    pub fn inactive(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            active: false,
            ..Self::new(resource, action)
        }
    }

    /// Check if this grant covers `resource`/`action`, honouring wildcards.
    ///
    /// The active flag is not consulted here; the loader only keeps active
    /// permissions in the role table.
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        (self.resource == WILDCARD || self.resource == resource)
            && (self.action == WILDCARD || self.action == action)
    }

    fn validate(&self, role: &str) -> AclResult<()> {
        if self.resource.is_empty() || self.action.is_empty() {
            return Err(AclError::InvalidRecord(format!(
                "role `{role}` has a permission with an empty resource or action"
            )));
        }
        Ok(())
    }
}

/// A named bundle of permissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Role name, referenced by group memberships.
    pub name: String,
    /// Inactive roles contribute no permissions.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Permissions owned by this role. Order is irrelevant to evaluation.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Create an active role with no permissions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            permissions: Vec::new(),
        }
    }

    /// Builder: append a permission.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Builder: set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Reject records the loader cannot index.
    pub fn validate(&self) -> AclResult<()> {
        if self.name.is_empty() {
            return Err(AclError::InvalidRecord("role with an empty name".to_string()));
        }
        self.permissions
            .iter()
            .try_for_each(|p| p.validate(&self.name))
    }
}

/// A group's reference to a role plus a status flag local to the membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoleMembership {
    /// Name of the referenced role.
    pub name: String,
    /// Inactive memberships contribute nothing, even if the role is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RoleMembership {
    /// Create an active membership.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
        }
    }

    /// Create an inactive membership.
    pub fn inactive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }
}

/// A named bundle of role memberships. Principals belong to groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group name, as carried by a principal.
    pub name: String,
    /// Inactive groups are not loaded.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Role memberships of this group.
    #[serde(default)]
    pub roles: Vec<RoleMembership>,
}

impl Group {
    /// Create an active group with no memberships.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            roles: Vec::new(),
        }
    }

    /// Builder: append a membership.
    pub fn with_role(mut self, membership: RoleMembership) -> Self {
        self.roles.push(membership);
        self
    }

    /// Builder: set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Reject records the loader cannot index.
    pub fn validate(&self) -> AclResult<()> {
        if self.name.is_empty() {
            return Err(AclError::InvalidRecord("group with an empty name".to_string()));
        }
        if self.roles.iter().any(|m| m.name.is_empty()) {
            return Err(AclError::InvalidRecord(format!(
                "group `{}` has a membership with an empty role name",
                self.name
            )));
        }
        Ok(())
    }
}

/// A membership enriched with the permissions of the role it references.
///
/// `permissions` is `None` when the role is not in the role table, and is
/// then omitted from serialized output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupRole {
    /// Name of the referenced role.
    pub name: String,
    /// Membership status flag.
    pub active: bool,
    /// Permissions of the referenced role, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

fn default_active() -> bool {
    true
}
