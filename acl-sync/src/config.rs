//! Access-control settings.
//!
//! Loaded from environment variables with defaults suitable for local
//! development.

use std::time::Duration;

use acl_core::AclPolicy;
use serde::{Deserialize, Serialize};

/// Settings for the access-control runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclSettings {
    /// Decision for groups with no recorded policy.
    pub default_policy: AclPolicy,

    /// Run the reseed hook after catalog reconciliation.
    pub regenerate_schema: bool,

    /// Group whose roles form the profile of an unauthenticated principal.
    pub guest_group: String,

    /// Bound on each persistence call made during sync, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_timeout_secs: Option<u64>,
}

impl Default for AclSettings {
    fn default() -> Self {
        Self {
            default_policy: AclPolicy::Deny,
            regenerate_schema: false,
            guest_group: "guest".to_string(),
            store_timeout_secs: None,
        }
    }
}

impl AclSettings {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `ACL_DEFAULT_POLICY`: `allow` or `deny` (default: deny)
    /// - `ACL_REGENERATE_SCHEMA`: run the reseed hook on startup (default: false)
    /// - `ACL_GUEST_GROUP`: guest group name (default: guest)
    /// - `ACL_STORE_TIMEOUT_SECS`: per-call persistence timeout (default: none)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            default_policy: std::env::var("ACL_DEFAULT_POLICY")
                .ok()
                .and_then(|s| AclPolicy::parse(&s))
                .unwrap_or(default.default_policy),
            regenerate_schema: std::env::var("ACL_REGENERATE_SCHEMA")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.regenerate_schema),
            guest_group: std::env::var("ACL_GUEST_GROUP").unwrap_or(default.guest_group),
            store_timeout_secs: std::env::var("ACL_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(default.store_timeout_secs),
        }
    }

    /// Persistence timeout as a `Duration`, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.store_timeout_secs.map(Duration::from_secs)
    }

    /// Builder: set the default policy.
    pub fn with_default_policy(mut self, policy: AclPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Builder: request a reseed after reconciliation.
    pub fn with_regenerate_schema(mut self, regenerate: bool) -> Self {
        self.regenerate_schema = regenerate;
        self
    }

    /// Builder: set the persistence timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.store_timeout_secs = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AclSettings::default();
        assert_eq!(settings.default_policy, AclPolicy::Deny);
        assert!(!settings.regenerate_schema);
        assert_eq!(settings.guest_group, "guest");
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn test_builders() {
        let settings = AclSettings::default()
            .with_default_policy(AclPolicy::Allow)
            .with_regenerate_schema(true)
            .with_timeout_secs(5);
        assert_eq!(settings.default_policy, AclPolicy::Allow);
        assert!(settings.regenerate_schema);
        assert_eq!(settings.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_deserialize() {
        let settings: AclSettings = serde_json::from_str(
            r#"{"default_policy":"allow","regenerate_schema":true,"guest_group":"anon"}"#,
        )
        .unwrap();
        assert_eq!(settings.default_policy, AclPolicy::Allow);
        assert_eq!(settings.guest_group, "anon");
        assert_eq!(settings.store_timeout_secs, None);
    }
}
