//! Error types for policy operations
//!
//! Evaluation itself never fails; errors come from malformed load input and
//! from the `authorize` guard refusing a request.

use thiserror::Error;

/// Policy engine error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AclError {
    /// A role or group record is missing data the loader indexes by
    #[error("Invalid policy record: {0}")]
    InvalidRecord(String),

    /// The group may not perform the action on the resource
    #[error("Forbidden: group `{group}` may not `{action}` on `{resource}`")]
    Forbidden {
        /// Group the request was evaluated for.
        group: String,
        /// Requested resource.
        resource: String,
        /// Requested action.
        action: String,
    },

    /// The group has no entry in the group table
    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}

/// Result type for policy operations.
pub type AclResult<T> = Result<T, AclError>;

impl AclError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AclError::Forbidden { .. } => 403,
            AclError::UnknownGroup(_) => 404,
            AclError::InvalidRecord(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::InvalidRecord(_) => "INVALID_POLICY_RECORD",
            AclError::Forbidden { .. } => "FORBIDDEN",
            AclError::UnknownGroup(_) => "UNKNOWN_GROUP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_mapping() {
        let err = AclError::Forbidden {
            group: "writers".to_string(),
            resource: "post".to_string(),
            action: "delete".to_string(),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert_eq!(
            err.to_string(),
            "Forbidden: group `writers` may not `delete` on `post`"
        );
    }
}
