//! Error types for persistence and synchronization.

use acl_core::AclError;
use thiserror::Error;

/// Errors raised by a store backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend failure (connection, query, driver)
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Record already exists
    #[error("Record conflict: {0}")]
    Conflict(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronization error types.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A persistence call failed
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),

    /// The reseed hook failed
    #[error("Reseed failed: {0}")]
    Reseed(String),

    /// A persistence call exceeded the configured timeout
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out.
        operation: &'static str,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The fetched policy was rejected by the engine
    #[error("Policy error: {0}")]
    Acl(#[from] AclError),

    /// The service has not completed its initial load
    #[error("Access control is not initialized")]
    NotReady,
}

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Check if re-driving the operation may succeed.
    ///
    /// Backend failures and timeouts are transient; rejected policy records
    /// will be rejected again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Store(StoreError::Backend(_)) | SyncError::Timeout { .. } | SyncError::NotReady
        )
    }
}
