//! Document store error types
//!
//! Defines all errors that can occur when talking to the external store.

use thiserror::Error;

/// Errors that can occur in the document store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// No project/credentials configured for the store
    #[error("Document store is not configured")]
    Unconfigured,

    /// Store rejected the call (security rules, bad API key)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Collection or document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store could not be reached or is temporarily down
    #[error("Document store unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other error status returned by the store
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Response could not be decoded into notes
    #[error("Decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether the feed should fall back to sample data on this error
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            StoreError::Unconfigured
                | StoreError::PermissionDenied(_)
                | StoreError::Unavailable
                | StoreError::Timeout
        )
    }

    /// Short machine-readable code, mirroring the store's status names
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unconfigured => "unconfigured",
            StoreError::PermissionDenied(_) => "permission-denied",
            StoreError::NotFound(_) => "not-found",
            StoreError::Unavailable => "unavailable",
            StoreError::Timeout => "deadline-exceeded",
            StoreError::Api { .. } => "api-error",
            StoreError::Request(_) => "request-failed",
            StoreError::Decode(_) => "decode-error",
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connect() {
            StoreError::Unavailable
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Request(err)
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
