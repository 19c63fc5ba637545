//! Local Preferences
//!
//! Visitor-local state that never leaves this machine: which notes were
//! liked, and whether the remote store override is switched on.

mod kv;
mod liked;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use liked::{PreferenceStore, DEFAULT_MAX_LIKED, LIKED_NOTES_KEY, USE_REMOTE_STORE_KEY};

use thiserror::Error;

/// Errors that can occur reading or writing preferences
#[derive(Error, Debug)]
pub enum PrefsError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for PrefsError {
    fn from(err: serde_json::Error) -> Self {
        PrefsError::Serialization(err.to_string())
    }
}
