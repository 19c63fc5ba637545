//! Record of notes liked from this browser/profile
//!
//! Stored as a JSON array of note ids under [`LIKED_NOTES_KEY`]. The list is
//! bounded: once it reaches the cap, the oldest ids are dropped. Content
//! that does not parse as a string array is treated as empty and is
//! overwritten by the next recorded like.

use super::{KeyValueStore, PrefsError};
use std::sync::Arc;

/// Key holding the liked-notes array
pub const LIKED_NOTES_KEY: &str = "liked_notes";

/// Key holding the remote-store override flag
pub const USE_REMOTE_STORE_KEY: &str = "use_remote_store";

/// Default cap on remembered likes
pub const DEFAULT_MAX_LIKED: usize = 1000;

/// Local preference store tracking liked note ids
#[derive(Clone)]
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
    max_liked: usize,
}

impl PreferenceStore {
    /// Wrap a key-value store
    pub fn new(kv: Arc<dyn KeyValueStore>, max_liked: usize) -> Self {
        Self {
            kv,
            max_liked: max_liked.max(1),
        }
    }

    /// Liked note ids, oldest first.
    ///
    /// Read failures and malformed content both yield an empty list.
    pub fn liked_ids(&self) -> Vec<String> {
        let raw = match self.kv.get(LIKED_NOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read liked notes");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Liked notes record is malformed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Whether `id` has already been liked
    pub fn is_liked(&self, id: &str) -> bool {
        self.liked_ids().iter().any(|liked| liked == id)
    }

    /// Record a like for `id`.
    ///
    /// Duplicates are collapsed and the list is trimmed to the cap.
    pub fn record_like(&self, id: &str) -> Result<(), PrefsError> {
        let mut ids = self.liked_ids();
        if ids.iter().any(|liked| liked == id) {
            return Ok(());
        }

        ids.push(id.to_string());
        dedup_preserving_order(&mut ids);
        if ids.len() > self.max_liked {
            let excess = ids.len() - self.max_liked;
            ids.drain(..excess);
        }

        self.kv.set(LIKED_NOTES_KEY, &serde_json::to_string(&ids)?)
    }

    /// Value of the remote-store override flag
    pub fn use_remote_override(&self) -> bool {
        matches!(
            self.kv.get(USE_REMOTE_STORE_KEY),
            Ok(Some(v)) if v.trim().eq_ignore_ascii_case("true")
        )
    }

    /// Set or clear the remote-store override flag
    pub fn set_use_remote_override(&self, enabled: bool) -> Result<(), PrefsError> {
        if enabled {
            self.kv.set(USE_REMOTE_STORE_KEY, "true")
        } else {
            self.kv.remove(USE_REMOTE_STORE_KEY)
        }
    }
}

fn dedup_preserving_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
