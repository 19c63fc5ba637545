//! Feed loader
//!
//! Fetches the first page of the feed from the document store, or serves
//! the built-in sample set when the store is not in use or not reachable.

use super::session::Viewport;
use crate::config::{FeedConfig, StoreConfig};
use crate::note::{filtered_sample_notes, Cursor, Filter, Note};
use crate::prefs::PreferenceStore;
use crate::store::{DocumentStore, NoteQuery, StoreError, StoreResult};
use chrono::Utc;
use std::sync::Arc;

/// Banner shown above the feed in sample mode
pub const SAMPLE_BANNER: &str =
    "Note: Showing sample data. The document store is not configured for this board.";

/// Shown in place of the feed when the store has no matching notes
pub const EMPTY_FEED_MESSAGE: &str = "No thank you notes found. Be the first to share!";

/// Shown in place of the feed on unexpected load failures
pub const LOAD_ERROR_MESSAGE: &str = "Error loading thank you notes. Please try again later.";

/// Whether the board talks to the remote store, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Read and write the document store
    Remote,
    /// Serve sample data and simulate submissions
    Local,
}

impl StoreMode {
    /// Remote when enabled in config or by the local override flag
    pub fn resolve(config: &StoreConfig, prefs: &PreferenceStore) -> Self {
        if config.use_remote_store || prefs.use_remote_override() {
            StoreMode::Remote
        } else {
            StoreMode::Local
        }
    }
}

/// Result of loading the first page of the feed
#[derive(Debug)]
pub enum FeedLoad {
    /// Notes from the store; `continuation` is set when more pages may follow
    Page {
        notes: Vec<Note>,
        continuation: Option<Cursor>,
    },
    /// Store returned no notes for this filter
    Empty,
    /// Sample notes, already filtered
    Sample { notes: Vec<Note> },
    /// Unexpected failure; the feed shows an inline error
    Failed { error: StoreError },
}

/// Loads feed pages according to the store mode and page-size policy
pub struct FeedLoader {
    store: Option<Arc<dyn DocumentStore>>,
    mode: StoreMode,
    config: FeedConfig,
}

impl FeedLoader {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, mode: StoreMode, config: FeedConfig) -> Self {
        Self {
            store,
            mode,
            config,
        }
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// First-page size for a viewport
    pub fn page_size(&self, viewport: Viewport) -> usize {
        match viewport {
            Viewport::Narrow => self.config.narrow_page_size,
            Viewport::Wide => self.config.wide_page_size,
        }
    }

    /// Load the first page for `filter`. Never fails; errors become
    /// [`FeedLoad::Sample`] or [`FeedLoad::Failed`].
    pub async fn load(&self, filter: Filter, viewport: Viewport) -> FeedLoad {
        let store = match (self.mode, &self.store) {
            (StoreMode::Remote, Some(store)) => store,
            (StoreMode::Local, _) => {
                tracing::info!(filter = %filter, "Local mode: using sample data");
                return self.sample(filter);
            }
            (StoreMode::Remote, None) => {
                tracing::warn!("Document store is not configured, using sample data");
                return self.sample(filter);
            }
        };

        let limit = self.page_size(viewport);
        let query = NoteQuery::first_page(filter.category(), limit);

        match store.query_notes(&query).await {
            Ok(notes) if notes.is_empty() => FeedLoad::Empty,
            Ok(notes) => {
                tracing::debug!(count = notes.len(), filter = %filter, "Loaded feed page");
                let continuation = if viewport == Viewport::Wide
                    && notes.len() >= self.config.wide_page_size
                {
                    notes.last().map(Note::cursor)
                } else {
                    None
                };
                FeedLoad::Page {
                    notes,
                    continuation,
                }
            }
            Err(e) if e.is_fallback() => {
                tracing::warn!(error = %e, store = store.name(), "Store unusable, using sample data");
                self.sample(filter)
            }
            Err(e) => {
                tracing::error!(error = %e, store = store.name(), "Failed to load thank you notes");
                FeedLoad::Failed { error: e }
            }
        }
    }

    /// Fetch the continuation page after `cursor`
    pub async fn load_more(&self, filter: Filter, cursor: Cursor) -> StoreResult<Vec<Note>> {
        let store = match (self.mode, &self.store) {
            (StoreMode::Remote, Some(store)) => store,
            _ => return Ok(Vec::new()),
        };

        let query =
            NoteQuery::first_page(filter.category(), self.config.scroll_page_size).after(cursor);
        store.query_notes(&query).await
    }

    fn sample(&self, filter: Filter) -> FeedLoad {
        FeedLoad::Sample {
            notes: filtered_sample_notes(filter, Utc::now()),
        }
    }
}
