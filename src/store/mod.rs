//! Document Store
//!
//! The external store is the single source of truth for notes. This module
//! defines the operations the board consumes and two implementations:
//!
//! - **FirestoreStore**: REST client for a Cloud Firestore collection
//! - **MemoryStore**: In-process store for tests and offline runs
//!
//! ## Operations
//!
//! 1. Create a note (server-assigned timestamp, zero likes)
//! 2. Query a page ordered by creation time descending, optionally filtered
//!    by category, continuing after a cursor
//! 3. Atomically increment a note's like count

mod error;
mod firestore;
mod memory;

pub use error::{StoreError, StoreResult};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::{MemoryStore, StoreOp};

use crate::note::{Category, Cursor, NewNote, Note};
use async_trait::async_trait;

/// Operations consumed from the external document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Create a note; returns it with its assigned id and timestamp
    async fn create_note(&self, note: NewNote) -> StoreResult<Note>;

    /// Fetch one page of notes, newest first
    async fn query_notes(&self, query: &NoteQuery) -> StoreResult<Vec<Note>>;

    /// Atomically add one to the stored like count of `id`
    async fn increment_likes(&self, id: &str) -> StoreResult<()>;
}

/// A paged query against the notes collection
#[derive(Debug, Clone, PartialEq)]
pub struct NoteQuery {
    /// Equality filter on category, `None` for all notes
    pub category: Option<Category>,
    /// Maximum number of notes to return
    pub limit: usize,
    /// Continue strictly after this note
    pub start_after: Option<Cursor>,
}

impl NoteQuery {
    /// First page of notes
    pub fn first_page(category: Option<Category>, limit: usize) -> Self {
        Self {
            category,
            limit,
            start_after: None,
        }
    }

    /// Builder: continue after `cursor`
    pub fn after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }
}
