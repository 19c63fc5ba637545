//! Like handler
//!
//! Optimistically bumps a card's count, persists the increment and records
//! the like locally. The already-liked guard at the top makes repeated
//! activations harmless.

use crate::feed::{CardView, LikeState};
use crate::prefs::PreferenceStore;
use crate::store::{DocumentStore, StoreError};
use std::sync::Arc;

/// How a like activation ended
#[derive(Debug)]
pub enum LikeOutcome {
    /// The note was already liked from here; nothing changed
    AlreadyLiked,
    /// Persisted to the store and recorded locally
    Liked,
    /// Sample or preview card; recorded locally only
    LikedLocally,
    /// The store rejected the increment; the count was restored
    Failed(StoreError),
    /// No card with that id is on the board
    UnknownNote,
}

/// Applies likes to cards
pub struct LikeHandler {
    store: Option<Arc<dyn DocumentStore>>,
    prefs: PreferenceStore,
}

impl LikeHandler {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, prefs: PreferenceStore) -> Self {
        Self { store, prefs }
    }

    /// Like the note shown on `card`
    pub async fn like(&self, card: &mut CardView) -> LikeOutcome {
        if self.prefs.is_liked(&card.id) {
            tracing::debug!(id = %card.id, "Already liked this note");
            card.like_state = LikeState::Liked;
            return LikeOutcome::AlreadyLiked;
        }

        let previous = card.likes;
        card.likes = previous + 1;
        card.pulse = true;

        if !card.origin.is_persisted() {
            card.pulse = false;
            self.mark_liked(card);
            return LikeOutcome::LikedLocally;
        }

        let result = match &self.store {
            Some(store) => store.increment_likes(&card.id).await,
            None => Err(StoreError::Unconfigured),
        };
        card.pulse = false;

        match result {
            Ok(()) => {
                self.mark_liked(card);
                LikeOutcome::Liked
            }
            Err(e) => {
                tracing::error!(id = %card.id, error = %e, "Error updating likes");
                card.likes = previous;
                LikeOutcome::Failed(e)
            }
        }
    }

    fn mark_liked(&self, card: &mut CardView) {
        if let Err(e) = self.prefs.record_like(&card.id) {
            // The store already counted this like; keep the card disabled for
            // this session even though it could not be remembered.
            tracing::warn!(id = %card.id, error = %e, "Failed to record like locally");
        }
        card.like_state = LikeState::Liked;
    }
}
