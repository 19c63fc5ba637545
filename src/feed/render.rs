//! Card rendering
//!
//! Turns a [`Note`] into the display-ready [`CardView`] a front-end draws.

use crate::note::{Category, Note};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a card's note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrigin {
    /// Read from the document store
    Remote,
    /// Built-in sample data
    Sample,
    /// Local stand-in for a submission the store rejected
    Preview,
}

impl CardOrigin {
    /// Whether likes on this card are written to the store
    pub fn is_persisted(&self) -> bool {
        matches!(self, CardOrigin::Remote)
    }
}

/// Interactive state of the like affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    /// Clickable
    Available,
    /// Already liked from here; disabled and dimmed
    Liked,
}

/// Display model of one note card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub message: String,
    pub name: String,
    pub location: Option<String>,
    pub category: Category,
    /// Relative age, e.g. "5 minutes ago"
    pub age: String,
    /// Show the featured badge
    pub featured: bool,
    /// Displayed like count (may be optimistic)
    pub likes: u64,
    pub like_state: LikeState,
    pub origin: CardOrigin,
    /// Set while an optimistic like is in flight
    pub pulse: bool,
}

impl CardView {
    /// Whether the like affordance accepts clicks
    pub fn is_likeable(&self) -> bool {
        self.like_state == LikeState::Available
    }
}

/// Render a note as a card.
///
/// `liked` is whether the note id is in the local preference store.
pub fn render(note: &Note, origin: CardOrigin, liked: bool, now: DateTime<Utc>) -> CardView {
    let age = match origin {
        CardOrigin::Preview => "Just now (Preview)".to_string(),
        _ => relative_age(note.created_at, now),
    };

    CardView {
        id: note.id.clone(),
        message: note.message.clone(),
        name: note.name.clone(),
        location: note.location.clone(),
        category: note.category,
        age,
        featured: note.featured,
        likes: note.likes,
        like_state: if liked {
            LikeState::Liked
        } else {
            LikeState::Available
        },
        origin,
        pulse: false,
    }
}

/// Format the age of `created_at` relative to `now`.
///
/// Buckets use floor division: under a minute is "Just now", then minutes,
/// hours and days. Future timestamps (clock skew) also read "Just now".
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        plural(seconds / 60, "minute")
    } else if seconds < 86_400 {
        plural(seconds / 3600, "hour")
    } else {
        plural(seconds / 86_400, "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
