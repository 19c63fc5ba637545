//! Core data types for thank-you notes
//!
//! This module defines the fundamental types shared by every layer:
//! - `Note`: A single submitted thank-you record
//! - `NewNote`: The payload written when a visitor submits a note
//! - `Category` and `Filter`: Classification and feed filtering
//! - `Cursor`: Continuation marker for paged queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Author name used when the visitor leaves the name field blank
pub const ANONYMOUS: &str = "Anonymous";

/// A single thank-you note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Store-assigned id, or `local-<uuid>` for preview cards
    pub id: String,
    /// The note text
    pub message: String,
    /// Author name, `"Anonymous"` when not given
    pub name: String,
    /// Optional location label
    #[serde(default)]
    pub location: Option<String>,
    /// Category derived from the message
    pub category: Category,
    /// Like count (never decreases)
    #[serde(default)]
    pub likes: u64,
    /// Whether the note carries the featured badge
    #[serde(default)]
    pub featured: bool,
    /// Creation instant (server time, or local clock for previews)
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Cursor pointing at this note, for "start after" continuation
    pub fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id.clone(),
        }
    }
}

/// Payload for creating a note; the store assigns id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNote {
    pub message: String,
    pub name: String,
    pub location: Option<String>,
    pub category: Category,
}

impl NewNote {
    /// Materialize this payload as a note with the given id and timestamp.
    ///
    /// New notes always start with zero likes and no featured badge.
    pub fn into_note(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Note {
        Note {
            id: id.into(),
            message: self.message,
            name: self.name,
            location: self.location,
            category: self.category,
            likes: 0,
            featured: false,
            created_at,
        }
    }
}

/// Category of a thank-you note
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    /// Someone helped, assisted or supported the author
    #[serde(rename = "Help")]
    Help,
    /// Something lost was found or returned
    #[serde(rename = "Lost and Found")]
    LostAndFound,
    /// Everything else
    #[serde(rename = "Kindness")]
    Kindness,
}

impl Category {
    /// Get all categories for iteration
    pub fn all() -> &'static [Category] {
        &[Category::Help, Category::LostAndFound, Category::Kindness]
    }

    /// Label stored in the document store and shown on cards
    pub fn label(&self) -> &'static str {
        match self {
            Category::Help => "Help",
            Category::LostAndFound => "Lost and Found",
            Category::Kindness => "Kindness",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "help" => Ok(Category::Help),
            "lostandfound" | "lostfound" => Ok(Category::LostAndFound),
            "kindness" => Ok(Category::Kindness),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown category or filter label
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Feed filter selected by the filter buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Show every category
    #[default]
    All,
    /// Show a single category
    Only(Category),
}

impl Filter {
    /// Category to filter on, `None` for `All`
    pub fn category(&self) -> Option<Category> {
        match self {
            Filter::All => None,
            Filter::Only(category) => Some(*category),
        }
    }

    /// Check whether a note passes this filter
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(category) => note.category == *category,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for Filter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Only)
    }
}

/// Marker referencing the last note of a fetched page.
///
/// The store orders by creation time then id, both descending, so the pair
/// uniquely positions a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_roundtrip_through_serde() {
        let json = serde_json::to_string(&Category::LostAndFound).unwrap();
        assert_eq!(json, "\"Lost and Found\"");

        let parsed: Category = serde_json::from_str("\"Help\"").unwrap();
        assert_eq!(parsed, Category::Help);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("ALL".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            "Lost and Found".parse::<Filter>().unwrap(),
            Filter::Only(Category::LostAndFound)
        );
        assert_eq!(
            "lost-and-found".parse::<Filter>().unwrap(),
            Filter::Only(Category::LostAndFound)
        );
        assert_eq!(
            "kindness".parse::<Filter>().unwrap(),
            Filter::Only(Category::Kindness)
        );
        assert!("gossip".parse::<Filter>().is_err());
    }

    #[test]
    fn test_new_note_starts_unliked_and_unfeatured() {
        let now = Utc::now();
        let note = NewNote {
            message: "Thanks!".into(),
            name: ANONYMOUS.into(),
            location: None,
            category: Category::Kindness,
        }
        .into_note("abc", now);

        assert_eq!(note.likes, 0);
        assert!(!note.featured);
        assert_eq!(note.cursor(), Cursor { created_at: now, id: "abc".into() });
    }
}
