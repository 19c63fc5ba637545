//! Thank-you notes
//!
//! Data model, keyword categorizer and the built-in sample set.

mod categorize;
mod sample;
mod types;

pub use categorize::categorize;
pub use sample::{filtered_sample_notes, is_sample_id, sample_notes};
pub use types::{Category, Cursor, Filter, NewNote, Note, UnknownCategory, ANONYMOUS};
