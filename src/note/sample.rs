//! Fixed sample notes served in fallback mode

use super::types::{Category, Filter, Note};
use chrono::{DateTime, Duration, Utc};

/// The five built-in sample notes, timestamped relative to `now`
pub fn sample_notes(now: DateTime<Utc>) -> Vec<Note> {
    vec![
        sample(
            "sample1",
            "Thank you to the person who helped me find my way when I was lost downtown yesterday. You took the time to walk me to my destination!",
            "Sarah Johnson",
            "Main Street",
            Category::Kindness,
            15,
            true,
            now - Duration::hours(2),
        ),
        sample(
            "sample2",
            "Grateful to the café barista who remembered my order and had it ready before I even reached the counter. Small gestures mean a lot!",
            "Michael Chen",
            "City Center",
            Category::Kindness,
            8,
            false,
            now - Duration::minutes(30),
        ),
        sample(
            "sample3",
            "Someone found my wallet and turned it in with everything intact. Thank you for your honesty and integrity!",
            "David Wilson",
            "Park Avenue",
            Category::LostAndFound,
            24,
            false,
            now - Duration::days(1),
        ),
        sample(
            "sample4",
            "Thanks to the kind stranger who helped me change my tire in the rain. You saved my day!",
            "Emma Rodriguez",
            "Highway 101",
            Category::Help,
            19,
            true,
            now - Duration::hours(4),
        ),
        sample(
            "sample5",
            "Thank you to the library staff who helped me find resources for my research project. Your expertise made all the difference!",
            "Anonymous",
            "Public Library",
            Category::Help,
            7,
            false,
            now - Duration::hours(10),
        ),
    ]
}

/// Sample notes passing `filter`, in their fixed display order
pub fn filtered_sample_notes(filter: Filter, now: DateTime<Utc>) -> Vec<Note> {
    sample_notes(now)
        .into_iter()
        .filter(|note| filter.matches(note))
        .collect()
}

/// Check whether an id belongs to the built-in sample set
pub fn is_sample_id(id: &str) -> bool {
    id.starts_with("sample")
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    message: &str,
    name: &str,
    location: &str,
    category: Category,
    likes: u64,
    featured: bool,
    created_at: DateTime<Utc>,
) -> Note {
    Note {
        id: id.to_string(),
        message: message.to_string(),
        name: name.to_string(),
        location: Some(location.to_string()),
        category,
        likes,
        featured,
        created_at,
    }
}
