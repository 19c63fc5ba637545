//! Keyword categorizer
//!
//! Maps a free-text message to a category. Rules are checked in priority
//! order and the first rule with any matching keyword wins.

use super::types::Category;

/// Keyword rules in priority order
const RULES: &[(Category, &[&str])] = &[
    (Category::Help, &["help", "assist", "support"]),
    (Category::LostAndFound, &["found", "lost", "missing"]),
];

/// Categorize a message by case-insensitive keyword matching.
///
/// Falls back to [`Category::Kindness`] when no rule matches.
pub fn categorize(message: &str) -> Category {
    let lower = message.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Kindness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_keywords() {
        assert_eq!(categorize("Thanks for the help!"), Category::Help);
        assert_eq!(categorize("You ASSISTED me with my bags"), Category::Help);
        assert_eq!(categorize("Grateful for your support"), Category::Help);
    }

    #[test]
    fn test_lost_and_found_keywords() {
        assert_eq!(categorize("Someone found my wallet"), Category::LostAndFound);
        assert_eq!(categorize("My LOST dog came home"), Category::LostAndFound);
        assert_eq!(categorize("The missing keys are back"), Category::LostAndFound);
    }

    #[test]
    fn test_help_takes_priority_over_lost_and_found() {
        // Both rule sets match; Help is checked first
        assert_eq!(
            categorize("You helped me when I was lost downtown"),
            Category::Help
        );
    }

    #[test]
    fn test_default_is_kindness() {
        assert_eq!(categorize("The barista remembered my order"), Category::Kindness);
        assert_eq!(categorize(""), Category::Kindness);
    }

    #[test]
    fn test_substring_matching() {
        // Keywords match inside longer words, as a plain scan does
        assert_eq!(categorize("unhelpful? no, wonderful"), Category::Help);
        assert_eq!(categorize("Profound thanks"), Category::LostAndFound);
    }
}
