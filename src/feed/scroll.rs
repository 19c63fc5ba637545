//! Infinite scroll controller
//!
//! Tracks the continuation cursor and a busy flag. A fetch is started with
//! [`ScrollController::begin`] and must be closed with either
//! [`ScrollController::finish`] or [`ScrollController::fail`].

use crate::note::{Cursor, Note};

/// Scroll geometry sampled from the front-end, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Bottom edge of the visible area (scroll offset + viewport height)
    pub viewport_bottom: u32,
    /// Bottom edge of the feed container
    pub container_bottom: u32,
}

impl ScrollPosition {
    /// Position where the viewport has reached the end of the feed
    pub fn at_bottom(container_bottom: u32) -> Self {
        Self {
            viewport_bottom: container_bottom,
            container_bottom,
        }
    }
}

/// Cursor and busy state for continuation pages
#[derive(Debug, Clone)]
pub struct ScrollController {
    cursor: Option<Cursor>,
    busy: bool,
    threshold_px: u32,
}

impl ScrollController {
    pub fn new(threshold_px: u32) -> Self {
        Self {
            cursor: None,
            busy: false,
            threshold_px,
        }
    }

    /// Re-arm after a fresh feed load; `None` disables continuation
    pub fn reset(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
        self.busy = false;
    }

    /// Current continuation cursor
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Whether a continuation fetch is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether further pages can be requested
    pub fn is_armed(&self) -> bool {
        self.cursor.is_some()
    }

    /// Whether `position` is within the threshold of the feed bottom
    pub fn near_bottom(&self, position: ScrollPosition) -> bool {
        i64::from(position.viewport_bottom)
            > i64::from(position.container_bottom) - i64::from(self.threshold_px)
    }

    /// Start a continuation fetch if one is due.
    ///
    /// Returns the cursor to continue after and marks the controller busy,
    /// or `None` when busy, disarmed, or not near the bottom.
    pub fn begin(&mut self, position: ScrollPosition) -> Option<Cursor> {
        if self.busy || !self.near_bottom(position) {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.busy = true;
        Some(cursor)
    }

    /// Close a successful fetch; an empty page ends continuation
    pub fn finish(&mut self, page: &[Note]) {
        self.busy = false;
        if let Some(last) = page.last() {
            self.cursor = Some(last.cursor());
        } else {
            self.cursor = None;
        }
    }

    /// Close a failed fetch, keeping the cursor for a later trigger
    pub fn fail(&mut self) {
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Category;
    use chrono::Utc;

    fn note(id: &str) -> Note {
        Note {
            id: id.into(),
            message: String::new(),
            name: "Anonymous".into(),
            location: None,
            category: Category::Kindness,
            likes: 0,
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_threshold() {
        let controller = ScrollController::new(200);
        let at = |viewport_bottom| ScrollPosition {
            viewport_bottom,
            container_bottom: 1000,
        };

        assert!(!controller.near_bottom(at(700)));
        assert!(!controller.near_bottom(at(800)));
        assert!(controller.near_bottom(at(801)));
        assert!(controller.near_bottom(at(1200)));

        // Container shorter than the threshold
        assert!(ScrollController::new(200).near_bottom(ScrollPosition {
            viewport_bottom: 0,
            container_bottom: 100,
        }));
    }

    #[test]
    fn test_disarmed_controller_never_triggers() {
        let mut controller = ScrollController::new(200);
        assert!(controller.begin(ScrollPosition::at_bottom(1000)).is_none());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_retrigger_while_busy_is_noop() {
        let mut controller = ScrollController::new(200);
        controller.reset(Some(note("a").cursor()));

        let first = controller.begin(ScrollPosition::at_bottom(1000));
        assert_eq!(first.map(|c| c.id), Some("a".to_string()));
        assert!(controller.is_busy());

        assert!(controller.begin(ScrollPosition::at_bottom(1000)).is_none());
    }

    #[test]
    fn test_finish_advances_cursor() {
        let mut controller = ScrollController::new(200);
        controller.reset(Some(note("a").cursor()));
        controller.begin(ScrollPosition::at_bottom(1000));

        controller.finish(&[note("b"), note("c")]);
        assert!(!controller.is_busy());
        assert_eq!(controller.cursor().map(|c| c.id.as_str()), Some("c"));
    }

    #[test]
    fn test_empty_page_ends_continuation() {
        let mut controller = ScrollController::new(200);
        controller.reset(Some(note("a").cursor()));
        controller.begin(ScrollPosition::at_bottom(1000));

        controller.finish(&[]);
        assert!(!controller.is_armed());
    }

    #[test]
    fn test_failure_keeps_cursor() {
        let mut controller = ScrollController::new(200);
        controller.reset(Some(note("a").cursor()));
        controller.begin(ScrollPosition::at_bottom(1000));

        controller.fail();
        assert!(!controller.is_busy());
        assert_eq!(controller.cursor().map(|c| c.id.as_str()), Some("a"));
    }
}
