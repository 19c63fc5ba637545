//! Feed session state
//!
//! One [`FeedSession`] is created when the feed is initialized and threaded
//! through every load and scroll call. It owns the selected filter, the
//! viewport class and the scroll controller.

use super::scroll::ScrollController;
use crate::config::FeedConfig;
use crate::note::Filter;

/// Viewport width class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// Phone-sized; fixed page size, no infinite scroll
    Narrow,
    /// Desktop-sized; larger pages and infinite scroll
    Wide,
}

impl Viewport {
    /// Classify a viewport width in CSS pixels
    pub fn from_width(width: u32, narrow_max_width: u32) -> Self {
        if width <= narrow_max_width {
            Viewport::Narrow
        } else {
            Viewport::Wide
        }
    }
}

/// Session state shared by the feed loader and scroll controller
#[derive(Debug, Clone)]
pub struct FeedSession {
    pub filter: Filter,
    pub viewport: Viewport,
    pub scroll: ScrollController,
}

impl FeedSession {
    /// New session showing all notes
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            filter: Filter::All,
            viewport: Viewport::from_width(config.viewport_width, config.narrow_max_width),
            scroll: ScrollController::new(config.scroll_threshold_px),
        }
    }

    /// Builder: set the initial filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Builder: set the viewport class
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}
