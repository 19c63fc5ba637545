//! Card Feed
//!
//! Everything between the document store and the rendered list of cards.
//!
//! ## Architecture
//!
//! - **FeedLoader**: First page of the feed, with sample-data fallback
//! - **ScrollController**: Cursor-based continuation pages
//! - **FeedSession**: Filter, viewport and scroll state for one feed
//! - **render**: Note to card view model, including relative ages
//! - **Debouncer**: Coalesces bursts of scroll/resize events

mod debounce;
mod loader;
mod render;
mod scroll;
mod session;

pub use debounce::Debouncer;
pub use loader::{
    FeedLoad, FeedLoader, StoreMode, EMPTY_FEED_MESSAGE, LOAD_ERROR_MESSAGE, SAMPLE_BANNER,
};
pub use render::{relative_age, render, CardOrigin, CardView, LikeState};
pub use scroll::{ScrollController, ScrollPosition};
pub use session::{FeedSession, Viewport};
