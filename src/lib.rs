//! # Thankwall
//!
//! Community thank-you board: visitors post short notes of gratitude, the
//! notes are categorized and shown as a filterable, paginated feed, and each
//! note can be liked once per visitor.
//!
//! Persistence and querying are delegated to an external document store.
//! When the store is unconfigured or unreachable the board falls back to a
//! fixed sample set so it always shows something.
//!
//! ## Modules
//!
//! - [`note`]: Note model, categorization and sample data
//! - [`store`]: Document store trait with Firestore and in-memory backends
//! - [`prefs`]: Local key-value preferences and the liked-notes record
//! - [`feed`]: Feed loading, infinite scroll, rendering and debouncing
//! - [`board`]: Event handlers and the view model a front-end draws
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thankwall::board::Board;
//! use thankwall::config::Config;
//! use thankwall::feed::StoreMode;
//! use thankwall::prefs::{MemoryKeyValueStore, PreferenceStore};
//! use thankwall::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let prefs = PreferenceStore::new(Arc::new(MemoryKeyValueStore::new()), 1000);
//!     let store = Arc::new(MemoryStore::new());
//!
//!     let mut board = Board::new(&config, Some(store), prefs, StoreMode::Remote);
//!
//!     board.open_dialog();
//!     board.form_mut().message = "Thanks for the help with my flat tire!".into();
//!     board.submit().await.unwrap();
//!
//!     for card in &board.view().cards {
//!         println!("[{}] {} ({})", card.category, card.message, card.age);
//!     }
//! }
//! ```

pub mod board;
pub mod config;
pub mod feed;
pub mod note;
pub mod prefs;
pub mod store;

pub use board::{Board, BoardView};
pub use config::Config;
pub use note::{Category, Filter, Note};
pub use store::{DocumentStore, StoreError};
