//! Thank-you Board
//!
//! The [`Board`] ties visitor actions to the feed, the document store and
//! the local preference store, and keeps a [`BoardView`] a front-end can
//! render after every call.
//!
//! ## Architecture
//!
//! - **Board**: Event entry points (load, filter, scroll, submit, like)
//! - **SubmissionHandler**: Form validation and note creation
//! - **LikeHandler**: Optimistic, once-per-visitor likes
//! - **BoardView**: Cards, banners, dialog and notification state
//!
//! Store failures never escape a `Board` method; each one leaves the view in
//! a usable, degraded state instead.

mod like;
mod submit;
mod view;

pub use like::{LikeHandler, LikeOutcome};
pub use submit::{
    failure_message, LocationChoice, SubmissionForm, SubmissionHandler, SubmitError,
    SubmitOutcome,
};
pub use view::{BoardView, Notice, NoticeKind, CONFIRMATION_TEXT};

use crate::config::{Config, FeedConfig};
use crate::feed::{
    render, CardOrigin, CardView, FeedLoad, FeedLoader, FeedSession, ScrollPosition, StoreMode,
    Viewport, EMPTY_FEED_MESSAGE, LOAD_ERROR_MESSAGE, SAMPLE_BANNER,
};
use crate::note::{Filter, Note};
use crate::prefs::PreferenceStore;
use crate::store::DocumentStore;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A community board session
pub struct Board {
    loader: FeedLoader,
    submitter: SubmissionHandler,
    likes: LikeHandler,
    prefs: PreferenceStore,
    session: FeedSession,
    view: BoardView,
    feed_config: FeedConfig,
    notification_ttl: Duration,
}

impl Board {
    pub fn new(
        config: &Config,
        store: Option<Arc<dyn DocumentStore>>,
        prefs: PreferenceStore,
        mode: StoreMode,
    ) -> Self {
        tracing::info!(
            mode = ?mode,
            store = store.as_ref().map(|s| s.name()).unwrap_or("none"),
            "Initializing board"
        );

        Self {
            loader: FeedLoader::new(store.clone(), mode, config.feed.clone()),
            submitter: SubmissionHandler::new(
                store.clone(),
                mode,
                config.submission.simulated_delay(),
            ),
            likes: LikeHandler::new(store, prefs.clone()),
            prefs,
            session: FeedSession::new(&config.feed),
            view: BoardView::default(),
            feed_config: config.feed.clone(),
            notification_ttl: config.submission.notification_ttl(),
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    pub fn mode(&self) -> StoreMode {
        self.loader.mode()
    }

    /// Creation form, for the front-end to fill in
    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.view.form
    }

    /// Replace the feed with the first page for the current filter
    pub async fn load_feed(&mut self) {
        self.view.loading = true;
        self.view.loading_more = false;
        self.view.banner = None;
        self.view.feed_message = None;

        let load = self
            .loader
            .load(self.session.filter, self.session.viewport)
            .await;
        self.view.loading = false;

        let (cards, continuation) = match load {
            FeedLoad::Page {
                notes,
                continuation,
            } => (self.render_all(&notes, CardOrigin::Remote), continuation),
            FeedLoad::Empty => {
                self.view.feed_message = Some(EMPTY_FEED_MESSAGE.to_string());
                (Vec::new(), None)
            }
            FeedLoad::Sample { notes } => {
                self.view.banner = Some(SAMPLE_BANNER.to_string());
                if notes.is_empty() {
                    self.view.feed_message = Some(EMPTY_FEED_MESSAGE.to_string());
                }
                (self.render_all(&notes, CardOrigin::Sample), None)
            }
            FeedLoad::Failed { .. } => {
                self.view.feed_message = Some(LOAD_ERROR_MESSAGE.to_string());
                (Vec::new(), None)
            }
        };

        self.view.cards = cards;
        self.session.scroll.reset(continuation);
    }

    /// Switch the category filter and reload
    pub async fn select_filter(&mut self, filter: Filter) {
        tracing::debug!(filter = %filter, "Filter selected");
        self.session.filter = filter;
        self.load_feed().await;
    }

    /// Reclassify the viewport; returns true when the class changed.
    ///
    /// The change applies from the next feed load.
    pub fn set_viewport_width(&mut self, width: u32) -> bool {
        let viewport = Viewport::from_width(width, self.feed_config.narrow_max_width);
        if viewport == self.session.viewport {
            return false;
        }
        self.session.viewport = viewport;
        true
    }

    /// Handle a scroll event; returns the number of cards appended
    pub async fn on_scroll(&mut self, position: ScrollPosition) -> usize {
        if self.session.viewport != Viewport::Wide {
            return 0;
        }
        let Some(cursor) = self.session.scroll.begin(position) else {
            return 0;
        };

        self.view.loading_more = true;
        let result = self.loader.load_more(self.session.filter, cursor).await;
        self.view.loading_more = false;

        match result {
            Ok(page) => {
                let known: HashSet<&str> = self.view.cards.iter().map(|c| c.id.as_str()).collect();
                let fresh: Vec<Note> = page
                    .iter()
                    .filter(|n| !known.contains(n.id.as_str()))
                    .cloned()
                    .collect();
                let cards = self.render_all(&fresh, CardOrigin::Remote);
                let appended = cards.len();
                self.view.cards.extend(cards);
                self.session.scroll.finish(&page);
                tracing::debug!(appended, armed = self.session.scroll.is_armed(), "Loaded more notes");
                appended
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error loading more thank you notes");
                self.session.scroll.fail();
                0
            }
        }
    }

    pub fn open_dialog(&mut self) {
        self.view.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.view.dialog_open = false;
    }

    /// Submit the creation form.
    ///
    /// Validation errors leave the dialog open. Every other path closes it.
    /// The `&mut self` borrow keeps a second submission out until this one
    /// returns.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let note = self.view.form.to_new_note()?;
        let outcome = self.submitter.submit(note).await;

        match &outcome {
            SubmitOutcome::Simulated => {
                self.view.form = SubmissionForm::default();
                self.close_dialog();
                self.notify(Notice::confirmation(self.notification_ttl));
            }
            SubmitOutcome::Posted(_) => {
                self.view.form = SubmissionForm::default();
                self.close_dialog();
                self.notify(Notice::confirmation(self.notification_ttl));
                self.load_feed().await;
            }
            SubmitOutcome::Preview { note, alert } => {
                let card = render(note, CardOrigin::Preview, false, Utc::now());
                self.view.cards.insert(0, card);
                self.view.feed_message = None;
                self.close_dialog();
                self.notify(Notice::alert(alert.clone()));
            }
        }

        Ok(outcome)
    }

    /// Like the card showing note `id`
    pub async fn like(&mut self, id: &str) -> LikeOutcome {
        match self.view.card_mut(id) {
            Some(card) => self.likes.like(card).await,
            None => {
                tracing::warn!(id, "Like for a note that is not on the board");
                LikeOutcome::UnknownNote
            }
        }
    }

    /// Remove the current notification
    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
    }

    /// Drop the notification if its display time is over
    pub fn tick(&mut self, now: Instant) {
        self.view.expire_notice(now);
    }

    fn notify(&mut self, notice: Notice) {
        self.view.notice = Some(notice);
    }

    fn render_all(&self, notes: &[Note], origin: CardOrigin) -> Vec<CardView> {
        let liked: HashSet<String> = self.prefs.liked_ids().into_iter().collect();
        let now = Utc::now();
        notes
            .iter()
            .map(|n| render(n, origin, liked.contains(&n.id), now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Debouncer, LikeState};
    use crate::note::{Category, NewNote, ANONYMOUS};
    use crate::prefs::MemoryKeyValueStore;
    use crate::store::{MemoryStore, NoteQuery, StoreError, StoreOp, StoreResult};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Memory store whose continuation pages take `delay` to arrive
    struct SlowStore {
        inner: MemoryStore,
        delay: Duration,
    }

    #[async_trait]
    impl DocumentStore for SlowStore {
        fn name(&self) -> &str {
            "slow"
        }

        async fn create_note(&self, note: NewNote) -> StoreResult<Note> {
            self.inner.create_note(note).await
        }

        async fn query_notes(&self, query: &NoteQuery) -> StoreResult<Vec<Note>> {
            if query.start_after.is_some() {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.query_notes(query).await
        }

        async fn increment_likes(&self, id: &str) -> StoreResult<()> {
            self.inner.increment_likes(id).await
        }
    }

    fn notes(count: usize) -> Vec<Note> {
        let now = Utc::now();
        (0..count)
            .map(|i| Note {
                id: format!("n{:02}", i),
                message: format!("Thanks #{}", i),
                name: "Sam".into(),
                location: None,
                category: Category::Kindness,
                likes: 0,
                featured: false,
                created_at: now - chrono::Duration::minutes(i as i64),
            })
            .collect()
    }

    fn prefs() -> PreferenceStore {
        PreferenceStore::new(Arc::new(MemoryKeyValueStore::new()), 100)
    }

    fn remote_board(store: Arc<MemoryStore>) -> Board {
        let mut config = Config::default();
        config.submission.simulated_delay_ms = 0;
        Board::new(&config, Some(store), prefs(), StoreMode::Remote)
    }

    fn local_board() -> Board {
        Board::new(&Config::default(), None, prefs(), StoreMode::Local)
    }

    #[tokio::test]
    async fn test_submission_failure_shows_preview_card() {
        let store = Arc::new(MemoryStore::with_notes(notes(2)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;
        store.fail(StoreOp::Create, || StoreError::Unavailable).await;

        board.open_dialog();
        *board.form_mut() = SubmissionForm {
            message: "Thanks for the help!".into(),
            name: String::new(),
            location: LocationChoice::Preset("Main St".into()),
        };
        let outcome = board.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Preview { .. }));

        let view = board.view();
        let card = &view.cards[0];
        assert_eq!(view.cards.len(), 3);
        assert_eq!(card.name, ANONYMOUS);
        assert_eq!(card.category, Category::Help);
        assert_eq!(card.likes, 0);
        assert_eq!(card.origin, CardOrigin::Preview);
        assert_eq!(card.age, "Just now (Preview)");
        assert!(!view.dialog_open);
        assert_eq!(view.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Alert));
        assert!(store.get(&card.id).await.is_none());
    }

    #[tokio::test]
    async fn test_successful_submission_reloads_feed() {
        let store = Arc::new(MemoryStore::with_notes(notes(1)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;

        board.open_dialog();
        board.form_mut().message = "Found my keys, thanks!".into();
        board.form_mut().name = "Ada".into();
        board.submit().await.unwrap();

        let view = board.view();
        assert_eq!(view.cards.len(), 2);
        assert!(view.cards.iter().any(|c| c.category == Category::LostAndFound));
        assert!(!view.dialog_open);
        assert_eq!(view.form, SubmissionForm::default());
        assert_eq!(
            view.notice.as_ref().map(|n| n.text.as_str()),
            Some(CONFIRMATION_TEXT)
        );
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_dialog_open() {
        let mut board = local_board();
        board.open_dialog();

        let err = board.submit().await.unwrap_err();
        assert_eq!(err, SubmitError::EmptyMessage);
        assert!(board.view().dialog_open);
        assert!(board.view().notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_submission_is_simulated() {
        let mut board = local_board();
        board.load_feed().await;
        board.open_dialog();
        board.form_mut().message = "You were kind to me".into();

        let outcome = board.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Simulated));
        assert!(!board.view().dialog_open);
        assert_eq!(board.view().cards.len(), 5);
        assert_eq!(
            board.view().notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::Confirmation)
        );
    }

    #[tokio::test]
    async fn test_filtered_sample_feed() {
        let mut board = local_board();
        board
            .select_filter(Filter::Only(Category::LostAndFound))
            .await;

        let view = board.view();
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].category, Category::LostAndFound);
        assert_eq!(view.cards[0].origin, CardOrigin::Sample);
        assert_eq!(view.banner.as_deref(), Some(SAMPLE_BANNER));
    }

    #[tokio::test]
    async fn test_permission_denied_shows_samples() {
        let store = Arc::new(MemoryStore::with_notes(notes(3)));
        store
            .fail(StoreOp::Query, || StoreError::PermissionDenied("denied".into()))
            .await;
        let mut board = remote_board(store);
        board.load_feed().await;

        assert_eq!(board.view().cards.len(), 5);
        assert!(board.view().banner.is_some());
    }

    #[tokio::test]
    async fn test_empty_and_failed_feed_messages() {
        let store = Arc::new(MemoryStore::new());
        let mut board = remote_board(store.clone());
        board.load_feed().await;
        assert_eq!(board.view().feed_message.as_deref(), Some(EMPTY_FEED_MESSAGE));

        store
            .fail(StoreOp::Query, || StoreError::Decode("bad".into()))
            .await;
        board.load_feed().await;
        assert_eq!(board.view().feed_message.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert!(board.view().cards.is_empty());
    }

    #[tokio::test]
    async fn test_infinite_scroll_armed_by_full_page() {
        let store = Arc::new(MemoryStore::with_notes(notes(25)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;

        assert_eq!(board.view().cards.len(), 20);
        assert!(board.session().scroll.is_armed());

        let appended = board.on_scroll(ScrollPosition::at_bottom(4000)).await;
        assert_eq!(appended, 5);
        assert_eq!(board.view().cards.len(), 25);
        assert_eq!(board.view().cards[20].id, "n20");
        assert!(!board.view().loading_more);

        // Empty continuation page ends infinite scroll.
        assert_eq!(board.on_scroll(ScrollPosition::at_bottom(5000)).await, 0);
        assert!(!board.session().scroll.is_armed());
        let calls = store.query_calls();
        assert_eq!(board.on_scroll(ScrollPosition::at_bottom(5000)).await, 0);
        assert_eq!(store.query_calls(), calls);
    }

    #[tokio::test]
    async fn test_infinite_scroll_not_armed_below_page_size() {
        let store = Arc::new(MemoryStore::with_notes(notes(19)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;

        assert_eq!(board.view().cards.len(), 19);
        assert!(!board.session().scroll.is_armed());
        assert_eq!(board.on_scroll(ScrollPosition::at_bottom(4000)).await, 0);
        assert_eq!(store.query_calls(), 1);
    }

    #[tokio::test]
    async fn test_scroll_ignored_away_from_bottom_and_on_narrow() {
        let store = Arc::new(MemoryStore::with_notes(notes(25)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;

        let far = ScrollPosition {
            viewport_bottom: 1000,
            container_bottom: 4000,
        };
        assert_eq!(board.on_scroll(far).await, 0);

        assert!(board.set_viewport_width(400));
        assert_eq!(board.on_scroll(ScrollPosition::at_bottom(4000)).await, 0);
        assert_eq!(store.query_calls(), 1);
    }

    #[tokio::test]
    async fn test_scroll_failure_keeps_feed() {
        let store = Arc::new(MemoryStore::with_notes(notes(25)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;
        store.fail(StoreOp::Query, || StoreError::Unavailable).await;

        assert_eq!(board.on_scroll(ScrollPosition::at_bottom(4000)).await, 0);
        assert_eq!(board.view().cards.len(), 20);
        assert!(!board.session().scroll.is_busy());
        assert!(board.session().scroll.is_armed());
    }

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let store = Arc::new(MemoryStore::with_notes(notes(3)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;

        assert!(matches!(board.like("n01").await, LikeOutcome::Liked));
        assert!(matches!(board.like("n01").await, LikeOutcome::AlreadyLiked));

        assert_eq!(store.increment_calls(), 1);
        assert_eq!(board.view().card("n01").map(|c| c.likes), Some(1));

        // A reload renders the card as already liked.
        board.load_feed().await;
        let card = board.view().card("n01").unwrap();
        assert_eq!(card.like_state, LikeState::Liked);
        assert_eq!(card.likes, 1);
    }

    #[tokio::test]
    async fn test_like_failure_reverts() {
        let store = Arc::new(MemoryStore::with_notes(notes(3)));
        let mut board = remote_board(store.clone());
        board.load_feed().await;
        store.fail(StoreOp::Increment, || StoreError::Unavailable).await;

        assert!(matches!(board.like("n00").await, LikeOutcome::Failed(_)));
        let card = board.view().card("n00").unwrap();
        assert_eq!(card.likes, 0);
        assert_eq!(card.like_state, LikeState::Available);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_scroll_retrigger_during_fetch() {
        let store = Arc::new(SlowStore {
            inner: MemoryStore::with_notes(notes(40)),
            delay: Duration::from_millis(500),
        });
        let mut board = Board::new(&Config::default(), Some(store), prefs(), StoreMode::Remote);
        board.load_feed().await;
        let board = Arc::new(Mutex::new(board));

        let more = |board: Arc<Mutex<Board>>| async move {
            board
                .lock()
                .await
                .on_scroll(ScrollPosition::at_bottom(0))
                .await;
        };

        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        debouncer.trigger(more(Arc::clone(&board)));
        // First fetch starts at 250 ms and is still waiting on the store.
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.trigger(more(Arc::clone(&board)));
        tokio::time::sleep(Duration::from_secs(3)).await;

        let board = board.lock().await;
        assert!(!board.session().scroll.is_busy());
        assert!(!board.view().loading_more);
        assert_eq!(board.view().cards.len(), 40);
    }

    #[tokio::test]
    async fn test_resubmit_after_failed_submission() {
        let store = Arc::new(MemoryStore::new());
        store.fail(StoreOp::Create, || StoreError::Unavailable).await;
        let mut board = remote_board(store.clone());

        board.open_dialog();
        board.form_mut().message = "Thanks for the help!".into();
        assert!(matches!(
            board.submit().await.unwrap(),
            SubmitOutcome::Preview { .. }
        ));

        store.recover(StoreOp::Create).await;
        board.open_dialog();
        board.form_mut().message = "Thanks again for the help!".into();
        assert!(matches!(
            board.submit().await.unwrap(),
            SubmitOutcome::Posted(_)
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_like_unknown_note() {
        let mut board = local_board();
        board.load_feed().await;
        assert!(matches!(board.like("missing").await, LikeOutcome::UnknownNote));
    }

    #[test]
    fn test_viewport_width_changes() {
        let mut board = local_board();
        assert_eq!(board.session().viewport, Viewport::Wide);
        assert!(!board.set_viewport_width(1440));
        assert!(board.set_viewport_width(768));
        assert_eq!(board.session().viewport, Viewport::Narrow);
    }

    #[test]
    fn test_notice_dismissal() {
        let mut board = local_board();
        board.notify(Notice::alert("oops"));
        board.tick(Instant::now());
        assert!(board.view().notice.is_some());
        board.dismiss_notice();
        assert!(board.view().notice.is_none());
    }
}
