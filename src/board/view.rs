//! Board view model
//!
//! Plain state a front-end renders: the card list, feed banners, the
//! creation dialog with its form, and the transient notification.

use super::submit::SubmissionForm;
use crate::feed::CardView;
use std::time::{Duration, Instant};

/// Message shown in the notification banner after a successful submission
pub const CONFIRMATION_TEXT: &str = "Thank you for sharing your gratitude!";

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Transient success banner
    Confirmation,
    /// Error alert; stays until dismissed
    Alert,
}

/// A notification shown to the visitor
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub expires_at: Option<Instant>,
}

impl Notice {
    /// Confirmation that disappears after `ttl`
    pub fn confirmation(ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Confirmation,
            text: CONFIRMATION_TEXT.to_string(),
            expires_at: Some(Instant::now() + ttl),
        }
    }

    /// Alert carrying an error message
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Everything the board shows
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    /// Cards in display order
    pub cards: Vec<CardView>,
    /// Explanatory banner above the cards (sample mode)
    pub banner: Option<String>,
    /// Inline message shown instead of cards (empty feed, load error)
    pub feed_message: Option<String>,
    /// Full-feed loader
    pub loading: bool,
    /// Inline loader below the cards during a continuation fetch
    pub loading_more: bool,
    /// Creation dialog visibility
    pub dialog_open: bool,
    /// Creation form fields
    pub form: SubmissionForm,
    pub notice: Option<Notice>,
}

impl BoardView {
    /// Look up a card by note id
    pub fn card(&self, id: &str) -> Option<&CardView> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Mutable lookup of a card by note id
    pub fn card_mut(&mut self, id: &str) -> Option<&mut CardView> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// The notification, if one is showing at `now`
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    /// Drop an expired notification
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }
}
