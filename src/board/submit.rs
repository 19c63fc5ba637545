//! Submission handler
//!
//! Validates the creation form and sends the note to the store. In local
//! mode the submission is simulated; when the store rejects the write the
//! caller gets a preview note to show instead.

use crate::feed::StoreMode;
use crate::note::{categorize, NewNote, Note, ANONYMOUS};
use crate::store::{DocumentStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Location field: a preset choice, or free text when "Other" is selected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationChoice {
    #[default]
    Unset,
    Preset(String),
    Other(String),
}

/// Creation form fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionForm {
    pub message: String,
    pub name: String,
    pub location: LocationChoice,
}

impl SubmissionForm {
    /// Validate the form and build the note payload.
    ///
    /// Blank names become "Anonymous"; the category comes from the message.
    pub fn to_new_note(&self) -> Result<NewNote, SubmitError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(SubmitError::EmptyMessage);
        }

        let location = match &self.location {
            LocationChoice::Unset => None,
            LocationChoice::Preset(value) => Some(value.trim()).filter(|v| !v.is_empty()),
            LocationChoice::Other(custom) => {
                let custom = custom.trim();
                if custom.is_empty() {
                    return Err(SubmitError::EmptyCustomLocation);
                }
                Some(custom)
            }
        };

        let name = self.name.trim();

        Ok(NewNote {
            message: message.to_string(),
            name: if name.is_empty() { ANONYMOUS } else { name }.to_string(),
            location: location.map(str::to_string),
            category: categorize(message),
        })
    }
}

/// Reasons a submission is refused before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please write a message before sending")]
    EmptyMessage,

    #[error("Please enter a location or pick one from the list")]
    EmptyCustomLocation,
}

/// How a submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Local mode: nothing was sent
    Simulated,
    /// Stored; the note as the store recorded it
    Posted(Note),
    /// Store write failed; `note` is a local stand-in, never persisted
    Preview { note: Note, alert: String },
}

/// User-facing copy for a failed submission
pub fn failure_message(error: &StoreError) -> &'static str {
    match error {
        StoreError::PermissionDenied(_) => {
            "You don't have permission to add entries. The board's access rules may need to be updated."
        }
        StoreError::Unavailable | StoreError::Timeout => {
            "The service is currently unavailable. Please check your internet connection."
        }
        StoreError::NotFound(_) => "The database collection could not be found.",
        _ => "There was an error submitting your thank you. Please try again.",
    }
}

/// Sends validated notes to the store
pub struct SubmissionHandler {
    store: Option<Arc<dyn DocumentStore>>,
    mode: StoreMode,
    simulated_delay: Duration,
}

impl SubmissionHandler {
    pub fn new(
        store: Option<Arc<dyn DocumentStore>>,
        mode: StoreMode,
        simulated_delay: Duration,
    ) -> Self {
        Self {
            store,
            mode,
            simulated_delay,
        }
    }

    /// Submit a validated note
    pub async fn submit(&self, note: NewNote) -> SubmitOutcome {
        if self.mode == StoreMode::Local {
            tracing::info!(category = %note.category, "Local mode: simulating submission");
            tokio::time::sleep(self.simulated_delay).await;
            return SubmitOutcome::Simulated;
        }

        let result = match &self.store {
            Some(store) => store.create_note(note.clone()).await,
            None => Err(StoreError::Unconfigured),
        };

        match result {
            Ok(stored) => {
                tracing::info!(id = %stored.id, category = %stored.category, "Thank you note added");
                SubmitOutcome::Posted(stored)
            }
            Err(e) => {
                tracing::error!(error = %e, code = e.code(), "Error adding thank you note");
                let id = format!("local-{}", uuid::Uuid::new_v4().simple());
                SubmitOutcome::Preview {
                    note: note.into_note(id, Utc::now()),
                    alert: failure_message(&e).to_string(),
                }
            }
        }
    }
}
