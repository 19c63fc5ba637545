//! Event debouncing
//!
//! Coalesces bursts of triggers (scroll, resize) into a single delayed
//! invocation. Every trigger cancels the pending one and restarts the
//! delay window, so only the last trigger of a burst runs.
//!
//! Cancellation only reaches a task still waiting out its delay. Once the
//! delay has elapsed the task runs detached and always completes, so work
//! that holds state across an await (a busy flag, a loading indicator) is
//! never cut off halfway.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Pending-timer debouncer
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the delay, replacing any pending task
    pub fn trigger<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Drop the pending task, if it has not started yet
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a task is scheduled and still waiting out its delay
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
