//! Debounce timer for one input field
//!
//! Holds at most one scheduled lookup. Scheduling again aborts the pending
//! timer first, so only the latest request in a quiet window ever fires.
//! Once the quiet interval elapses the work is detached onto its own task:
//! a later keystroke cancels the timer, never an in-flight request.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Run `work` after the quiet interval, replacing any pending timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            tokio::spawn(work);
        }));
    }

    /// Abort the pending timer; returns whether one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
