#![forbid(unsafe_code)]

//! Cancellable deferred task handle.
//!
//! Models a task posted to the host's event queue: scheduling does not run
//! anything, the host drains pending work on its next event-loop turn (see
//! [`GestureMachine::run_pending`](crate::gesture::GestureMachine::run_pending)).
//! Posting, cancelling and firing happen on the same thread, so a plain flag is
//! enough.
//!
//! # Invariants
//!
//! 1. `cancel` is idempotent.
//! 2. `take` fires at most once per `schedule`.
//! 3. Scheduling an already scheduled task keeps a single pending run.

/// A one-shot task that can be posted and withdrawn.
#[derive(Debug, Clone, Default)]
pub struct DeferredTask {
    scheduled: bool,
    /// Number of schedules, including ones later cancelled (diagnostic).
    posts: u64,
}

impl DeferredTask {
    /// Create an idle handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scheduled: false,
            posts: 0,
        }
    }

    /// Post the task. Cancels any pending run first.
    pub fn schedule(&mut self) {
        self.cancel();
        self.scheduled = true;
        self.posts += 1;
    }

    /// Withdraw the task. Returns `true` if a run was pending.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.scheduled, false)
    }

    /// Whether a run is pending.
    #[inline]
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Consume the pending run. Returns `true` if the caller should run the task.
    pub fn take(&mut self) -> bool {
        self.cancel()
    }

    /// How many times the task has been posted (diagnostic).
    #[inline]
    #[must_use]
    pub const fn post_count(&self) -> u64 {
        self.posts
    }
}
