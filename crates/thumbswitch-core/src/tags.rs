#![forbid(unsafe_code)]

//! Intercept and consume tags.
//!
//! The two tags are the only channel through which the gesture machine tells
//! its host to keep ancestor containers from stealing the gesture:
//!
//! - **intercept**: set during the interception phase once the host decides the
//!   gesture belongs to this control.
//! - **consume**: set during the handling phase once the control starts
//!   dragging.
//!
//! # Invariants
//!
//! 1. A setter called with the current value is silent.
//! 2. A real transition notifies the observer before the setter returns.
//! 3. `reset` clears intercept first, then consume, notifying each flag that
//!    actually changed.
//!
//! Mutation is crate-private: only [`GestureMachine`](crate::gesture::GestureMachine)
//! writes tags, which keeps every transition on one call path.

/// Receives tag transitions.
pub trait TagObserver {
    /// The intercept tag changed to `tag`.
    fn on_tag_intercept_changed(&mut self, tag: bool);

    /// The consume tag changed to `tag`.
    fn on_tag_consume_changed(&mut self, tag: bool);
}

/// Holder for the intercept and consume tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagHolder {
    intercept: bool,
    consume: bool,
}

impl TagHolder {
    /// Both tags cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intercept: false,
            consume: false,
        }
    }

    /// Whether the intercept tag is set.
    #[inline]
    #[must_use]
    pub const fn intercept(&self) -> bool {
        self.intercept
    }

    /// Whether the consume tag is set.
    #[inline]
    #[must_use]
    pub const fn consume(&self) -> bool {
        self.consume
    }

    /// Set the intercept tag. Returns `true` if it changed.
    pub(crate) fn set_intercept<O: TagObserver + ?Sized>(
        &mut self,
        tag: bool,
        observer: &mut O,
    ) -> bool {
        if self.intercept == tag {
            return false;
        }
        self.intercept = tag;
        crate::trace!(tag, "intercept tag changed");
        observer.on_tag_intercept_changed(tag);
        true
    }

    /// Set the consume tag. Returns `true` if it changed.
    pub(crate) fn set_consume<O: TagObserver + ?Sized>(
        &mut self,
        tag: bool,
        observer: &mut O,
    ) -> bool {
        if self.consume == tag {
            return false;
        }
        self.consume = tag;
        crate::trace!(tag, "consume tag changed");
        observer.on_tag_consume_changed(tag);
        true
    }

    /// Clear both tags.
    pub(crate) fn reset<O: TagObserver + ?Sized>(&mut self, observer: &mut O) {
        self.set_intercept(false, observer);
        self.set_consume(false, observer);
    }
}
