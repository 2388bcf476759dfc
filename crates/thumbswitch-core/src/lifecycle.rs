#![forbid(unsafe_code)]

//! Per-cycle bookkeeping read by hosts at release time.

/// What happened during the current gesture cycle.
///
/// Reset at the start and at the end of every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleInfo {
    has_consumed_event: bool,
    cancelled: bool,
}

impl LifecycleInfo {
    /// Whether at least one move was consumed since `Down`.
    #[inline]
    #[must_use]
    pub const fn has_consumed_event(&self) -> bool {
        self.has_consumed_event
    }

    /// Whether the host cancelled consumption during this cycle.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn mark_consumed(&mut self) {
        self.has_consumed_event = true;
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
