#![forbid(unsafe_code)]

//! Pointer event types.
//!
//! The host translates its platform's touch or mouse delivery into
//! [`PointerEvent`]s for a single active contact. Coordinates are in the
//! control's local pixel space; timestamps are offsets from any epoch the host
//! picks, as long as they are monotonic within a gesture cycle.

use std::time::Duration;

/// Phase of a pointer event within a gesture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerAction {
    /// Contact started. Begins a gesture cycle.
    Down,
    /// Contact moved while held.
    Move,
    /// Contact lifted. Ends the gesture cycle.
    Up,
    /// The platform took the gesture away. Ends the gesture cycle.
    Cancel,
}

impl PointerAction {
    /// Whether this action ends a gesture cycle.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A single-contact pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    /// Phase of the event.
    pub action: PointerAction,
    /// X coordinate in pixels.
    pub x: f32,
    /// Y coordinate in pixels.
    pub y: f32,
    /// Event timestamp.
    pub time: Duration,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(action: PointerAction, x: f32, y: f32, time: Duration) -> Self {
        Self { action, x, y, time }
    }

    /// Shorthand for a `Down` event at `time_ms` milliseconds.
    #[must_use]
    pub const fn down(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Down, x, y, Duration::from_millis(time_ms))
    }

    /// Shorthand for a `Move` event at `time_ms` milliseconds.
    #[must_use]
    pub const fn moved(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Move, x, y, Duration::from_millis(time_ms))
    }

    /// Shorthand for an `Up` event at `time_ms` milliseconds.
    #[must_use]
    pub const fn up(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Up, x, y, Duration::from_millis(time_ms))
    }

    /// Shorthand for a `Cancel` event at `time_ms` milliseconds.
    #[must_use]
    pub const fn cancel(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Cancel, x, y, Duration::from_millis(time_ms))
    }

    /// Timestamp in whole milliseconds.
    #[inline]
    #[must_use]
    pub fn time_ms(&self) -> u64 {
        self.time.as_millis() as u64
    }
}
