#![forbid(unsafe_code)]

//! Touch sampling for a single contact.
//!
//! [`TouchSampler`] keeps three samples per gesture cycle: where the contact
//! went down, the previous sample and the current one. From those it derives the
//! per-event delta, the displacement since down, the approach angle relative to
//! the horizontal axis, and whether a finished gesture counts as a click.
//!
//! # Invariants
//!
//! 1. A `Down` event resets all three samples to the same point.
//! 2. Every other event shifts current into previous, so `delta_x` is always a
//!    one-step delta.
//! 3. A non-`Down` event seen before any `Down` is treated as the `Down` of an
//!    implicit cycle.
//!
//! # Failure Modes
//!
//! The implicit-down recovery in (3) is best effort: the first delta of such a
//! cycle is zero and the click timer starts at the first observed event, so a
//! host that drops `Down` events will see slightly late drags and slightly
//! generous clicks.

use std::time::Duration;

use crate::event::{PointerAction, PointerEvent};

/// Position and timestamp of one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchSample {
    /// X coordinate in pixels.
    pub x: f32,
    /// Y coordinate in pixels.
    pub y: f32,
    /// Sample timestamp.
    pub time: Duration,
}

impl TouchSample {
    /// Sample taken from a pointer event.
    #[inline]
    #[must_use]
    pub const fn from_event(event: &PointerEvent) -> Self {
        Self {
            x: event.x,
            y: event.y,
            time: event.time,
        }
    }
}

/// Tracks down/previous/current samples of the active contact.
#[derive(Debug, Clone, Default)]
pub struct TouchSampler {
    down: TouchSample,
    previous: TouchSample,
    current: TouchSample,
    has_down: bool,
}

impl TouchSampler {
    /// Create an empty sampler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn on_event(&mut self, event: &PointerEvent) {
        let sample = TouchSample::from_event(event);
        if event.action == PointerAction::Down || !self.has_down {
            if event.action != PointerAction::Down {
                crate::warn!(
                    action = ?event.action,
                    "pointer event without preceding down; treating it as down"
                );
            }
            self.down = sample;
            self.previous = sample;
            self.current = sample;
            self.has_down = true;
        } else {
            self.previous = self.current;
            self.current = sample;
        }

        if event.action.is_terminal() {
            // The next cycle must begin with its own down.
            self.has_down = false;
        }
    }

    /// Sample recorded at `Down`.
    #[inline]
    #[must_use]
    pub fn down(&self) -> TouchSample {
        self.down
    }

    /// Sample before the most recent one.
    #[inline]
    #[must_use]
    pub fn previous(&self) -> TouchSample {
        self.previous
    }

    /// Most recent sample.
    #[inline]
    #[must_use]
    pub fn current(&self) -> TouchSample {
        self.current
    }

    /// Horizontal movement of the most recent event.
    #[inline]
    #[must_use]
    pub fn delta_x(&self) -> f32 {
        self.current.x - self.previous.x
    }

    /// Vertical movement of the most recent event.
    #[inline]
    #[must_use]
    pub fn delta_y(&self) -> f32 {
        self.current.y - self.previous.y
    }

    /// Horizontal displacement since `Down`.
    #[inline]
    #[must_use]
    pub fn delta_x_from_down(&self) -> f32 {
        self.current.x - self.down.x
    }

    /// Vertical displacement since `Down`.
    #[inline]
    #[must_use]
    pub fn delta_y_from_down(&self) -> f32 {
        self.current.y - self.down.y
    }

    /// Angle between the displacement since `Down` and the horizontal axis, in
    /// degrees within `[0, 90]`. Zero when the contact has not moved.
    #[must_use]
    pub fn degree_x_from_down(&self) -> f32 {
        let dx = self.delta_x_from_down().abs();
        let dy = self.delta_y_from_down().abs();
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        dy.atan2(dx).to_degrees()
    }

    /// Whether a gesture released at `event` is a click.
    ///
    /// True iff the distance from `Down` to `event` is at most `tap_slop_px` and
    /// the time since `Down` is at most `tap_timeout`. Both bounds are inclusive.
    #[must_use]
    pub fn is_click(&self, event: &PointerEvent, tap_slop_px: f32, tap_timeout: Duration) -> bool {
        let dx = event.x - self.down.x;
        let dy = event.y - self.down.y;
        let within_slop = dx.hypot(dy) <= tap_slop_px;
        let within_time = event.time.saturating_sub(self.down.time) <= tap_timeout;
        within_slop && within_time
    }
}

/// Clamp `delta` so that `current + delta` stays within `[min, max]`.
///
/// A `current` already outside the range is pulled back to the nearest bound.
#[must_use]
pub fn legal_delta(current: i32, min: i32, max: i32, delta: i32) -> i32 {
    debug_assert!(min <= max, "legal_delta: min {min} > max {max}");
    let target = current.saturating_add(delta).clamp(min, max);
    target - current
}
