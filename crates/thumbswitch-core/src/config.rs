#![forbid(unsafe_code)]

//! Gesture and scroller configuration.
//!
//! All thresholds are in logical pixels and seconds. Hosts on high-density
//! screens should scale the pixel values by their density factor.

use std::time::Duration;

use crate::easing::Easing;

// ---------------------------------------------------------------------------
// ScrollerConfig
// ---------------------------------------------------------------------------

/// Configuration for [`Scroller`](crate::scroller::Scroller).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollerConfig {
    /// Shortest computed settle duration.
    /// Default: 100ms
    pub min_duration: Duration,

    /// Settle duration for a full-width travel, and the longest computed one.
    /// Default: 400ms
    pub max_duration: Duration,

    /// Full travel distance used to scale computed durations. The host updates
    /// it on every layout pass; zero means "unknown" and yields `max_duration`.
    /// Default: 0
    pub max_scroll_distance: i32,

    /// Constant deceleration applied to flings, in px/s².
    /// Default: 2000.0
    pub fling_deceleration: f32,

    /// Curve used by `scroll_to` sessions.
    /// Default: viscous fluid
    pub easing: Easing,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            min_duration: Duration::from_millis(100),
            max_duration: Duration::from_millis(400),
            max_scroll_distance: 0,
            fling_deceleration: 2000.0,
            easing: Easing::default(),
        }
    }
}

impl ScrollerConfig {
    /// Set the duration range (builder).
    #[must_use]
    pub fn with_duration_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_duration = min.min(max);
        self.max_duration = max.max(min);
        self
    }

    /// Set the fling deceleration in px/s² (builder).
    #[must_use]
    pub fn with_fling_deceleration(mut self, deceleration: f32) -> Self {
        self.fling_deceleration = deceleration;
        self
    }

    /// Set the easing curve (builder).
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

// ---------------------------------------------------------------------------
// GestureConfig
// ---------------------------------------------------------------------------

/// Thresholds used to classify gestures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Maximum distance between down and release for a click.
    /// Default: 8.0
    pub tap_slop_px: f32,

    /// Maximum time between down and release for a click.
    /// Default: 200ms
    pub tap_timeout: Duration,

    /// Release speed above which the settle follows velocity direction
    /// instead of thumb position, in px/s.
    /// Default: 200.0
    pub min_fling_velocity: f32,

    /// Cap applied to measured release velocity, in px/s.
    /// Default: 8000.0
    pub max_fling_velocity: f32,

    /// A drag must stay below this angle from the horizontal axis to pull the
    /// thumb, in degrees.
    /// Default: 30.0
    pub pull_angle_degrees: f32,

    /// Scroller settings.
    pub scroller: ScrollerConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop_px: 8.0,
            tap_timeout: Duration::from_millis(200),
            min_fling_velocity: 200.0,
            max_fling_velocity: 8000.0,
            pull_angle_degrees: 30.0,
            scroller: ScrollerConfig::default(),
        }
    }
}

impl GestureConfig {
    /// Set click thresholds (builder).
    #[must_use]
    pub fn with_tap(mut self, slop_px: f32, timeout: Duration) -> Self {
        self.tap_slop_px = slop_px;
        self.tap_timeout = timeout;
        self
    }

    /// Set the minimum fling velocity (builder).
    #[must_use]
    pub fn with_min_fling_velocity(mut self, velocity: f32) -> Self {
        self.min_fling_velocity = velocity;
        self
    }

    /// Set the maximum pull angle (builder).
    #[must_use]
    pub fn with_pull_angle(mut self, degrees: f32) -> Self {
        self.pull_angle_degrees = degrees;
        self
    }

    /// Set scroller settings (builder).
    #[must_use]
    pub fn with_scroller(mut self, scroller: ScrollerConfig) -> Self {
        self.scroller = scroller;
        self
    }
}
