#![forbid(unsafe_code)]

//! Inertial scroller.
//!
//! Produces a time-driven sequence of integer offsets, either eased between two
//! offsets ([`Scroller::scroll_to`]) or decelerating from a release velocity
//! ([`Scroller::fling`]). The scroller never touches geometry: each
//! [`Scroller::tick`] reports the previous and current offset and the caller
//! applies the difference.
//!
//! # Invariants
//!
//! 1. At most one session is active; starting a session replaces the old one.
//! 2. Offsets reported within a session are monotonic along each axis.
//! 3. The final tick of a session reports the exact end offset and `at_end`.
//! 4. A fling never leaves the bounds it was started with.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use thumbswitch_core::config::ScrollerConfig;
//! use thumbswitch_core::scroller::Scroller;
//!
//! let mut scroller = Scroller::new(ScrollerConfig::default());
//! assert!(scroller.scroll_to(0, 100, Some(Duration::from_millis(100))));
//!
//! let mut offset = 0;
//! while let Some(step) = scroller.tick(Duration::from_millis(16)) {
//!     offset += step.delta_x();
//!     if step.at_end {
//!         break;
//!     }
//! }
//! assert_eq!(offset, 100);
//! ```

use std::time::Duration;

use crate::config::ScrollerConfig;
use crate::easing::Easing;

/// Inclusive offset range a fling must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBounds {
    /// Smallest allowed offset.
    pub min: i32,
    /// Largest allowed offset.
    pub max: i32,
}

impl ScrollBounds {
    /// Create bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub fn new(min: i32, max: i32) -> Self {
        assert!(min <= max, "ScrollBounds: min {min} > max {max}");
        Self { min, max }
    }

    /// Clamp `value` into the bounds.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Offsets reported by one [`Scroller::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollStep {
    /// X offset reported by the previous tick (or the session start).
    pub last_x: i32,
    /// Y offset reported by the previous tick (or the session start).
    pub last_y: i32,
    /// X offset after this tick.
    pub current_x: i32,
    /// Y offset after this tick.
    pub current_y: i32,
    /// Whether this tick finished the session.
    pub at_end: bool,
}

impl ScrollStep {
    /// Horizontal change since the previous tick.
    #[inline]
    #[must_use]
    pub const fn delta_x(&self) -> i32 {
        self.current_x - self.last_x
    }

    /// Vertical change since the previous tick.
    #[inline]
    #[must_use]
    pub const fn delta_y(&self) -> i32 {
        self.current_y - self.last_y
    }
}

#[derive(Debug, Clone, Copy)]
enum Curve {
    Eased(Easing),
    /// Constant deceleration along x; `speed` and `deceleration` are magnitudes.
    Decelerate { speed: f32, deceleration: f32 },
}

#[derive(Debug, Clone, Copy)]
struct ScrollSession {
    start: (i32, i32),
    end: (i32, i32),
    current: (i32, i32),
    elapsed: Duration,
    duration: Duration,
    curve: Curve,
}

impl ScrollSession {
    fn position(&self) -> (i32, i32) {
        if self.elapsed >= self.duration {
            return self.end;
        }
        match self.curve {
            Curve::Eased(easing) => {
                let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32;
                let f = easing.apply(t);
                (
                    lerp(self.start.0, self.end.0, f),
                    lerp(self.start.1, self.end.1, f),
                )
            }
            Curve::Decelerate {
                speed,
                deceleration,
            } => {
                let t = self.elapsed.as_secs_f32();
                let travelled = speed * t - 0.5 * deceleration * t * t;
                let direction = (self.end.0 - self.start.0).signum() as f32;
                let x = self.start.0 as f32 + direction * travelled;
                let (lo, hi) = ordered(self.start.0, self.end.0);
                ((x.round() as i32).clamp(lo, hi), self.start.1)
            }
        }
    }
}

fn lerp(from: i32, to: i32, f: f32) -> i32 {
    let v = from as f32 + (to - from) as f32 * f;
    let (lo, hi) = ordered(from, to);
    (v.round() as i32).clamp(lo, hi)
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Time-driven offset animator.
#[derive(Debug, Clone)]
pub struct Scroller {
    config: ScrollerConfig,
    session: Option<ScrollSession>,
    /// Resting offset once no session is active.
    resting: (i32, i32),
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(ScrollerConfig::default())
    }
}

impl Scroller {
    /// Create an idle scroller.
    #[must_use]
    pub fn new(config: ScrollerConfig) -> Self {
        Self {
            config,
            session: None,
            resting: (0, 0),
        }
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    /// Set the full travel distance used to scale computed durations.
    pub fn set_max_scroll_distance(&mut self, distance: i32) {
        self.config.max_scroll_distance = distance.max(0);
    }

    /// Whether a session is running.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Most recently reported x offset.
    #[must_use]
    pub fn current_x(&self) -> i32 {
        self.session.map_or(self.resting.0, |s| s.current.0)
    }

    /// X offset the running session will end at, or the resting offset.
    #[must_use]
    pub fn final_x(&self) -> i32 {
        self.session.map_or(self.resting.0, |s| s.end.0)
    }

    /// Duration for an eased travel of `distance` pixels.
    ///
    /// Scales `max_duration` by the fraction of `max_scroll_distance` covered,
    /// clamped to `[min_duration, max_duration]`.
    #[must_use]
    pub fn compute_duration(&self, distance: i32) -> Duration {
        let min = self.config.min_duration;
        let max = self.config.max_duration.max(min);
        if self.config.max_scroll_distance <= 0 {
            return max;
        }
        let fraction =
            (f64::from(distance.unsigned_abs()) / f64::from(self.config.max_scroll_distance)).min(1.0);
        max.mul_f64(fraction).clamp(min, max)
    }

    /// Start an eased scroll along x from `from` to `to`.
    ///
    /// `duration` of `None` is computed from the distance. Returns `false` and
    /// leaves any running session alone when `from == to`.
    pub fn scroll_to(&mut self, from: i32, to: i32, duration: Option<Duration>) -> bool {
        if from == to {
            return false;
        }
        let duration = duration
            .unwrap_or_else(|| self.compute_duration(to - from))
            .max(Duration::from_nanos(1));
        crate::debug!(from, to, duration_ms = duration.as_millis() as u64, "scroll started");
        self.session = Some(ScrollSession {
            start: (from, 0),
            end: (to, 0),
            current: (from, 0),
            elapsed: Duration::ZERO,
            duration,
            curve: Curve::Eased(self.config.easing),
        });
        true
    }

    /// Start a decelerating scroll along x from `start` at `velocity` px/s.
    ///
    /// The travel is `v² / 2a` for the configured deceleration `a`, cut short at
    /// `bounds`. Returns `false` when the velocity is zero or not finite, or the
    /// fling cannot move within the bounds.
    pub fn fling(&mut self, start: i32, velocity: f32, bounds: ScrollBounds) -> bool {
        if velocity == 0.0 || !velocity.is_finite() {
            return false;
        }
        let deceleration = self.config.fling_deceleration.max(1.0);
        let speed = velocity.abs();
        let full_travel = speed * speed / (2.0 * deceleration);
        let target = start as f32 + velocity.signum() * full_travel;
        let end = bounds.clamp(target.round() as i32);
        if end == start {
            return false;
        }

        // Time at which the decelerating contact covers |end - start|.
        let travel = (end - start).unsigned_abs() as f32;
        let discriminant = (speed * speed - 2.0 * deceleration * travel).max(0.0);
        let seconds = (speed - discriminant.sqrt()) / deceleration;
        let duration = Duration::from_secs_f32(seconds.max(0.0)).max(Duration::from_nanos(1));

        crate::debug!(start, end, velocity, duration_ms = duration.as_millis() as u64, "fling started");
        self.session = Some(ScrollSession {
            start: (start, 0),
            end: (end, 0),
            current: (start, 0),
            elapsed: Duration::ZERO,
            duration,
            curve: Curve::Decelerate {
                speed,
                deceleration,
            },
        });
        true
    }

    /// Advance the session clock by `dt`.
    ///
    /// Returns `None` when no session is active. A step with `at_end` set ends
    /// the session; otherwise the caller should tick again on the next frame.
    pub fn tick(&mut self, dt: Duration) -> Option<ScrollStep> {
        let session = self.session.as_mut()?;
        session.elapsed = session.elapsed.saturating_add(dt);
        let at_end = session.elapsed >= session.duration;
        let next = session.position();
        let step = ScrollStep {
            last_x: session.current.0,
            last_y: session.current.1,
            current_x: next.0,
            current_y: next.1,
            at_end,
        };
        session.current = next;

        if at_end {
            self.resting = next;
            self.session = None;
            crate::trace!(x = next.0, "scroll reached end");
        }
        Some(step)
    }

    /// End the running session where it is. Returns `true` if one was running.
    pub fn abort(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                self.resting = session.current;
                crate::debug!(x = session.current.0, "scroll aborted");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn linear_scroller() -> Scroller {
        Scroller::new(ScrollerConfig::default().with_easing(Easing::Linear))
    }

    fn run_to_end(scroller: &mut Scroller) -> Vec<ScrollStep> {
        let mut steps = Vec::new();
        while let Some(step) = scroller.tick(MS_16) {
            steps.push(step);
            if step.at_end {
                break;
            }
            assert!(steps.len() < 10_000, "scroll never finished");
        }
        steps
    }

    #[test]
    fn scroll_to_same_offset_is_noop() {
        let mut s = Scroller::default();
        assert!(!s.scroll_to(40, 40, None));
        assert!(!s.is_active());
        assert!(s.tick(MS_16).is_none());
    }

    #[test]
    fn scroll_to_reaches_target() {
        let mut s = linear_scroller();
        assert!(s.scroll_to(0, 100, Some(Duration::from_millis(160))));
        assert!(s.is_active());
        assert_eq!(s.final_x(), 100);

        let steps = run_to_end(&mut s);
        assert_eq!(steps.len(), 10);
        let total: i32 = steps.iter().map(ScrollStep::delta_x).sum();
        assert_eq!(total, 100);
        assert!(steps.last().is_some_and(|step| step.at_end && step.current_x == 100));
        assert!(!s.is_active());
        assert_eq!(s.current_x(), 100);
    }

    #[test]
    fn linear_midpoint() {
        let mut s = linear_scroller();
        s.scroll_to(0, 100, Some(Duration::from_millis(100)));
        let step = s.tick(Duration::from_millis(50)).expect("active");
        assert_eq!(step.current_x, 50);
        assert!(!step.at_end);
        assert_eq!(s.current_x(), 50);
    }

    #[test]
    fn scroll_backwards_is_monotonic() {
        let mut s = Scroller::default();
        s.scroll_to(80, 0, None);
        let steps = run_to_end(&mut s);
        assert!(steps.iter().all(|step| step.delta_x() <= 0));
        assert_eq!(steps.last().map(|step| step.current_x), Some(0));
    }

    #[test]
    fn computed_duration_scales_with_distance() {
        let mut s = Scroller::default();
        assert_eq!(s.compute_duration(50), Duration::from_millis(400));

        s.set_max_scroll_distance(100);
        assert_eq!(s.compute_duration(100), Duration::from_millis(400));
        assert_eq!(s.compute_duration(-50), Duration::from_millis(200));
        assert_eq!(s.compute_duration(10), Duration::from_millis(100));
        assert_eq!(s.compute_duration(1_000), Duration::from_millis(400));
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut s = Scroller::default();
        s.scroll_to(0, 10, Some(Duration::ZERO));
        let step = s.tick(Duration::from_millis(1)).expect("active");
        assert!(step.at_end);
        assert_eq!(step.current_x, 10);
    }

    #[test]
    fn abort_keeps_current_offset() {
        let mut s = linear_scroller();
        s.scroll_to(0, 100, Some(Duration::from_millis(100)));
        s.tick(Duration::from_millis(30));
        assert!(s.abort());
        assert!(!s.is_active());
        assert_eq!(s.current_x(), 30);
        assert!(!s.abort());
    }

    #[test]
    fn new_session_replaces_old() {
        let mut s = linear_scroller();
        s.scroll_to(0, 100, Some(Duration::from_millis(100)));
        s.tick(Duration::from_millis(50));
        s.scroll_to(50, 0, Some(Duration::from_millis(100)));
        assert_eq!(s.final_x(), 0);
        let steps = run_to_end(&mut s);
        assert_eq!(steps.first().map(|step| step.last_x), Some(50));
    }

    #[test]
    fn fling_decelerates_to_natural_stop() {
        let mut s = Scroller::default();
        // 400 px/s at 2000 px/s² travels 40 px in 200 ms.
        assert!(s.fling(0, 400.0, ScrollBounds::new(0, 1_000)));
        assert_eq!(s.final_x(), 40);
        let steps = run_to_end(&mut s);
        assert!(steps.iter().all(|step| step.delta_x() >= 0));
        // Decelerating: early steps move at least as far as late ones.
        let first = steps.first().map_or(0, ScrollStep::delta_x);
        let last = steps.iter().rev().nth(1).map_or(0, ScrollStep::delta_x);
        assert!(first >= last, "first {first} < last {last}");
        assert_eq!(s.current_x(), 40);
    }

    #[test]
    fn fling_is_cut_at_bounds() {
        let mut s = Scroller::default();
        assert!(s.fling(60, 2_000.0, ScrollBounds::new(0, 100)));
        assert_eq!(s.final_x(), 100);
        let steps = run_to_end(&mut s);
        assert!(steps.iter().all(|step| (60..=100).contains(&step.current_x)));

        assert!(s.fling(30, -2_000.0, ScrollBounds::new(0, 100)));
        assert_eq!(s.final_x(), 0);
    }

    #[test]
    fn fling_without_room_is_rejected() {
        let mut s = Scroller::default();
        assert!(!s.fling(100, 500.0, ScrollBounds::new(0, 100)));
        assert!(!s.fling(50, 0.0, ScrollBounds::new(0, 100)));
        assert!(!s.fling(50, f32::NAN, ScrollBounds::new(0, 100)));
        assert!(!s.is_active());
    }

    #[test]
    #[should_panic(expected = "min 5 > max 1")]
    fn inverted_bounds_panic() {
        let _ = ScrollBounds::new(5, 1);
    }
}
