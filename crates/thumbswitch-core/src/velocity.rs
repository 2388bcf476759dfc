#![forbid(unsafe_code)]

//! Release velocity measurement.
//!
//! Impulse-strategy velocity estimation: each pair of consecutive samples adds
//! kinetic energy, and the final energy is converted back to a velocity. Only
//! samples inside a fixed 100 ms window before the newest one count, and a gap
//! of more than 40 ms between samples is read as the contact having stopped.
//!
//! The gesture machine feeds every observed pointer event into a
//! [`VelocityTracker`] and hands it to the host when the cycle finishes.

use crate::event::PointerEvent;

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within this window of the newest sample are used.
pub const HORIZON_MS: i64 = 100;

/// A gap longer than this between samples means the pointer stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Debug, Clone, Copy, Default)]
struct DataPoint {
    time_ms: i64,
    value: f32,
}

/// Velocity estimator along one axis.
#[derive(Debug, Clone)]
pub struct AxisVelocityTracker {
    samples: [Option<DataPoint>; HISTORY_SIZE],
    index: usize,
}

impl Default for AxisVelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisVelocityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Record an absolute position at `time_ms`.
    pub fn add_data_point(&mut self, time_ms: i64, value: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(DataPoint { time_ms, value });
    }

    /// Velocity in units per second. Zero with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        let mut values = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut cursor = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[cursor] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = (sample.time_ms - previous.time_ms).abs() as f32;
            previous = sample;

            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            values[count] = sample.value;
            times[count] = -age;
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }

            cursor = if cursor == 0 {
                HISTORY_SIZE - 1
            } else {
                cursor - 1
            };
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&values, &times, count) * 1000.0
    }

    /// Clear all samples.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Velocity per millisecond from samples ordered newest first.
fn impulse_velocity(values: &[f32; HISTORY_SIZE], times: &[f32; HISTORY_SIZE], count: usize) -> f32 {
    let mut work = 0.0f32;
    let start = count - 1;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }
        let v_curr = (values[i - 1] - values[i]) / (next_time - current_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// `E = ½ v²` with unit mass.
#[inline]
fn kinetic_energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Two-axis velocity tracker fed with pointer events.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    x: AxisVelocityTracker,
    y: AxisVelocityTracker,
}

impl VelocityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: AxisVelocityTracker::new(),
            y: AxisVelocityTracker::new(),
        }
    }

    /// Record the position of a pointer event.
    pub fn add_movement(&mut self, event: &PointerEvent) {
        let t = event.time.as_millis() as i64;
        self.x.add_data_point(t, event.x);
        self.y.add_data_point(t, event.y);
    }

    /// Horizontal velocity in px/s (positive = rightwards).
    #[must_use]
    pub fn velocity_x(&self) -> f32 {
        self.x.velocity()
    }

    /// Vertical velocity in px/s (positive = downwards).
    #[must_use]
    pub fn velocity_y(&self) -> f32 {
        self.y.velocity()
    }

    /// Horizontal velocity clamped to `[-max, max]`. Zero for a non-positive or
    /// non-finite `max`.
    #[must_use]
    pub fn velocity_x_with_max(&self, max: f32) -> f32 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let v = self.velocity_x();
        if v.is_nan() {
            return 0.0;
        }
        v.clamp(-max, max)
    }

    /// Clear all samples.
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
