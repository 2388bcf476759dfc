#![forbid(unsafe_code)]

//! Easing curves for animated settles.
//!
//! Each curve maps `t` in [0, 1] to an output in [0, 1], is monotonic, and
//! clamps out-of-range input.

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

const VISCOUS_FLUID_SCALE: f32 = 8.0;

fn viscous_fluid_raw(x: f32) -> f32 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        let start = 0.367_879_44; // 1/e == viscous_fluid_raw(1)
        let x = 1.0 - (1.0 - x).exp();
        start + x * (1.0 - start)
    }
}

/// Viscous-fluid curve: a quick start that settles like a thumb dragged
/// through fluid. Normalized so that `viscous_fluid(1) == 1`.
#[inline]
pub fn viscous_fluid(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let normalize = 1.0 / viscous_fluid_raw(1.0);
    let offset = 1.0 - normalize * viscous_fluid_raw(1.0);
    let v = normalize * viscous_fluid_raw(t);
    if v > 0.0 { (v + offset).min(1.0) } else { v.max(0.0) }
}

/// Named easing curve, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in-out.
    EaseInOut,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Viscous-fluid settle.
    #[default]
    ViscousFluid,
}

impl Easing {
    /// The curve as a function pointer.
    #[must_use]
    pub const fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseOutCubic => ease_out_cubic,
            Self::ViscousFluid => viscous_fluid,
        }
    }

    /// Evaluate the curve at `t`.
    #[inline]
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        (self.function())(t)
    }
}
