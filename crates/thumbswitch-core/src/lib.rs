#![forbid(unsafe_code)]

//! Core: pointer events, touch sampling, gesture state machine and inertial scrolling
//! for two-position toggle controls.

pub mod config;
pub mod deferred;
pub mod easing;
pub mod event;
pub mod gesture;
pub mod lifecycle;
pub mod logging;
pub mod scroller;
pub mod tags;
pub mod touch;
pub mod velocity;

// With tracing on, the logging macros live at the crate root like the no-op ones.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
