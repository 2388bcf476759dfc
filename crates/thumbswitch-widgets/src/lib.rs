#![forbid(unsafe_code)]

//! Headless toggle widgets built on `thumbswitch-core`.

pub mod geometry;
pub mod switch;

pub use geometry::{Rect, Sides};
pub use switch::{ScrollState, Switch, SwitchConfig, SwitchEvent, SwitchLayout};
