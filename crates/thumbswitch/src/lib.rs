#![forbid(unsafe_code)]

//! Thumbswitch public facade crate.
//!
//! Re-exports the gesture core and the switch widget, and offers a prelude
//! for hosts that embed a switch.
//!
//! ```
//! use thumbswitch::prelude::*;
//!
//! let mut switch = Switch::new(SwitchConfig::default());
//! switch.layout(SwitchLayout::new(120, 48, 44, 44));
//! switch.set_checked(true, false, true);
//! assert_eq!(switch.scroll_state(), ScrollState::Idle);
//! assert_eq!(switch.drain_events().last(), Some(&SwitchEvent::CheckedChanged(true)));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use thumbswitch_core::config::{GestureConfig, ScrollerConfig};
pub use thumbswitch_core::easing::Easing;
pub use thumbswitch_core::event::{PointerAction, PointerEvent};
pub use thumbswitch_core::gesture::{
    GestureHost, GestureMachine, GestureState, can_pull, settle_target,
};
pub use thumbswitch_core::scroller::{ScrollBounds, ScrollStep, Scroller};
pub use thumbswitch_core::tags::{TagHolder, TagObserver};
pub use thumbswitch_core::velocity::VelocityTracker;

#[cfg(feature = "tracing-json")]
pub use thumbswitch_core::logging::install_json_subscriber;

// --- Widget re-exports -----------------------------------------------------

pub use thumbswitch_widgets::geometry::{Rect, Sides};
pub use thumbswitch_widgets::switch::{
    ScrollState, Switch, SwitchConfig, SwitchEvent, SwitchLayout,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        GestureConfig, PointerAction, PointerEvent, ScrollState, Switch, SwitchConfig,
        SwitchEvent, SwitchLayout,
    };

    pub use crate::{core, widgets};
}

pub use thumbswitch_core as core;
pub use thumbswitch_widgets as widgets;
