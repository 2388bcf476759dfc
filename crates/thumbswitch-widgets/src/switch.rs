#![forbid(unsafe_code)]

//! Headless two-position switch.
//!
//! [`Switch`] owns a [`GestureMachine`] and the policy that turns its decisions
//! into thumb movement: the thumb can be tapped to toggle, dragged between its
//! two endpoints, and flung. Rendering is left to the embedding UI, which reads
//! [`Switch::thumb_rect`] and [`Switch::scroll_percent`] and reacts to the
//! [`SwitchEvent`]s drained with [`Switch::drain_events`].
//!
//! # Driving a switch
//!
//! ```
//! use std::time::Duration;
//! use thumbswitch_core::event::PointerEvent;
//! use thumbswitch_widgets::switch::{Switch, SwitchConfig, SwitchEvent, SwitchLayout};
//!
//! let mut switch = Switch::new(SwitchConfig::default().with_margins(0));
//! switch.layout(SwitchLayout::new(100, 40, 40, 40));
//!
//! // Tap the thumb.
//! let down = PointerEvent::down(20.0, 20.0, 0);
//! let up = PointerEvent::up(20.0, 20.0, 50);
//! for event in [down, up] {
//!     switch.intercept_touch_event(&event);
//!     switch.touch_event(&event);
//! }
//! assert!(switch.is_checked());
//!
//! // Animate the settle, one frame at a time.
//! while switch.compute_scroll(Duration::from_millis(16)) {}
//! switch.run_pending();
//! assert_eq!(switch.thumb_offset(), 60);
//! assert!(switch.drain_events().contains(&SwitchEvent::CheckedChanged(true)));
//! ```
//!
//! # Invariants
//!
//! 1. The thumb offset stays within `[min_offset, max_offset]` after layout.
//! 2. Whenever the gesture machine is idle the thumb rests on the endpoint of
//!    the checked state.
//! 3. `set_checked` cancels any consumption in progress before moving the thumb.
//!
//! # Failure Modes
//!
//! - A layout whose thumb does not fit between the margins panics.

use std::time::Duration;

use thumbswitch_core::config::GestureConfig;
use thumbswitch_core::event::{PointerAction, PointerEvent};
use thumbswitch_core::gesture::{
    GestureHost, GestureMachine, GestureState, can_pull, default_on_cancel_consume_event,
    default_on_event_action_down, default_on_scroller_finish, settle_target,
};
use thumbswitch_core::tags::TagObserver;
use thumbswitch_core::touch::legal_delta;
use thumbswitch_core::velocity::VelocityTracker;

use crate::geometry::{Rect, Sides};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Switch configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwitchConfig {
    /// Initial checked state.
    /// Default: false
    pub checked: bool,

    /// Animate toggles triggered by a tap.
    /// Default: true
    pub animate_toggle: bool,

    /// Space between the track edges and the thumb's endpoints.
    /// Default: 2 on every side
    pub margins: Sides,

    /// Gesture thresholds.
    pub gesture: GestureConfig,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            checked: false,
            animate_toggle: true,
            margins: Sides::all(2),
            gesture: GestureConfig::default(),
        }
    }
}

impl SwitchConfig {
    /// Set the initial checked state (builder).
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set whether taps animate (builder).
    #[must_use]
    pub fn with_animate_toggle(mut self, animate: bool) -> Self {
        self.animate_toggle = animate;
        self
    }

    /// Set the margins (builder).
    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Set the gesture thresholds (builder).
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }
}

/// Measured sizes of the track and thumb, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchLayout {
    /// Track width.
    pub width: i32,
    /// Track height.
    pub height: i32,
    /// Thumb width.
    pub thumb_width: i32,
    /// Thumb height.
    pub thumb_height: i32,
}

impl SwitchLayout {
    /// Create a layout.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32, thumb_width: i32, thumb_height: i32) -> Self {
        Self {
            width,
            height,
            thumb_width,
            thumb_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Motion state of the thumb, mirrored from the gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollState {
    /// At rest on an endpoint.
    #[default]
    Idle,
    /// Following the pointer.
    Drag,
    /// Animating toward an endpoint.
    Fling,
}

impl From<GestureState> for ScrollState {
    fn from(state: GestureState) -> Self {
        match state {
            GestureState::Idle => Self::Idle,
            GestureState::Consuming => Self::Drag,
            GestureState::Flinging => Self::Fling,
        }
    }
}

/// Something observable that happened to the switch.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchEvent {
    /// The checked state changed.
    CheckedChanged(bool),
    /// The thumb moved.
    PositionChanged {
        /// Thumb left edge.
        offset: i32,
        /// Position between the endpoints in `[0, 1]`.
        percent: f32,
    },
    /// The thumb's motion state changed.
    ScrollStateChanged {
        old: ScrollState,
        new: ScrollState,
    },
    /// Ancestors should (`true`) or may again (`false`) intercept the gesture.
    DisallowIntercept(bool),
}

// ---------------------------------------------------------------------------
// Switch
// ---------------------------------------------------------------------------

/// A two-position switch driven by pointer events.
#[derive(Debug)]
pub struct Switch {
    machine: GestureMachine,
    host: SwitchHost,
}

impl Default for Switch {
    fn default() -> Self {
        Self::new(SwitchConfig::default())
    }
}

impl Switch {
    /// Create an unlaid-out switch.
    #[must_use]
    pub fn new(config: SwitchConfig) -> Self {
        let machine = GestureMachine::new(config.gesture.clone());
        let host = SwitchHost {
            checked: config.checked,
            thumb_left: config.margins.left,
            config,
            layout: None,
            scroll_state: ScrollState::Idle,
            drag_remainder: 0.0,
            events: Vec::new(),
        };
        Self { machine, host }
    }

    /// Apply measured sizes. Snaps the thumb to its endpoint when idle.
    ///
    /// # Panics
    ///
    /// Panics if a size is negative or the thumb does not fit between the
    /// horizontal margins.
    pub fn layout(&mut self, layout: SwitchLayout) {
        assert!(
            layout.width >= 0 && layout.height >= 0,
            "switch layout: negative track size {layout:?}"
        );
        assert!(
            layout.thumb_width >= 0 && layout.thumb_height >= 0,
            "switch layout: negative thumb size {layout:?}"
        );
        let margins = self.host.config.margins;
        assert!(
            layout.width - layout.thumb_width - margins.horizontal_sum() >= 0,
            "switch layout: thumb {} does not fit in track {} with margins {:?}",
            layout.thumb_width,
            layout.width,
            margins
        );

        self.host.layout = Some(layout);
        let (min, max) = self.host.bounds();
        self.machine.set_max_scroll_distance(max - min);
        let idle = self.machine.state() == GestureState::Idle;
        self.host.layout_thumb(idle);
        self.host.notify_position();
    }

    /// Feed the ancestor dispatch pass. Returns `true` to claim the gesture.
    pub fn intercept_touch_event(&mut self, event: &PointerEvent) -> bool {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("switch_intercept", action = ?event.action).entered();

        self.machine.intercept_phase(event, &mut self.host)
    }

    /// Feed the switch's own dispatch pass. Returns `true` while consuming.
    pub fn touch_event(&mut self, event: &PointerEvent) -> bool {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("switch_touch", action = ?event.action).entered();

        self.machine.handle_phase(event, &mut self.host)
    }

    /// Advance a running settle by `dt`. Returns `true` while more frames are needed.
    pub fn compute_scroll(&mut self, dt: Duration) -> bool {
        self.machine.compute_scroll(dt, &mut self.host)
    }

    /// Run deferred work. Call once per event-loop turn.
    pub fn run_pending(&mut self) -> bool {
        self.machine.run_pending(&mut self.host)
    }

    /// Whether the switch is checked.
    #[inline]
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.host.checked
    }

    /// Set the checked state. Returns `true` if it changed.
    ///
    /// Any drag in progress is cancelled. With `animate` the thumb settles
    /// through the scroller, otherwise it snaps once the switch is idle.
    /// `notify` controls whether a [`SwitchEvent::CheckedChanged`] is queued.
    pub fn set_checked(&mut self, checked: bool, animate: bool, notify: bool) -> bool {
        self.host.set_checked(&mut self.machine, checked, animate, notify)
    }

    /// Flip the checked state.
    pub fn toggle_checked(&mut self, animate: bool, notify: bool) {
        let checked = !self.host.checked;
        self.set_checked(checked, animate, notify);
    }

    /// Thumb left edge in pixels.
    #[inline]
    #[must_use]
    pub fn thumb_offset(&self) -> i32 {
        self.host.thumb_left
    }

    /// Thumb position between the endpoints, `0.0` unchecked to `1.0` checked.
    #[must_use]
    pub fn scroll_percent(&self) -> f32 {
        self.host.percent()
    }

    /// Motion state of the thumb.
    #[inline]
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.host.scroll_state
    }

    /// Thumb bounds within the track.
    #[must_use]
    pub fn thumb_rect(&self) -> Rect {
        self.host.thumb_rect()
    }

    /// Smallest and largest thumb offset.
    #[must_use]
    pub fn offset_range(&self) -> (i32, i32) {
        self.host.bounds()
    }

    /// The underlying gesture machine.
    #[inline]
    #[must_use]
    pub fn machine(&self) -> &GestureMachine {
        &self.machine
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<SwitchEvent> {
        std::mem::take(&mut self.host.events)
    }

    /// Number of queued events.
    #[inline]
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.host.events.len()
    }
}

// ---------------------------------------------------------------------------
// Host policy
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SwitchHost {
    config: SwitchConfig,
    checked: bool,
    layout: Option<SwitchLayout>,
    thumb_left: i32,
    scroll_state: ScrollState,
    /// Sub-pixel drag travel not yet applied to the thumb.
    drag_remainder: f32,
    events: Vec<SwitchEvent>,
}

impl SwitchHost {
    fn bounds(&self) -> (i32, i32) {
        let min = self.config.margins.left;
        let max = self.layout.map_or(min, |layout| {
            layout.width - layout.thumb_width - self.config.margins.right
        });
        (min, max)
    }

    fn endpoint(&self, checked: bool) -> i32 {
        let (min, max) = self.bounds();
        if checked { max } else { min }
    }

    fn percent(&self) -> f32 {
        let (min, max) = self.bounds();
        if max <= min {
            return if self.checked { 1.0 } else { 0.0 };
        }
        ((self.thumb_left - min) as f32 / (max - min) as f32).clamp(0.0, 1.0)
    }

    fn thumb_rect(&self) -> Rect {
        let (width, height) = self
            .layout
            .map_or((0, 0), |layout| (layout.thumb_width, layout.thumb_height));
        Rect::new(self.thumb_left, self.config.margins.top, width, height)
    }

    fn can_pull(&self, machine: &GestureMachine) -> bool {
        can_pull(machine.touch(), self.checked, machine.config().pull_angle_degrees)
    }

    fn notify_position(&mut self) {
        let percent = self.percent();
        self.events.push(SwitchEvent::PositionChanged {
            offset: self.thumb_left,
            percent,
        });
    }

    /// Move the thumb by `delta`, clamped to the endpoints.
    fn move_thumb(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let (min, max) = self.bounds();
        let delta = legal_delta(self.thumb_left, min, max, delta);
        if delta == 0 {
            return;
        }
        self.thumb_left += delta;
        self.notify_position();
    }

    /// Place the thumb: on its endpoint when idle, else clamped where it is.
    fn layout_thumb(&mut self, idle: bool) {
        let (min, max) = self.bounds();
        self.thumb_left = if idle {
            self.endpoint(self.checked)
        } else {
            self.thumb_left.clamp(min, max)
        };
    }

    fn snap_if_idle(&mut self, idle: bool) {
        let before = self.thumb_left;
        self.layout_thumb(idle);
        if self.thumb_left != before {
            thumbswitch_core::trace!(from = before, to = self.thumb_left, "thumb snapped");
            self.notify_position();
        }
    }

    fn set_scroll_state(&mut self, state: ScrollState) {
        let old = self.scroll_state;
        if old == state {
            return;
        }
        self.scroll_state = state;
        thumbswitch_core::debug!(from = ?old, to = ?state, "scroll state changed");
        if state == ScrollState::Idle {
            self.snap_if_idle(true);
        }
        self.events
            .push(SwitchEvent::ScrollStateChanged { old, new: state });
    }

    fn set_checked(
        &mut self,
        machine: &mut GestureMachine,
        checked: bool,
        animate: bool,
        notify: bool,
    ) -> bool {
        machine.cancel_consumption(self);

        let changed = self.checked != checked;
        thumbswitch_core::debug!(from = self.checked, to = checked, animate, "set checked");
        self.checked = checked;
        self.settle(machine, animate);

        if changed && notify {
            self.events.push(SwitchEvent::CheckedChanged(checked));
        }
        changed
    }

    /// Move the thumb toward the endpoint of the current checked state.
    fn settle(&mut self, machine: &mut GestureMachine, animate: bool) {
        let start = self.thumb_left;
        let end = self.endpoint(self.checked);
        machine.abort_scroll(self);
        if start == end {
            return;
        }
        if animate {
            machine.scroll_to(start, end, None, self);
        } else {
            self.snap_if_idle(machine.state() == GestureState::Idle);
        }
    }
}

impl TagObserver for SwitchHost {
    fn on_tag_intercept_changed(&mut self, tag: bool) {
        self.events.push(SwitchEvent::DisallowIntercept(tag));
    }

    fn on_tag_consume_changed(&mut self, tag: bool) {
        self.events.push(SwitchEvent::DisallowIntercept(tag));
    }
}

impl GestureHost for SwitchHost {
    fn should_intercept_event(&mut self, machine: &mut GestureMachine, event: &PointerEvent) -> bool {
        let intercept = if event.action == PointerAction::Down {
            self.thumb_rect().contains(event.x, event.y)
        } else {
            self.can_pull(machine)
        };
        thumbswitch_core::trace!(intercept, "should intercept");
        intercept
    }

    fn on_event_action_down(&mut self, _machine: &mut GestureMachine, event: &PointerEvent) -> bool {
        self.drag_remainder = 0.0;
        default_on_event_action_down(event)
    }

    fn should_consume_event(&mut self, machine: &mut GestureMachine, _event: &PointerEvent) -> bool {
        let consume = machine.tags().intercept() || self.can_pull(machine);
        thumbswitch_core::trace!(consume, "should consume");
        consume
    }

    fn on_event_consume(&mut self, machine: &mut GestureMachine, _event: &PointerEvent) {
        let travel = self.drag_remainder + machine.touch().delta_x();
        let dx = travel.trunc();
        self.drag_remainder = travel - dx;
        self.move_thumb(dx as i32);
    }

    fn on_cancel_consume_event(&mut self) {
        default_on_cancel_consume_event();
    }

    fn on_event_finish(
        &mut self,
        machine: &mut GestureMachine,
        velocity: &VelocityTracker,
        event: &PointerEvent,
    ) {
        let info = *machine.lifecycle();
        if info.is_cancelled() {
            return;
        }

        let config = machine.config();
        let (slop, timeout) = (config.tap_slop_px, config.tap_timeout);
        let (min_velocity, max_velocity) = (config.min_fling_velocity, config.max_fling_velocity);

        if machine.touch().is_click(event, slop, timeout) {
            thumbswitch_core::debug!("click");
            let animate = self.config.animate_toggle;
            self.set_checked(machine, !self.checked, animate, true);
            return;
        }

        if info.has_consumed_event() {
            let v = velocity.velocity_x_with_max(max_velocity);
            let (min, max) = self.bounds();
            let checked = settle_target(v, min_velocity, self.thumb_left, min, max);
            self.set_checked(machine, checked, true, true);
        }
    }

    fn on_state_changed(&mut self, _old: GestureState, new: GestureState) {
        self.set_scroll_state(new.into());
    }

    fn on_scroller_compute(&mut self, last_x: i32, _last_y: i32, current_x: i32, _current_y: i32) {
        self.move_thumb(current_x - last_x);
    }

    fn on_scroller_finish(&mut self, aborted: bool) {
        default_on_scroller_finish(aborted);
    }
}
