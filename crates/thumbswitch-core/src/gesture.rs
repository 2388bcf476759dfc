#![forbid(unsafe_code)]

//! Gesture state machine.
//!
//! [`GestureMachine`] turns a stream of [`PointerEvent`]s, delivered through
//! the two dispatch phases of a hosting UI, into decisions about whether this
//! control owns the gesture, plus an inertial settle once it is released.
//! Policy lives in the host ([`GestureHost`]); the machine owns the mechanics.
//!
//! # Dispatch phases
//!
//! - [`intercept_phase`](GestureMachine::intercept_phase): the ancestor pass.
//!   Returns the intercept tag.
//! - [`handle_phase`](GestureMachine::handle_phase): the control's own pass.
//!   Returns the consume tag.
//!
//! A host may deliver the same event to both phases. Sampling and cycle
//! finish happen once per event.
//!
//! # State machine
//!
//! ```text
//!        consume tag → true           scroll started
//! Idle ───────────────────▶ Consuming ───────────────▶ Flinging
//!  ▲                           │ release                 │ finish/abort
//!  │                           ▼                         ▼
//!  └──────────────────────── Idle ◀── deferred ── (consume tag unset)
//! ```
//!
//! A scroll completion while the consume tag is still set returns to
//! `Consuming` instead.
//!
//! # Invariants
//!
//! 1. `Flinging` iff a scroller session is active, except for the single
//!    event-loop turn between a completion and the deferred `Idle` running.
//! 2. Every state change cancels a pending deferred `Idle` first.
//! 3. `on_state_changed` fires only on real changes.
//! 4. Tags and lifecycle flags are reset at the start and end of each cycle.
//!
//! # Failure Modes
//!
//! - A `Move` without a preceding `Down` starts an implicit cycle and logs a
//!   warning.
//! - A release outside any cycle is ignored.

use std::time::Duration;

use crate::config::GestureConfig;
use crate::deferred::DeferredTask;
use crate::event::{PointerAction, PointerEvent};
use crate::lifecycle::LifecycleInfo;
use crate::scroller::{ScrollBounds, Scroller};
use crate::tags::{TagHolder, TagObserver};
use crate::touch::TouchSampler;
use crate::velocity::VelocityTracker;

/// Ownership state of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureState {
    /// No gesture owned and nothing animating.
    #[default]
    Idle,
    /// The control is following the pointer.
    Consuming,
    /// The scroller is settling the control.
    Flinging,
}

// ---------------------------------------------------------------------------
// Host contract
// ---------------------------------------------------------------------------

/// Policy callbacks supplied by the control that embeds a [`GestureMachine`].
///
/// Decision callbacks receive the machine and may re-enter it, for example to
/// call [`GestureMachine::cancel_consumption`] or start a scroll.
/// Notifications receive plain values only.
///
/// Hosts that want the usual behavior for a callback can delegate to the
/// `default_*` free functions in this module.
pub trait GestureHost: TagObserver {
    /// Whether the ancestor pass should claim the gesture at `event`.
    fn should_intercept_event(&mut self, machine: &mut GestureMachine, event: &PointerEvent)
    -> bool;

    /// Whether to track the cycle that starts at `event`. Declining ignores
    /// the rest of the cycle, including its finish.
    fn on_event_action_down(&mut self, machine: &mut GestureMachine, event: &PointerEvent) -> bool;

    /// Whether the control should start following the pointer at `event`.
    fn should_consume_event(&mut self, machine: &mut GestureMachine, event: &PointerEvent) -> bool;

    /// A move arrived while the control is consuming.
    fn on_event_consume(&mut self, machine: &mut GestureMachine, event: &PointerEvent);

    /// Consumption was cancelled by [`GestureMachine::cancel_consumption`].
    fn on_cancel_consume_event(&mut self);

    /// The cycle finished with `event` (`Up` or `Cancel`).
    ///
    /// Called after the tags are reset but before the lifecycle is, so
    /// [`GestureMachine::lifecycle`] still describes the finished cycle.
    fn on_event_finish(
        &mut self,
        machine: &mut GestureMachine,
        velocity: &VelocityTracker,
        event: &PointerEvent,
    );

    /// The gesture state changed from `old` to `new`.
    fn on_state_changed(&mut self, old: GestureState, new: GestureState);

    /// A scroller tick moved from `(last_x, last_y)` to `(current_x, current_y)`.
    fn on_scroller_compute(&mut self, last_x: i32, last_y: i32, current_x: i32, current_y: i32);

    /// A scroller session ended, naturally or by abort.
    fn on_scroller_finish(&mut self, aborted: bool);
}

/// Default intercept decision: never intercept.
#[inline]
#[must_use]
pub fn default_should_intercept_event(_event: &PointerEvent) -> bool {
    false
}

/// Default down decision: track every cycle.
#[inline]
#[must_use]
pub fn default_on_event_action_down(_event: &PointerEvent) -> bool {
    true
}

/// Default cancel notification: nothing.
#[inline]
pub fn default_on_cancel_consume_event() {}

/// Default scroll completion notification: nothing.
#[inline]
pub fn default_on_scroller_finish(_aborted: bool) {}

// ---------------------------------------------------------------------------
// Host helpers
// ---------------------------------------------------------------------------

/// Whether the drag seen by `touch` may pull a two-position control.
///
/// The drag must have moved horizontally, stay below `max_angle_degrees` from
/// the horizontal axis, and point away from the active endpoint: leftwards
/// when `checked`, rightwards otherwise.
#[must_use]
pub fn can_pull(touch: &TouchSampler, checked: bool, max_angle_degrees: f32) -> bool {
    let dx = touch.delta_x_from_down();
    if dx == 0.0 || touch.degree_x_from_down() >= max_angle_degrees {
        return false;
    }
    if checked { dx < 0.0 } else { dx > 0.0 }
}

/// Which endpoint a released control settles to; `true` means the checked end.
///
/// A release faster than `min_fling_velocity` follows the velocity direction.
/// Otherwise the control settles to whichever half `offset` is in, with the
/// midpoint going to the checked end.
#[must_use]
pub fn settle_target(velocity: f32, min_fling_velocity: f32, offset: i32, min: i32, max: i32) -> bool {
    let checked = if velocity.abs() > min_fling_velocity {
        velocity > 0.0
    } else {
        let middle = (i64::from(min) + i64::from(max)) / 2;
        i64::from(offset) >= middle
    };
    crate::debug!(velocity, offset, checked, "settle target chosen");
    checked
}

// ---------------------------------------------------------------------------
// GestureMachine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Cycle {
    #[default]
    Inactive,
    Tracking,
    Ignored,
}

/// Per-control gesture state machine.
#[derive(Debug)]
pub struct GestureMachine {
    config: GestureConfig,
    state: GestureState,
    touch: TouchSampler,
    tags: TagHolder,
    lifecycle: LifecycleInfo,
    scroller: Scroller,
    velocity: VelocityTracker,
    idle_task: DeferredTask,
    cycle: Cycle,
    /// Last event fed to the sampler, so both phases sample it once.
    last_observed: Option<PointerEvent>,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureMachine {
    /// Create an idle machine.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let scroller = Scroller::new(config.scroller.clone());
        Self {
            config,
            state: GestureState::Idle,
            touch: TouchSampler::new(),
            tags: TagHolder::new(),
            lifecycle: LifecycleInfo::default(),
            scroller,
            velocity: VelocityTracker::new(),
            idle_task: DeferredTask::new(),
            cycle: Cycle::Inactive,
            last_observed: None,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Current tags.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &TagHolder {
        &self.tags
    }

    /// Bookkeeping for the current cycle.
    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleInfo {
        &self.lifecycle
    }

    /// The scroller, read-only. Sessions start through the machine.
    #[inline]
    #[must_use]
    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    /// Touch samples of the current cycle.
    #[inline]
    #[must_use]
    pub fn touch(&self) -> &TouchSampler {
        &self.touch
    }

    /// Thresholds in use.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a deferred transition to `Idle` is waiting for [`run_pending`](Self::run_pending).
    #[inline]
    #[must_use]
    pub fn has_pending_task(&self) -> bool {
        self.idle_task.is_scheduled()
    }

    /// Update the travel distance used to time settles.
    pub fn set_max_scroll_distance(&mut self, distance: i32) {
        self.config.scroller.max_scroll_distance = distance.max(0);
        self.scroller.set_max_scroll_distance(distance);
    }

    // -- dispatch ----------------------------------------------------------

    /// Feed `event` through the ancestor pass. Returns the intercept tag.
    pub fn intercept_phase<H: GestureHost + ?Sized>(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
    ) -> bool {
        let fresh = self.observe(event);
        if event.action.is_terminal() {
            self.finish_cycle(event, host);
        } else {
            self.begin_cycle_if_needed(event, fresh, host);
            if !self.tags.intercept() {
                let intercept = host.should_intercept_event(self, event);
                self.tags.set_intercept(intercept, host);
            }
        }
        self.tags.intercept()
    }

    /// Feed `event` through the control's own pass. Returns the consume tag,
    /// or for `Down` whether the cycle is tracked.
    pub fn handle_phase<H: GestureHost + ?Sized>(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
    ) -> bool {
        let fresh = self.observe(event);
        match event.action {
            PointerAction::Up | PointerAction::Cancel => {
                self.finish_cycle(event, host);
            }
            PointerAction::Down => {
                self.begin_cycle_if_needed(event, fresh, host);
                let track = host.on_event_action_down(self, event);
                self.cycle = if track { Cycle::Tracking } else { Cycle::Ignored };
                if !track {
                    crate::debug!("down declined; ignoring cycle");
                }
                return track;
            }
            PointerAction::Move => {
                self.begin_cycle_if_needed(event, fresh, host);
                if self.cycle == Cycle::Ignored {
                    return false;
                }
                if !self.lifecycle.is_cancelled() {
                    if self.tags.consume() {
                        host.on_event_consume(self, event);
                        self.lifecycle.mark_consumed();
                    } else {
                        let consume = host.should_consume_event(self, event);
                        self.set_tag_consume(consume, host);
                    }
                }
            }
        }
        self.tags.consume()
    }

    /// Stop consuming the current gesture.
    ///
    /// No-op unless the consume tag is set. Marks the cycle cancelled, so later
    /// moves are not consumed and the host's finish handling can skip its
    /// settle. Schedules a deferred `Idle` unless a scroll is running.
    pub fn cancel_consumption<H: GestureHost + ?Sized>(&mut self, host: &mut H) {
        if !self.tags.consume() {
            return;
        }
        crate::debug!("consumption cancelled");
        self.lifecycle.mark_cancelled();
        if !self.scroller.is_active() {
            self.schedule_idle();
        }
        self.tags.reset(host);
        host.on_cancel_consume_event();
    }

    // -- scrolling ---------------------------------------------------------

    /// Start an eased scroll along x and enter `Flinging`.
    ///
    /// `duration` of `None` is computed from the distance. Returns `false`
    /// without any state change when `from == to`.
    pub fn scroll_to<H: GestureHost + ?Sized>(
        &mut self,
        from: i32,
        to: i32,
        duration: Option<Duration>,
        host: &mut H,
    ) -> bool {
        if !self.scroller.scroll_to(from, to, duration) {
            return false;
        }
        self.set_state(GestureState::Flinging, host);
        true
    }

    /// Start a decelerating scroll along x and enter `Flinging`.
    pub fn fling<H: GestureHost + ?Sized>(
        &mut self,
        start: i32,
        velocity: f32,
        bounds: ScrollBounds,
        host: &mut H,
    ) -> bool {
        if !self.scroller.fling(start, velocity, bounds) {
            return false;
        }
        self.set_state(GestureState::Flinging, host);
        true
    }

    /// Advance the scroller by `dt` and report the step to the host.
    ///
    /// Returns `true` while another frame is needed.
    pub fn compute_scroll<H: GestureHost + ?Sized>(&mut self, dt: Duration, host: &mut H) -> bool {
        let Some(step) = self.scroller.tick(dt) else {
            return false;
        };
        host.on_scroller_compute(step.last_x, step.last_y, step.current_x, step.current_y);
        if step.at_end {
            self.scroll_finished(false, host);
            return false;
        }
        true
    }

    /// Stop a running scroll where it is. Returns `true` if one was running.
    pub fn abort_scroll<H: GestureHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.scroller.abort() {
            return false;
        }
        self.scroll_finished(true, host);
        true
    }

    /// Run the deferred `Idle` transition if one is pending.
    ///
    /// Hosts call this once per event-loop turn. Returns `true` if it ran.
    pub fn run_pending<H: GestureHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.idle_task.take() {
            return false;
        }
        crate::trace!("deferred idle running");
        self.set_state(GestureState::Idle, host);
        true
    }

    // -- internals ---------------------------------------------------------

    /// Sample `event` unless it was the last one sampled. Returns `true` if new.
    fn observe(&mut self, event: &PointerEvent) -> bool {
        if self.last_observed.as_ref() == Some(event) {
            return false;
        }
        self.last_observed = Some(*event);
        self.touch.on_event(event);
        self.velocity.add_movement(event);
        true
    }

    fn begin_cycle_if_needed<H: GestureHost + ?Sized>(
        &mut self,
        event: &PointerEvent,
        fresh: bool,
        host: &mut H,
    ) {
        let start = match event.action {
            PointerAction::Down => fresh,
            _ => self.cycle == Cycle::Inactive,
        };
        if !start {
            return;
        }
        if event.action != PointerAction::Down {
            crate::warn!(action = ?event.action, "gesture cycle started without down");
        }
        self.start_cycle(event, host);
    }

    fn start_cycle<H: GestureHost + ?Sized>(&mut self, event: &PointerEvent, host: &mut H) {
        crate::trace!(x = event.x, y = event.y, "gesture cycle started");
        self.lifecycle.reset();
        self.tags.reset(host);
        // A cycle whose release was lost leaves no consumer behind.
        if self.state == GestureState::Consuming {
            self.set_state(GestureState::Idle, host);
        }
        // The sampler already holds the starting event; keep it in the tracker.
        self.velocity.reset();
        self.velocity.add_movement(event);
        self.cycle = Cycle::Tracking;
    }

    fn finish_cycle<H: GestureHost + ?Sized>(&mut self, event: &PointerEvent, host: &mut H) {
        let cycle = std::mem::take(&mut self.cycle);
        if cycle == Cycle::Inactive {
            crate::trace!(action = ?event.action, "release outside a gesture cycle");
            return;
        }

        self.tags.reset(host);
        let velocity = std::mem::take(&mut self.velocity);
        if cycle == Cycle::Tracking {
            host.on_event_finish(self, &velocity, event);
        }
        self.lifecycle.reset();
        crate::trace!(action = ?event.action, "gesture cycle finished");

        if self.state == GestureState::Consuming {
            self.set_state(GestureState::Idle, host);
        }
    }

    fn scroll_finished<H: GestureHost + ?Sized>(&mut self, aborted: bool, host: &mut H) {
        crate::debug!(aborted, "scroll finished");
        host.on_scroller_finish(aborted);
        if self.tags.consume() {
            self.set_state(GestureState::Consuming, host);
        } else {
            self.schedule_idle();
        }
    }

    fn schedule_idle(&mut self) {
        self.idle_task.schedule();
        crate::trace!(posts = self.idle_task.post_count(), "deferred idle scheduled");
    }

    fn set_state<H: GestureHost + ?Sized>(&mut self, next: GestureState, host: &mut H) {
        transition(&mut self.state, &mut self.idle_task, next, host);
    }

    fn set_tag_consume<H: GestureHost + ?Sized>(&mut self, tag: bool, host: &mut H) {
        let Self {
            tags,
            state,
            idle_task,
            ..
        } = self;
        let mut relay = ConsumeRelay {
            state,
            idle_task,
            host,
        };
        tags.set_consume(tag, &mut relay);
    }
}

fn transition<H: GestureHost + ?Sized>(
    state: &mut GestureState,
    idle_task: &mut DeferredTask,
    next: GestureState,
    host: &mut H,
) {
    if idle_task.cancel() {
        crate::trace!("deferred idle cancelled");
    }
    let old = *state;
    if old == next {
        return;
    }
    *state = next;
    crate::debug!(from = ?old, to = ?next, "gesture state changed");
    host.on_state_changed(old, next);
}

/// Enters `Consuming` when the consume tag turns on, before the host hears
/// about the tag.
struct ConsumeRelay<'a, H: ?Sized> {
    state: &'a mut GestureState,
    idle_task: &'a mut DeferredTask,
    host: &'a mut H,
}

impl<H: GestureHost + ?Sized> TagObserver for ConsumeRelay<'_, H> {
    fn on_tag_intercept_changed(&mut self, tag: bool) {
        self.host.on_tag_intercept_changed(tag);
    }

    fn on_tag_consume_changed(&mut self, tag: bool) {
        if tag {
            transition(
                &mut *self.state,
                &mut *self.idle_task,
                GestureState::Consuming,
                &mut *self.host,
            );
        }
        self.host.on_tag_consume_changed(tag);
    }
}
