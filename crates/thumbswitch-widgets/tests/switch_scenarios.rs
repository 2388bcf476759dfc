//! End-to-end switch scenarios: taps, drags, flings and programmatic changes.

use std::time::Duration;

use proptest::prelude::*;
use thumbswitch_core::event::PointerEvent;
use thumbswitch_widgets::{ScrollState, Switch, SwitchConfig, SwitchEvent, SwitchLayout};

const FRAME: Duration = Duration::from_millis(16);

/// A switch whose thumb travels `[0, 100]`.
fn switch(checked: bool) -> Switch {
    let mut s = Switch::new(SwitchConfig::default().with_margins(0).with_checked(checked));
    s.layout(SwitchLayout::new(140, 40, 40, 40));
    s.drain_events();
    s
}

fn send(s: &mut Switch, event: PointerEvent) -> bool {
    s.intercept_touch_event(&event);
    s.touch_event(&event)
}

/// Run the settle animation to completion, returning every reported offset.
fn settle(s: &mut Switch) -> Vec<i32> {
    let mut frames = 0;
    while s.compute_scroll(FRAME) {
        frames += 1;
        assert!(frames < 1_000, "settle never finished");
    }
    s.run_pending();
    s.drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SwitchEvent::PositionChanged { offset, .. } => Some(offset),
            _ => None,
        })
        .collect()
}

#[test]
fn tap_toggles_checked() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(10.0, 10.0, 0));
    send(&mut s, PointerEvent::up(11.0, 11.0, 50));

    assert!(s.is_checked());
    assert_eq!(s.scroll_state(), ScrollState::Fling);
    let offsets = settle(&mut s);
    assert_eq!(offsets.last(), Some(&100));
    assert_eq!(s.thumb_offset(), 100);
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn tap_without_animation_snaps() {
    let mut s = Switch::new(
        SwitchConfig::default()
            .with_margins(0)
            .with_animate_toggle(false),
    );
    s.layout(SwitchLayout::new(140, 40, 40, 40));
    send(&mut s, PointerEvent::down(10.0, 10.0, 0));
    send(&mut s, PointerEvent::up(10.0, 10.0, 40));
    assert!(s.is_checked());
    assert_eq!(s.thumb_offset(), 100);
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn slow_tap_is_not_a_click() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(10.0, 10.0, 0));
    send(&mut s, PointerEvent::up(10.0, 10.0, 201));
    assert!(!s.is_checked());
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn drag_released_slowly_settles_by_position() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    // The first move claims the gesture; later moves drag the thumb.
    assert!(send(&mut s, PointerEvent::moved(0.0, 10.0, 10)));
    assert_eq!(s.scroll_state(), ScrollState::Drag);
    send(&mut s, PointerEvent::moved(20.0, 10.0, 20));
    send(&mut s, PointerEvent::moved(40.0, 10.0, 30));
    assert_eq!(s.thumb_offset(), 40);

    // Held still before release: no release velocity.
    send(&mut s, PointerEvent::up(40.0, 10.0, 300));
    assert!(!s.is_checked());
    s.drain_events();
    let offsets = settle(&mut s);
    assert!(offsets.windows(2).all(|w| w[1] <= w[0]), "{offsets:?}");
    assert_eq!(s.thumb_offset(), 0);
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn drag_past_middle_settles_checked() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    send(&mut s, PointerEvent::moved(0.0, 10.0, 10));
    send(&mut s, PointerEvent::moved(60.0, 10.0, 20));
    send(&mut s, PointerEvent::up(60.0, 10.0, 400));
    assert!(s.is_checked());
    settle(&mut s);
    assert_eq!(s.thumb_offset(), 100);
}

#[test]
fn fling_settles_by_velocity() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    // 4 px every 10 ms: 400 px/s rightwards.
    for i in 1..=10u64 {
        send(&mut s, PointerEvent::moved(i as f32 * 4.0, 10.0, i * 10));
    }
    let released_at = s.thumb_offset();
    assert!(released_at < 50);
    send(&mut s, PointerEvent::up(44.0, 10.0, 110));

    assert!(s.is_checked());
    assert_eq!(s.scroll_state(), ScrollState::Fling);
    let events = s.drain_events();
    assert!(events.contains(&SwitchEvent::CheckedChanged(true)));

    let offsets = settle(&mut s);
    assert!(offsets.windows(2).all(|w| w[1] >= w[0]), "{offsets:?}");
    assert_eq!(offsets.last(), Some(&100));
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn drag_toward_active_endpoint_is_never_consumed() {
    let mut s = switch(true);
    // Down off the thumb, then push further right.
    send(&mut s, PointerEvent::down(20.0, 10.0, 0));
    for i in 1..=5u64 {
        assert!(!send(&mut s, PointerEvent::moved(20.0 + i as f32 * 10.0, 10.0, i * 10)));
    }
    send(&mut s, PointerEvent::up(70.0, 10.0, 60));
    assert!(s.is_checked());
    assert_eq!(s.thumb_offset(), 100);
    assert!(
        !s.drain_events()
            .iter()
            .any(|e| matches!(e, SwitchEvent::DisallowIntercept(true)))
    );
}

#[test]
fn drag_away_from_active_endpoint_is_consumed() {
    let mut s = switch(true);
    send(&mut s, PointerEvent::down(20.0, 10.0, 0));
    assert!(send(&mut s, PointerEvent::moved(10.0, 10.0, 10)));
    assert!(s.drain_events().contains(&SwitchEvent::DisallowIntercept(true)));
}

#[test]
fn set_checked_mid_drag_wins_over_deferred_idle() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    send(&mut s, PointerEvent::moved(0.0, 10.0, 10));
    send(&mut s, PointerEvent::moved(30.0, 10.0, 20));
    assert_eq!(s.scroll_state(), ScrollState::Drag);

    assert!(s.set_checked(true, true, true));
    assert_eq!(s.scroll_state(), ScrollState::Fling);
    assert!(!s.machine().has_pending_task());
    assert!(!s.run_pending());
    assert_eq!(s.scroll_state(), ScrollState::Fling);

    // The rest of the cancelled drag is ignored.
    let before = s.thumb_offset();
    assert!(!send(&mut s, PointerEvent::moved(10.0, 10.0, 30)));
    assert_eq!(s.thumb_offset(), before);
    send(&mut s, PointerEvent::up(10.0, 10.0, 40));
    assert!(s.is_checked());

    settle(&mut s);
    assert_eq!(s.thumb_offset(), 100);
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn sub_pixel_drag_accumulates() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    assert!(send(&mut s, PointerEvent::moved(0.0, 10.0, 5)));
    for i in 1..=40u64 {
        send(&mut s, PointerEvent::moved(i as f32 * 0.9, 10.0, 5 + i * 5));
    }
    // 36px of finger travel; at most one pixel may still be pending.
    assert!((35..=36).contains(&s.thumb_offset()), "offset {}", s.thumb_offset());
}

#[test]
fn down_after_lost_release_snaps_back_and_accepts_set_checked() {
    let mut s = switch(false);
    send(&mut s, PointerEvent::down(0.0, 10.0, 0));
    send(&mut s, PointerEvent::moved(0.0, 10.0, 10));
    send(&mut s, PointerEvent::moved(30.0, 10.0, 20));
    assert_eq!(s.scroll_state(), ScrollState::Drag);
    assert_eq!(s.thumb_offset(), 30);

    // No release; the next contact starts elsewhere.
    send(&mut s, PointerEvent::down(120.0, 10.0, 100));
    assert_eq!(s.scroll_state(), ScrollState::Idle);
    assert_eq!(s.thumb_offset(), 0);
    assert!(!s.machine().tags().consume());

    assert!(s.set_checked(true, false, true));
    s.run_pending();
    assert_eq!(s.thumb_offset(), 100);
    assert_eq!(s.scroll_state(), ScrollState::Idle);
}

#[test]
fn relayout_while_idle_snaps_to_endpoint() {
    let mut s = switch(true);
    s.layout(SwitchLayout::new(200, 40, 40, 40));
    assert_eq!(s.thumb_offset(), 160);
    assert_eq!(s.offset_range(), (0, 160));
}

proptest! {
    #[test]
    fn thumb_never_leaves_range(
        xs in prop::collection::vec(-300.0f32..300.0, 1..40),
        checked in any::<bool>(),
    ) {
        let mut s = switch(checked);
        let start = if checked { 110.0 } else { 10.0 };
        send(&mut s, PointerEvent::down(start, 10.0, 0));
        let mut t = 0u64;
        for x in &xs {
            t += 8;
            send(&mut s, PointerEvent::moved(start + x, 10.0, t));
            prop_assert!((0..=100).contains(&s.thumb_offset()), "offset {}", s.thumb_offset());
        }
        send(&mut s, PointerEvent::up(start, 10.0, t + 8));
        let offsets = settle(&mut s);
        prop_assert!(offsets.iter().all(|o| (0..=100).contains(o)));
        let expected = if s.is_checked() { 100 } else { 0 };
        prop_assert_eq!(s.thumb_offset(), expected);
        prop_assert_eq!(s.scroll_state(), ScrollState::Idle);
    }
}
