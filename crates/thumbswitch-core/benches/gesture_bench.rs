use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use thumbswitch_core::config::ScrollerConfig;
use thumbswitch_core::event::PointerEvent;
use thumbswitch_core::gesture::{
    GestureHost, GestureMachine, GestureState, can_pull, settle_target,
};
use thumbswitch_core::scroller::Scroller;
use thumbswitch_core::tags::TagObserver;
use thumbswitch_core::touch::legal_delta;
use thumbswitch_core::velocity::VelocityTracker;

const MAX_OFFSET: i32 = 200;

/// Minimal switch-like host: drags a thumb within `0..=MAX_OFFSET`.
#[derive(Default)]
struct BenchHost {
    offset: i32,
}

impl TagObserver for BenchHost {
    fn on_tag_intercept_changed(&mut self, _tag: bool) {}
    fn on_tag_consume_changed(&mut self, _tag: bool) {}
}

impl GestureHost for BenchHost {
    fn should_intercept_event(&mut self, m: &mut GestureMachine, _: &PointerEvent) -> bool {
        can_pull(m.touch(), false, m.config().pull_angle_degrees)
    }

    fn on_event_action_down(&mut self, _: &mut GestureMachine, _: &PointerEvent) -> bool {
        true
    }

    fn should_consume_event(&mut self, m: &mut GestureMachine, _: &PointerEvent) -> bool {
        m.tags().intercept()
    }

    fn on_event_consume(&mut self, m: &mut GestureMachine, _: &PointerEvent) {
        let dx = m.touch().delta_x() as i32;
        self.offset += legal_delta(self.offset, 0, MAX_OFFSET, dx);
    }

    fn on_cancel_consume_event(&mut self) {}

    fn on_event_finish(&mut self, m: &mut GestureMachine, v: &VelocityTracker, _: &PointerEvent) {
        let velocity = v.velocity_x_with_max(m.config().max_fling_velocity);
        let checked = settle_target(
            velocity,
            m.config().min_fling_velocity,
            self.offset,
            0,
            MAX_OFFSET,
        );
        let target = if checked { MAX_OFFSET } else { 0 };
        m.scroll_to(self.offset, target, None, self);
    }

    fn on_state_changed(&mut self, _: GestureState, _: GestureState) {}

    fn on_scroller_compute(&mut self, last_x: i32, _: i32, current_x: i32, _: i32) {
        self.offset += current_x - last_x;
    }

    fn on_scroller_finish(&mut self, _: bool) {}
}

fn drag_events(moves: usize) -> Vec<PointerEvent> {
    let mut events = Vec::with_capacity(moves + 2);
    events.push(PointerEvent::down(0.0, 10.0, 0));
    for i in 1..=moves {
        events.push(PointerEvent::moved(i as f32 * 3.0, 10.0, i as u64 * 8));
    }
    let end = moves as f32 * 3.0;
    events.push(PointerEvent::up(end, 10.0, (moves as u64 + 1) * 8));
    events
}

fn drag_cycle_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/drag_cycle");
    for moves in [8usize, 64, 256] {
        let events = drag_events(moves);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(moves), &events, |b, events| {
            b.iter(|| {
                let mut machine = GestureMachine::default();
                machine.set_max_scroll_distance(MAX_OFFSET);
                let mut host = BenchHost::default();
                for event in events {
                    machine.intercept_phase(event, &mut host);
                    machine.handle_phase(event, &mut host);
                }
                while machine.compute_scroll(Duration::from_millis(16), &mut host) {}
                machine.run_pending(&mut host);
                black_box(host.offset)
            });
        });
    }
    group.finish();
}

fn scroller_tick_bench(c: &mut Criterion) {
    c.bench_function("scroller/scroll_to_full", |b| {
        b.iter(|| {
            let mut scroller = Scroller::new(ScrollerConfig::default());
            scroller.scroll_to(0, black_box(MAX_OFFSET), None);
            let mut x = 0;
            while let Some(step) = scroller.tick(Duration::from_millis(4)) {
                x = step.current_x;
                if step.at_end {
                    break;
                }
            }
            black_box(x)
        });
    });
}

fn velocity_bench(c: &mut Criterion) {
    let events = drag_events(64);
    c.bench_function("velocity/add_and_query", |b| {
        b.iter(|| {
            let mut tracker = VelocityTracker::new();
            for event in &events {
                tracker.add_movement(event);
            }
            black_box(tracker.velocity_x())
        });
    });
}

criterion_group!(benches, drag_cycle_bench, scroller_tick_bench, velocity_bench);
criterion_main!(benches);
