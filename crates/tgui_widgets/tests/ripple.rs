//! Integration tests for ripple feedback on tappable surfaces
//!
//! These tests verify that:
//! - No pointer ever owns more than one wave, for any event sequence
//! - Releasing and re-pressing within a lifetime keeps the fresh wave alive
//! - A cancel before the lifetime ends removes the wave and its timer at once
//! - Disabled surfaces produce no waves and no state change

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;
use tgui_core::{InteractionState, PointerEvent, Rect};
use tgui_platform::Platform;
use tgui_widgets::{Tappable, TappableConfig, WidgetContext, WAVE_LIFETIME};

#[derive(Clone, Debug)]
enum Step {
    Down(i32, f32, f32),
    Up(i32),
    Cancel(i32),
    Leave(i32),
    Advance(u64),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let pointer = 0..4i32;
    prop_oneof![
        (pointer.clone(), 0.0f32..200.0, 0.0f32..40.0).prop_map(|(id, x, y)| Step::Down(id, x, y)),
        pointer.clone().prop_map(Step::Up),
        pointer.clone().prop_map(Step::Cancel),
        pointer.prop_map(Step::Leave),
        (0u64..400).prop_map(Step::Advance),
    ]
}

proptest! {
    #[test]
    fn each_pointer_owns_at_most_one_wave(steps in proptest::collection::vec(step_strategy(), 0..60)) {
        let ctx = WidgetContext::new(Platform::Base);
        let tappable = Tappable::new(&ctx, TappableConfig::new());
        tappable.set_rect(Rect::new(0.0, 0.0, 200.0, 40.0));

        for step in steps {
            match step {
                Step::Down(id, x, y) => tappable.handle_event(&PointerEvent::down(id, x, y)),
                Step::Up(id) => tappable.handle_event(&PointerEvent::up(id)),
                Step::Cancel(id) => tappable.handle_event(&PointerEvent::cancel(id)),
                Step::Leave(id) => tappable.handle_event(&PointerEvent::leave(id)),
                Step::Advance(ms) => {
                    ctx.scheduler.advance_by(Duration::from_millis(ms));
                }
            }

            let waves = tappable.waves();
            let ids: HashSet<i32> = waves.iter().map(|wave| wave.pointer_id).collect();
            prop_assert_eq!(ids.len(), waves.len());
            prop_assert!(waves.len() <= tappable.active_pointer_count());
        }
    }
}

#[test]
fn repress_within_lifetime_keeps_new_wave() {
    let ctx = WidgetContext::new(Platform::Base);
    let tappable = Tappable::new(&ctx, TappableConfig::new());

    tappable.handle_event(&PointerEvent::down(5, 10.0, 10.0));
    ctx.scheduler.advance_by(Duration::from_millis(100));
    tappable.handle_event(&PointerEvent::up(5));
    tappable.handle_event(&PointerEvent::down(5, 20.0, 20.0));

    // Past the first wave's original deadline
    ctx.scheduler.advance_by(Duration::from_millis(250));
    let waves = tappable.waves();
    assert_eq!(waves.len(), 1);
    assert_eq!(waves[0].x, 20.0);

    ctx.scheduler.advance_by(WAVE_LIFETIME);
    assert!(tappable.waves().is_empty());
}

#[test]
fn cancel_at_t50_preempts_timeout() {
    let ctx = WidgetContext::new(Platform::Base);
    let tappable = Tappable::new(&ctx, TappableConfig::new());

    tappable.handle_event(&PointerEvent::down(9, 10.0, 10.0));
    assert_eq!(ctx.scheduler.pending_count(), 1);

    ctx.scheduler.advance_by(Duration::from_millis(50));
    tappable.handle_event(&PointerEvent::cancel(9));
    assert!(tappable.waves().is_empty());
    assert_eq!(ctx.scheduler.pending_count(), 0);

    // The original 300ms deadline passes with nothing left to fire
    assert_eq!(ctx.scheduler.advance_to(300), 0);
    assert!(tappable.waves().is_empty());
    assert_eq!(ctx.scheduler.pending_count(), 0);
}

#[test]
fn disabled_surface_ignores_pointer_down() {
    let ctx = WidgetContext::new(Platform::Base);
    let tappable = Tappable::new(&ctx, TappableConfig::new().disabled());
    let mutations = ctx.document.mutation_count();

    tappable.handle_event(&PointerEvent::down(1, 10.0, 10.0));

    assert!(tappable.waves().is_empty());
    assert_eq!(tappable.state(), InteractionState::Idle);
    assert_eq!(tappable.active_pointer_count(), 0);
    assert_eq!(ctx.scheduler.pending_count(), 0);
    assert_eq!(ctx.document.mutation_count(), mutations);
}

#[test]
fn mounted_ripple_follows_presses() {
    let ctx = WidgetContext::new(Platform::Base);
    let tappable = Tappable::new(&ctx, TappableConfig::new());
    let host = ctx.document.create_element("button");
    ctx.document.append_child(ctx.document.body(), host).unwrap();
    let ripple = tappable.mount_ripple(host).unwrap();

    tappable.handle_event(&PointerEvent::down(1, 3.0, 4.0));
    tappable.handle_event(&PointerEvent::down(2, 5.0, 6.0));
    assert_eq!(ripple.wave_nodes().len(), 2);

    ctx.scheduler.advance_by(WAVE_LIFETIME);
    assert!(ripple.wave_nodes().is_empty());
}
