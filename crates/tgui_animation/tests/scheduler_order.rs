//! Integration tests for timer ordering
//!
//! These tests verify that:
//! - Due timers fire in deadline order, ties in scheduling order
//! - Cancelled timers never fire, however the clock is advanced

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tgui_animation::Scheduler;

proptest! {
    #[test]
    fn timers_fire_in_deadline_order(
        delays in proptest::collection::vec(0u64..500, 1..40),
        cancel_mask in proptest::collection::vec(any::<bool>(), 40),
        steps in proptest::collection::vec(1u64..200, 1..10),
    ) {
        let scheduler = Scheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let ids: Vec<_> = delays
            .iter()
            .enumerate()
            .map(|(index, delay)| {
                let fired = fired.clone();
                scheduler.schedule(Duration::from_millis(*delay), move || {
                    fired.borrow_mut().push(index);
                })
            })
            .collect();
        for (id, cancel) in ids.iter().zip(&cancel_mask) {
            if *cancel {
                scheduler.cancel(*id);
            }
        }

        for step in steps {
            scheduler.advance_by(Duration::from_millis(step));
        }
        scheduler.advance_by(Duration::from_millis(500));

        let mut expected: Vec<usize> = (0..delays.len()).filter(|i| !cancel_mask[*i]).collect();
        expected.sort_by_key(|i| (delays[*i], *i));
        prop_assert_eq!(&*fired.borrow(), &expected);
        prop_assert_eq!(scheduler.pending_count(), 0);
    }
}

#[test]
fn callback_can_schedule_follow_up() {
    let scheduler = Rc::new(Scheduler::new());
    let fired = Rc::new(RefCell::new(Vec::new()));

    let inner = scheduler.clone();
    let log = fired.clone();
    scheduler.schedule(Duration::from_millis(10), move || {
        log.borrow_mut().push(inner.now_ms());
        let log = log.clone();
        let clock = inner.clone();
        inner.schedule(Duration::from_millis(5), move || {
            log.borrow_mut().push(clock.now_ms());
        });
    });

    assert_eq!(scheduler.advance_by(Duration::from_millis(20)), 2);
    assert_eq!(*fired.borrow(), vec![10, 15]);
}
