//! Timer scheduler
//!
//! Holds deferred callbacks and fires them as the host advances the clock.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

type TimerCallback = Box<dyn FnOnce()>;

struct Timer {
    deadline_ms: u64,
    /// Tie-breaker so timers sharing a deadline fire in scheduling order
    seq: u64,
    callback: TimerCallback,
}

/// Deferred-callback scheduler driven by a virtual millisecond clock
///
/// Callbacks run outside of any internal borrow, so they may schedule or
/// cancel other timers.
pub struct Scheduler {
    timers: RefCell<SlotMap<TimerId, Timer>>,
    now_ms: Cell<u64>,
    next_seq: Cell<u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: RefCell::new(SlotMap::with_key()),
            now_ms: Cell::new(0),
            next_seq: Cell::new(0),
        }
    }

    /// Current clock value in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Schedule `callback` to run once `delay` has elapsed
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let deadline_ms = self.now_ms.get().saturating_add(delay.as_millis() as u64);

        self.timers.borrow_mut().insert(Timer {
            deadline_ms,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timer; returns false if it already fired or was cancelled
    pub fn cancel(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().remove(id).is_some()
    }

    /// Check if a timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(id)
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Advance the clock by `elapsed`, firing every timer that comes due
    ///
    /// Returns the number of callbacks fired.
    pub fn advance_by(&self, elapsed: Duration) -> usize {
        let target = self.now_ms.get().saturating_add(elapsed.as_millis() as u64);
        self.advance_to(target)
    }

    /// Advance the clock to `target_ms`, firing due timers in deadline order
    ///
    /// The clock never moves backwards; an earlier target only fires timers
    /// that are already due.
    pub fn advance_to(&self, target_ms: u64) -> usize {
        let target_ms = target_ms.max(self.now_ms.get());
        let mut fired = 0;

        while let Some((deadline_ms, callback)) = self.take_next_due(target_ms) {
            self.now_ms.set(deadline_ms);
            callback();
            fired += 1;
        }

        self.now_ms.set(target_ms);
        if fired > 0 {
            tracing::trace!("Scheduler::advance_to({}) fired {} timers", target_ms, fired);
        }
        fired
    }

    fn take_next_due(&self, target_ms: u64) -> Option<(u64, TimerCallback)> {
        let mut timers = self.timers.borrow_mut();
        let next = timers
            .iter()
            .filter(|(_, timer)| timer.deadline_ms <= target_ms)
            .min_by_key(|(_, timer)| (timer.deadline_ms, timer.seq))
            .map(|(id, _)| id)?;
        timers
            .remove(next)
            .map(|timer| (timer.deadline_ms, timer.callback))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
