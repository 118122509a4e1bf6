//! tgui Animation Timing
//!
//! Animations in tgui are CSS-driven; the runtime only needs to know when an
//! animation window is over so it can retire the state behind it. The
//! [`Scheduler`] provides that: deferred callbacks on a clock the host event
//! loop advances explicitly, which keeps expiry deterministic under test.

pub mod scheduler;

pub use scheduler::{Scheduler, TimerId};
