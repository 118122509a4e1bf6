//! tgui Core Runtime
//!
//! This crate provides the foundational primitives shared by every tgui service
//! and widget:
//!
//! - **Reactive Signals**: signals, lazily recomputed derived values and effects
//! - **Pointer Events**: the pointer event model consumed by tappable surfaces
//! - **Interaction States**: event-driven idle/hovered/pressed transitions
//!
//! # Example
//!
//! ```rust
//! use tgui_core::reactive::ReactiveGraph;
//!
//! let graph = ReactiveGraph::new();
//!
//! // Create a signal
//! let count = graph.create_signal(0i32);
//!
//! // Create a derived value
//! let doubled = graph.create_derived(move |g| g.get(count).unwrap_or(0) * 2);
//!
//! // Update the signal
//! graph.set(count, 5);
//! assert_eq!(graph.get_derived(doubled), Some(10));
//! ```

pub mod events;
pub mod interaction;
pub mod reactive;

pub use events::{event_types, EventType, PointerEvent, PointerType, Rect};
pub use interaction::{InteractionMachine, InteractionState, StateTransitions};
pub use reactive::{Derived, DerivedId, Effect, EffectId, ReactiveGraph, Signal, SignalId};
