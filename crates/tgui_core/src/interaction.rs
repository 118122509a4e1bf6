//! Interaction states
//!
//! Interactive elements define their visual state as a small enum and map
//! pointer events to transitions:
//!
//! ```rust
//! use tgui_core::events::event_types::*;
//! use tgui_core::interaction::{InteractionMachine, InteractionState};
//!
//! let mut machine = InteractionMachine::new(InteractionState::Idle);
//! machine.send(POINTER_ENTER);
//! machine.send(POINTER_DOWN);
//! assert_eq!(machine.state(), InteractionState::Pressed);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use crate::events::{event_types::*, EventType};

/// Trait for state types that handle event transitions
///
/// Return `Some(next)` to transition, `None` to ignore the event.
pub trait StateTransitions: Copy + Eq + Hash + Debug {
    fn on_event(&self, event: EventType) -> Option<Self>;
}

/// Visual interaction state of a pressable surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

impl StateTransitions for InteractionState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use InteractionState::*;
        match (self, event) {
            (Idle, POINTER_ENTER) => Some(Hovered),
            (Hovered, POINTER_LEAVE) => Some(Idle),
            (Idle | Hovered, POINTER_DOWN) => Some(Pressed),
            (Pressed, POINTER_UP) => Some(Hovered),
            (Pressed, POINTER_CANCEL | POINTER_LEAVE) => Some(Idle),
            _ => None,
        }
    }
}

/// Holds the current state of a [`StateTransitions`] type
#[derive(Clone, Debug)]
pub struct InteractionMachine<S: StateTransitions> {
    state: S,
}

impl<S: StateTransitions> InteractionMachine<S> {
    pub fn new(initial: S) -> Self {
        Self { state: initial }
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// Feed an event; returns true if the state changed
    pub fn send(&mut self, event: EventType) -> bool {
        match self.state.on_event(event) {
            Some(next) if next != self.state => {
                tracing::trace!("interaction {:?} -> {:?}", self.state, next);
                self.state = next;
                true
            }
            _ => false,
        }
    }
}

impl<S: StateTransitions + Default> Default for InteractionMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
