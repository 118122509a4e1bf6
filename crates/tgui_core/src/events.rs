//! Pointer events
//!
//! The pointer event model consumed by tappable surfaces. Coordinates are in
//! client (viewport) space, as delivered by the host.

/// Event type identifier
pub type EventType = u32;

/// Pointer event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    /// The host aborted the gesture (scroll took over, touch interrupted)
    pub const POINTER_CANCEL: EventType = 6;
}

/// Input device that produced a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A pointer event delivered to an interactive element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub event_type: EventType,
    /// Host-assigned id, unique among currently active pointers
    pub pointer_id: i32,
    pub client_x: f32,
    pub client_y: f32,
    pub pointer_type: PointerType,
}

impl PointerEvent {
    pub fn new(event_type: EventType, pointer_id: i32, client_x: f32, client_y: f32) -> Self {
        Self {
            event_type,
            pointer_id,
            client_x,
            client_y,
            pointer_type: PointerType::Touch,
        }
    }

    pub fn down(pointer_id: i32, client_x: f32, client_y: f32) -> Self {
        Self::new(event_types::POINTER_DOWN, pointer_id, client_x, client_y)
    }

    pub fn up(pointer_id: i32) -> Self {
        Self::new(event_types::POINTER_UP, pointer_id, 0.0, 0.0)
    }

    pub fn cancel(pointer_id: i32) -> Self {
        Self::new(event_types::POINTER_CANCEL, pointer_id, 0.0, 0.0)
    }

    pub fn enter(pointer_id: i32) -> Self {
        Self::new(event_types::POINTER_ENTER, pointer_id, 0.0, 0.0)
    }

    pub fn leave(pointer_id: i32) -> Self {
        Self::new(event_types::POINTER_LEAVE, pointer_id, 0.0, 0.0)
    }

    /// Set the pointer type
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Whether this event ends the gesture of its pointer
    pub fn ends_gesture(&self) -> bool {
        matches!(
            self.event_type,
            event_types::POINTER_UP | event_types::POINTER_CANCEL | event_types::POINTER_LEAVE
        )
    }
}

/// Element bounds in client space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a client-space point to element-local coordinates
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends_gesture() {
        assert!(PointerEvent::up(1).ends_gesture());
        assert!(PointerEvent::cancel(1).ends_gesture());
        assert!(PointerEvent::leave(1).ends_gesture());
        assert!(!PointerEvent::down(1, 0.0, 0.0).ends_gesture());
        assert!(!PointerEvent::enter(1).ends_gesture());
    }

    #[test]
    fn test_to_local() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.to_local(15.0, 30.0), (5.0, 10.0));
    }
}
