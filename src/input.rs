use crate::geometry::Point;

/// Pointer events delivered by the host, in surface-relative coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer button was pressed
    PointerDown { position: Point },
    /// Pointer moved (with or without the button held)
    PointerMove { position: Point },
    /// Pointer button was released
    PointerUp { position: Point },
    /// Pointer left the surface
    PointerLeave { last_known_position: Point },
}

impl InputEvent {
    pub fn position(&self) -> Point {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position } => *position,
            InputEvent::PointerLeave { last_known_position } => *last_known_position,
        }
    }

    /// Whether this event ends a gesture
    pub fn ends_gesture(&self) -> bool {
        matches!(self, InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. })
    }
}
