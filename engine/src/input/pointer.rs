//! Pointer Input Module
//!
//! Windowing-agnostic pointer events. Mouse and touch input both arrive as
//! pointers identified by a [`PointerId`], which lets a widget claim a drag
//! for one pointer and ignore every other pointer until it is released.

/// Identifier of one pointer (the mouse, or one finger on a touch screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The system mouse cursor.
    pub const MOUSE: PointerId = PointerId(0);

    /// A touch contact. Touch ids are offset so they never collide with the mouse.
    pub fn touch(id: u64) -> Self {
        PointerId(id.wrapping_add(1))
    }
}

/// A pointer event in window client coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Convenience constructor for mouse events.
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::new(PointerId::MOUSE, x, y)
    }

    pub fn position(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }
}

/// Last known position of the mouse pointer.
///
/// winit reports button presses without coordinates, so the viewer tracks the
/// cursor here and stamps it onto press/release events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    position: Option<(f32, f32)>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, x: f32, y: f32) -> PointerEvent {
        self.position = Some((x, y));
        PointerEvent::mouse(x, y)
    }

    /// The cursor left the window. Returns a cancel event at the last known
    /// position; releases outside the window are never reported.
    pub fn left(&mut self) -> Option<PointerEvent> {
        self.position
            .take()
            .map(|(x, y)| PointerEvent::mouse(x, y))
    }

    /// Event for a button transition at the last cursor position.
    pub fn event(&self) -> Option<PointerEvent> {
        self.position.map(|(x, y)| PointerEvent::mouse(x, y))
    }
}
