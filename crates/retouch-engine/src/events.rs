//! Pointer events driving the selection controller.

use retouch_protocols::Point;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// Modifier key state at event time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.alt || self.ctrl || self.meta || self.shift
    }
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Plain primary-button event with no modifiers.
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    /// Same event with a different button.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Same event with modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
