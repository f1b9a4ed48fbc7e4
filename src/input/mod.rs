//! Pointer, wheel and key handling for the canvas.
//!
//! ## Architecture
//!
//! The host forwards raw events to the [`Controller`], which runs an explicit
//! state machine ([`GestureState`]) and mutates the scene and viewport
//! directly. Completed undoable gestures come back as a [`Command`] in the
//! [`GestureOutcome`] for the caller to record.
//!
//! ## Modules
//!
//! - `state` - Gesture state enum and helper methods
//! - `controller` - Controller, bindings, wheel and keys
//! - `mouse_down` - Press handling (hit testing, selection, gesture start)
//! - `drag` - Move handling (move, rotate, scale, pan, marquee)
//! - `mouse_up` - Release handling (finalize gesture, emit command)
//!
//! [`Command`]: crate::history::Command

mod controller;
mod drag;
mod mouse_down;
mod mouse_up;
mod state;

pub use controller::{Controller, GestureContext, GestureOutcome};
pub use state::GestureState;

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }
}

/// A pointer press, move or release in view pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            position,
            button,
            modifiers,
        }
    }

    pub fn left(position: Point) -> Self {
        Self::new(position, PointerButton::Left, Modifiers::NONE)
    }
}

/// A wheel notch. Positive `delta_y` zooms in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    pub delta_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Held to pan with the left button
    Space,
    Escape,
}
