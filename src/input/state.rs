//! Gesture state machine - one explicit state for every pointer interaction.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Panning        (middle button, or left button while Space is held)
//! Idle -> Moving         (left button on an item, no modifier)
//! Idle -> Rotating       (left button with Alt, selection non-empty)
//! Idle -> Scaling        (left button with Control, selection non-empty)
//! Idle -> Marquee        (left button on empty canvas; Shift toggles)
//!
//! Any -> Idle            (button release finalizes the gesture)
//! ```

use crate::geometry::{Point, Rect};
use crate::types::ItemId;

/// Gesture in progress.
///
/// Positions named `*_device` are in view pixels; the rest are scene
/// coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// No button held
    #[default]
    Idle,

    /// Dragging the view
    Panning {
        /// Pointer position at the previous move
        last_device: Point,
    },

    /// Translating the selection
    Moving {
        /// Selected items and their positions at press time
        origins: Vec<(ItemId, Point)>,
        /// Scene point under the pointer at press time
        press: Point,
        /// Last applied offset
        offset: Point,
    },

    /// Rotating the selection as a rigid group
    Rotating {
        ids: Vec<ItemId>,
        /// Center of the selection bounds at press time
        pivot: Point,
        /// Scene point under the pointer at the previous move
        last: Point,
    },

    /// Scaling every selected item about its own center
    Scaling {
        ids: Vec<ItemId>,
        last_device: Point,
    },

    /// Rubber-band selection
    Marquee {
        start_device: Point,
        current_device: Point,
        /// Toggle hits instead of replacing the selection
        toggle: bool,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }

    /// Returns true for gestures that change item geometry
    pub fn is_transforming(&self) -> bool {
        matches!(
            self,
            Self::Moving { .. } | Self::Rotating { .. } | Self::Scaling { .. }
        )
    }

    /// Device-space band of an active marquee
    pub fn marquee_band(&self) -> Option<Rect> {
        match self {
            Self::Marquee {
                start_device,
                current_device,
                ..
            } => Some(Rect::from_corners(*start_device, *current_device)),
            _ => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Moving { .. } => "moving",
            Self::Rotating { .. } => "rotating",
            Self::Scaling { .. } => "scaling",
            Self::Marquee { .. } => "marquee",
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
