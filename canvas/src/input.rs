//! Input model: mouse buttons and the drag/resize gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries the context captured at
//! pointer-down, which is what lets the engine compute deltas per move and
//! either commit or throw the gesture away at the end.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geometry::{PercentRect, PixelRect, Point};
use crate::hit::ResizeAnchor;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// What was captured when a gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    /// Element under manipulation.
    pub id: ElementId,
    /// Pointer position at pointer-down.
    pub start_pointer: Point,
    /// Element box in pixels at pointer-down.
    pub start_rect: PixelRect,
    /// Stored percentages at pointer-down, returned as-is when nothing moved.
    pub orig: PercentRect,
    /// Box as currently shown. View-only until commit.
    pub current: PixelRect,
}

impl Capture {
    /// Pointer displacement since pointer-down.
    #[must_use]
    pub fn delta(&self, pt: Point) -> (f64, f64) {
        (pt.x - self.start_pointer.x, pt.y - self.start_pointer.y)
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An element body is being moved.
    Dragging(Capture),
    /// An element is being resized from one of its corners.
    Resizing {
        /// Which corner handle is being dragged.
        anchor: ResizeAnchor,
        capture: Capture,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn capture(&self) -> Option<&Capture> {
        match self {
            Self::Idle => None,
            Self::Dragging(capture) | Self::Resizing { capture, .. } => Some(capture),
        }
    }

    /// The element being manipulated and its in-progress box, if any.
    #[must_use]
    pub fn preview(&self) -> Option<(ElementId, PixelRect)> {
        self.capture().map(|c| (c.id, c.current))
    }
}
