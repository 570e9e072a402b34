use crate::doc::{ElementId, Slide};
use crate::geometry::{PercentRect, PixelRect, Point, Viewport, keep_inside, resize_from_corner, to_percent, to_pixels};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, Capture, InputState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The slide must be redrawn (preview rect changed or was discarded).
    RenderNeeded,
    /// Change the pointer cursor to the named CSS cursor.
    SetCursor(&'static str),
    /// A drag or resize finished; `rect` is the clamped box to persist.
    GeometryCommitted { id: ElementId, rect: PercentRect },
    /// Secondary click on an element: open the context menu for it.
    ContextMenuRequested { id: ElementId },
    /// Double click on an element: open the property editor for it.
    EditRequested { id: ElementId },
}

/// Drag/resize controller for the active slide.
///
/// Owns only view state: the viewport and the gesture in progress. The slide
/// is passed in by the caller on every event that needs it, and committed
/// geometry leaves through [`Action::GeometryCommitted`]; the model is never
/// touched here.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub viewport: Viewport,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, input: InputState::Idle }
    }

    /// Update viewport dimensions. Any gesture in progress is discarded, since
    /// its pixel rect was measured against the old size.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        if self.input.is_idle() {
            return vec![Action::RenderNeeded];
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded, Action::SetCursor("default")]
    }

    /// The element being manipulated and the box it is shown at right now.
    #[must_use]
    pub fn preview(&self) -> Option<(ElementId, PixelRect)> {
        self.input.preview()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, slide: &Slide) -> Vec<Action> {
        if !self.input.is_idle() || self.viewport.is_degenerate() {
            return Vec::new();
        }
        let Some(hit) = hit_test(pt, slide, self.viewport) else {
            return Vec::new();
        };
        match button {
            Button::Secondary => return vec![Action::ContextMenuRequested { id: hit.element_id }],
            Button::Middle => return Vec::new(),
            Button::Primary => {}
        }
        let Some(element) = slide.element(&hit.element_id) else {
            return Vec::new();
        };

        let start_rect = to_pixels(&element.rect, self.viewport);
        let capture = Capture { id: element.id, start_pointer: pt, start_rect, orig: element.rect, current: start_rect };
        match hit.part {
            HitPart::Body => {
                self.input = InputState::Dragging(capture);
                vec![Action::SetCursor("grabbing")]
            }
            HitPart::ResizeHandle(anchor) => {
                self.input = InputState::Resizing { anchor, capture };
                vec![Action::SetCursor(anchor.cursor())]
            }
        }
    }

    /// Track the pointer. While idle this only updates the hover cursor.
    pub fn on_pointer_move(&mut self, pt: Point, slide: &Slide) -> Vec<Action> {
        if self.input.is_idle() {
            let cursor = match hit_test(pt, slide, self.viewport).map(|h| h.part) {
                Some(HitPart::Body) => "grab",
                Some(HitPart::ResizeHandle(anchor)) => anchor.cursor(),
                None => "default",
            };
            return vec![Action::SetCursor(cursor)];
        }
        if self.track(pt) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Finish the gesture and emit the committed geometry.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        self.track(pt);
        let Some(capture) = self.input.capture().copied() else {
            return Vec::new();
        };
        self.input = InputState::Idle;

        // Zero net movement keeps the stored percentages bit-exact.
        let rect = if capture.current == capture.start_rect {
            capture.orig
        } else {
            to_percent(&capture.current, self.viewport)
        };
        vec![
            Action::GeometryCommitted { id: capture.id, rect },
            Action::SetCursor("default"),
            Action::RenderNeeded,
        ]
    }

    /// The pointer left the slide before release: drop the gesture uncommitted.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor("default"), Action::RenderNeeded]
    }

    pub fn on_double_click(&mut self, pt: Point, slide: &Slide) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        hit_test(pt, slide, self.viewport)
            .map(|hit| vec![Action::EditRequested { id: hit.element_id }])
            .unwrap_or_default()
    }

    /// Cancel any gesture without committing, e.g. when the active slide changes.
    pub fn cancel(&mut self) {
        self.input = InputState::Idle;
    }

    /// Recompute the preview rect for pointer position `pt`. Returns true if it changed.
    fn track(&mut self, pt: Point) -> bool {
        let viewport = self.viewport;
        let (capture, next) = match &mut self.input {
            InputState::Idle => return false,
            InputState::Dragging(capture) => {
                let (dx, dy) = capture.delta(pt);
                let next = keep_inside(&capture.start_rect.translated(dx, dy), viewport);
                (capture, next)
            }
            InputState::Resizing { anchor, capture } => {
                let (dx, dy) = capture.delta(pt);
                let next = resize_from_corner(&capture.start_rect, *anchor, dx, dy, viewport);
                (capture, next)
            }
        };
        // Back at the start point: show exactly the starting box, not a recomputed one.
        let next = if capture.delta(pt) == (0.0, 0.0) { capture.start_rect } else { next };
        if capture.current == next {
            return false;
        }
        capture.current = next;
        true
    }
}
