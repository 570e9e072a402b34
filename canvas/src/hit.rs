#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ElementId, Slide};
use crate::geometry::{Point, Viewport, to_pixels};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// The corner handle being dragged during a resize.
///
/// The opposite corner is the one that stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeAnchor {
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Find the element under `pt`, topmost first.
///
/// Each element's corner handles are tried before its body, so a handle
/// reaching past the edge of a lower neighbour still starts a resize. A
/// handle buried under a higher element's body is not reachable.
#[must_use]
pub fn hit_test(pt: Point, slide: &Slide, viewport: Viewport) -> Option<Hit> {
    slide.paint_order().iter().rev().find_map(|element| {
        let rect = to_pixels(&element.rect, viewport);
        let handle = ResizeAnchor::ALL.into_iter().find(|anchor| {
            let corner = rect.corner(*anchor);
            (pt.x - corner.x).abs() <= HANDLE_RADIUS_PX && (pt.y - corner.y).abs() <= HANDLE_RADIUS_PX
        });
        let part = match handle {
            Some(anchor) => HitPart::ResizeHandle(anchor),
            None if rect.contains(pt) => HitPart::Body,
            None => return None,
        };
        Some(Hit { element_id: element.id, part })
    })
}
