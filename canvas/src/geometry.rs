//! Element geometry: percentage model space ↔ pixel view space.
//!
//! Elements store their box as percentages of the slide so a slide renders the
//! same at any window size. Everything here is a pure function of its inputs;
//! the viewport is always passed in explicitly and never measured.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ELEMENT_PX, PERCENT_MAX};
use crate::hit::ResizeAnchor;

/// A point in viewport pixels, origin at the slide's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel size of the rectangle a slide is currently rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when the viewport cannot host a percentage conversion.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PixelRect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// The corner point named by `anchor`.
    #[must_use]
    pub fn corner(&self, anchor: ResizeAnchor) -> Point {
        match anchor {
            ResizeAnchor::Nw => Point::new(self.x, self.y),
            ResizeAnchor::Ne => Point::new(self.right(), self.y),
            ResizeAnchor::Sw => Point::new(self.x, self.bottom()),
            ResizeAnchor::Se => Point::new(self.right(), self.bottom()),
        }
    }

    /// Same size, shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// An element's box in model space, as percentages of the slide.
///
/// Field names follow the stored JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentRect {
    #[serde(default, deserialize_with = "crate::doc::number_or_zero")]
    pub position_x: f64,
    #[serde(default, deserialize_with = "crate::doc::number_or_zero")]
    pub position_y: f64,
    #[serde(default, deserialize_with = "crate::doc::number_or_zero")]
    pub size_width: f64,
    #[serde(default, deserialize_with = "crate::doc::number_or_zero")]
    pub size_height: f64,
}

impl PercentRect {
    #[must_use]
    pub fn new(position_x: f64, position_y: f64, size_width: f64, size_height: f64) -> Self {
        Self { position_x, position_y, size_width, size_height }
    }

    /// Whether the box lies entirely inside the slide.
    #[must_use]
    pub fn contained(&self) -> bool {
        let in_range = |v: f64| (0.0..=PERCENT_MAX).contains(&v);
        in_range(self.position_x)
            && in_range(self.position_y)
            && in_range(self.size_width)
            && in_range(self.size_height)
            && self.position_x + self.size_width <= PERCENT_MAX
            && self.position_y + self.size_height <= PERCENT_MAX
    }

    /// Clamp sizes into `[0, 100]`, then positions into `[0, 100 - size]`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let size_width = clamp_unit(self.size_width, PERCENT_MAX);
        let size_height = clamp_unit(self.size_height, PERCENT_MAX);
        Self {
            position_x: clamp_unit(self.position_x, PERCENT_MAX - size_width),
            position_y: clamp_unit(self.position_y, PERCENT_MAX - size_height),
            size_width,
            size_height,
        }
    }
}

/// Clamp `v` into `[0, max]`, mapping NaN to 0.
fn clamp_unit(v: f64, max: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, max.max(0.0)) }
}

/// Project a model-space box into viewport pixels.
#[must_use]
pub fn to_pixels(rect: &PercentRect, viewport: Viewport) -> PixelRect {
    PixelRect {
        x: rect.position_x / PERCENT_MAX * viewport.width,
        y: rect.position_y / PERCENT_MAX * viewport.height,
        w: rect.size_width / PERCENT_MAX * viewport.width,
        h: rect.size_height / PERCENT_MAX * viewport.height,
    }
}

/// Derive a model-space box from viewport pixels, clamped inside the slide.
///
/// A degenerate viewport yields the zero rectangle.
#[must_use]
pub fn to_percent(rect: &PixelRect, viewport: Viewport) -> PercentRect {
    if viewport.is_degenerate() {
        return PercentRect::default();
    }
    PercentRect {
        position_x: rect.x / viewport.width * PERCENT_MAX,
        position_y: rect.y / viewport.height * PERCENT_MAX,
        size_width: rect.w / viewport.width * PERCENT_MAX,
        size_height: rect.h / viewport.height * PERCENT_MAX,
    }
    .clamped()
}

/// Shift `rect` so it lies inside the viewport, shrinking it only if it is
/// larger than the viewport itself.
#[must_use]
pub fn keep_inside(rect: &PixelRect, viewport: Viewport) -> PixelRect {
    if viewport.is_degenerate() {
        return *rect;
    }
    let w = rect.w.clamp(0.0, viewport.width);
    let h = rect.h.clamp(0.0, viewport.height);
    PixelRect {
        x: rect.x.clamp(0.0, viewport.width - w),
        y: rect.y.clamp(0.0, viewport.height - h),
        w,
        h,
    }
}

/// Resize `start` by dragging the `anchor` corner by `(dx, dy)` pixels.
///
/// The opposite corner stays fixed. The result is at least `MIN_ELEMENT_PX` on
/// each axis (or the room left before the viewport edge, if smaller) and never
/// extends past the viewport.
#[must_use]
pub fn resize_from_corner(start: &PixelRect, anchor: ResizeAnchor, dx: f64, dy: f64, viewport: Viewport) -> PixelRect {
    let (moves_left, moves_top) = match anchor {
        ResizeAnchor::Nw => (true, true),
        ResizeAnchor::Ne => (false, true),
        ResizeAnchor::Sw => (true, false),
        ResizeAnchor::Se => (false, false),
    };

    let (x, w) = resize_axis(start.x, start.w, dx, moves_left, viewport.width);
    let (y, h) = resize_axis(start.y, start.h, dy, moves_top, viewport.height);
    PixelRect { x, y, w, h }
}

/// One axis of a corner resize. `moves_low` is true when the dragged corner is
/// on the low (left/top) side, so the high edge is the fixed one.
fn resize_axis(pos: f64, len: f64, delta: f64, moves_low: bool, limit: f64) -> (f64, f64) {
    if moves_low {
        let fixed = pos + len;
        let min = MIN_ELEMENT_PX.min(fixed);
        let new_pos = (pos + delta).clamp(0.0, (fixed - min).max(0.0));
        (new_pos, fixed - new_pos)
    } else {
        let room = (limit - pos).max(0.0);
        let min = MIN_ELEMENT_PX.min(room);
        (pos, (len + delta).clamp(min, room))
    }
}
