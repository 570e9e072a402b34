//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Upper bound of every percentage field.
pub const PERCENT_MAX: f64 = 100.0;

/// Smallest width or height, in pixels, a resize gesture may produce.
pub const MIN_ELEMENT_PX: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around each corner resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Authoring defaults ──────────────────────────────────────────

/// Width and height, in percent, of a freshly authored element.
pub const DEFAULT_ELEMENT_SIZE: f64 = 50.0;

/// Font size, in em, of a freshly authored text or code element.
pub const DEFAULT_FONT_SIZE: f64 = 1.0;

/// Text colour of a freshly authored text element.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Effective slide background when neither slide nor presentation sets one.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
