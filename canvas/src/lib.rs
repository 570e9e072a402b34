//! Slide canvas core: the model, geometry and pointer handling behind the slide editor.
//!
//! Everything here is synchronous and free of I/O. The host feeds it pointer
//! events and viewport sizes and gets back [`engine::Action`]s to act on;
//! persisting committed geometry is the host's job.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Presentation, slide and element types as stored |
//! | [`paint`] | Background paints (solid or linear gradient) |
//! | [`validate`] | Authoring-form drafts and their constraints |
//! | [`geometry`] | Percent ↔ pixel conversion, clamping and corner resize |
//! | [`hit`] | Hit-testing element bodies and corner handles |
//! | [`input`] | Mouse buttons and the gesture state |
//! | [`engine`] | The drag/resize controller ([`engine::EngineCore`]) |
//! | [`render`] | Paint-ordered scene layout for a slide |
//! | [`consts`] | Shared numeric constants (handle slop, minimum size, defaults) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod paint;
pub mod render;
pub mod validate;
