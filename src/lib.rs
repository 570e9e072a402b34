//! Slide deck editing session and its persistence against a remote store.
//!
//! The pure canvas core (model, geometry, pointer handling, layout) lives in
//! the `canvas` crate. This crate adds everything with I/O or time in it.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Environment configuration |
//! | [`store`] | Store trait, HTTP client and in-memory store |
//! | [`sync`] | Read-modify-write and debounced slide writes |
//! | [`navigator`] | Active slide index and its `slide=` location parameter |
//! | [`rearrange`] | Drag-and-drop slide reordering |
//! | [`editor`] | The editing session tying it all together |

pub mod config;
pub mod editor;
pub mod navigator;
pub mod rearrange;
pub mod store;
pub mod sync;
