#![deny(unsafe_code)]
//! WASM bindings for the triangle viewer.
//!
//! Exposes `initialize(canvas_id, config?)`, returning a `TriangleViewer`
//! whose `draw_triangle(color?)` redraws the canvas, plus the
//! `normalize_channel` helper for turning 0-255 form fields into channels.
//! Browser-only code is compiled for `wasm32` targets only.

pub mod input;

#[cfg(target_arch = "wasm32")]
mod surface;
#[cfg(target_arch = "wasm32")]
mod viewer;

#[cfg(target_arch = "wasm32")]
pub use viewer::{initialize, normalize_channel, surface_state, TriangleViewer};
