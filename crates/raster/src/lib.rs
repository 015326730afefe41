#![deny(unsafe_code)]
//! Software rendering for the triangle viewer.
//!
//! [`SoftwareHost`] hands out [`SoftwareBackend`]s, CPU implementations of
//! the core `Backend` trait that rasterize into an RGBA8 framebuffer. They
//! drive the headless CLI and let the renderer's frame-level behavior be
//! tested without a GPU. With the `png` feature (default on) a frame can be
//! written out via [`snapshot::write_png`].

pub mod backend;
pub mod host;
pub mod pixel;
pub mod rasterize;

#[cfg(feature = "png")]
pub mod snapshot;

pub use backend::SoftwareBackend;
pub use host::{SoftwareHost, MAX_SURFACE_TEXELS};
