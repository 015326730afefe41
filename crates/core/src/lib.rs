#![deny(unsafe_code)]
//! Core of the triangle viewer: initialize a graphics context for a named
//! surface once, then draw a single flat-colored triangle on demand.
//!
//! Provides the `Backend`/`SurfaceHost` seams, the `Initializer` lifecycle,
//! `Context` and `draw_triangle`, colors with caller-side channel
//! normalization, and `ViewerConfig`. The glow backend is behind the
//! `render` feature.

pub mod backend;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod shader;
pub mod triangle;

#[cfg(feature = "render")]
pub mod render;

pub use backend::{Backend, DrawCall, SurfaceHost};
pub use color::{normalize_channel, Rgba};
pub use config::ViewerConfig;
pub use context::{draw_triangle, Context};
pub use error::{ConfigError, InitError, RenderError};
pub use lifecycle::{Initializer, SurfaceState};
pub use shader::{ShaderError, ShaderSources, ShaderStage};
