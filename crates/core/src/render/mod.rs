//! Hardware rendering through glow (WebGL2 / OpenGL).
//!
//! This module is only available when the `render` feature is enabled.
//!
//! - [`shader`] -- GL shader compilation and program linking.
//! - [`backend`] -- [`GlBackend`], the glow implementation of [`crate::Backend`].

pub mod backend;
pub mod shader;

pub use backend::{GlBackend, GlGeometry, SurfaceWatch};
pub use shader::{compile_program, compile_shader, link_program};
