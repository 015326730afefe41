//! The graphics context for one surface and the triangle renderer.
//!
//! A [`Context`] only exists once its program is linked, the triangle is
//! uploaded and the color uniform is found, so holding one means the
//! surface is ready to draw. Contexts are owned by the caller; nothing
//! here keeps process-wide state.

use crate::backend::{Backend, DrawCall};
use crate::color::Rgba;
use crate::config::ViewerConfig;
use crate::error::{InitError, RenderError};
use crate::shader::{ShaderSources, COLOR_UNIFORM};
use crate::triangle::{vertex_data, VERTEX_COUNT};

/// GPU-side state for one surface: backend, program, vertex buffer and the
/// color uniform location.
pub struct Context<B: Backend> {
    surface_id: String,
    backend: B,
    program: B::Program,
    geometry: B::Geometry,
    color_slot: B::ColorSlot,
    config: ViewerConfig,
}

impl<B: Backend> Context<B> {
    /// Builds a ready context on top of a freshly created backend.
    ///
    /// Compiles `shaders`, looks up the color uniform and uploads the fixed
    /// triangle. On any failure every object created so far is released
    /// before the error is returned.
    pub(crate) fn create(
        surface_id: &str,
        backend: B,
        shaders: &ShaderSources,
        config: ViewerConfig,
    ) -> Result<Self, InitError> {
        let program = backend.compile_program(shaders)?;

        let Some(color_slot) = backend.color_slot(program) else {
            backend.delete_program(program);
            return Err(InitError::ContextCreationError(format!(
                "program has no '{COLOR_UNIFORM}' uniform"
            )));
        };

        let geometry = match backend.upload_geometry(program, &vertex_data()) {
            Ok(geometry) => geometry,
            Err(e) => {
                backend.delete_program(program);
                return Err(InitError::ContextCreationError(format!(
                    "vertex upload failed: {e}"
                )));
            }
        };

        let (width, height) = backend.surface_size();
        log::debug!("context for '{surface_id}' ready ({width}x{height})");

        Ok(Self {
            surface_id: surface_id.to_owned(),
            backend,
            program,
            geometry,
            color_slot,
            config,
        })
    }

    /// The identifier of the surface this context draws to.
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// The backend this context draws through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The configuration the context was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The color drawn when the caller does not pick one.
    pub fn default_color(&self) -> Rgba {
        self.config.initial_color
    }

    /// Releases the program and vertex buffer and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend.delete_geometry(self.geometry);
        self.backend.delete_program(self.program);
        self.backend
    }
}

/// Draws the triangle in `color` and presents the frame.
///
/// The surface is cleared first, so the frame depends only on `color` and
/// the context's clear color. Channels are handed to the backend as given.
///
/// # Errors
///
/// Returns the backend's `RenderError` unchanged. The context stays usable.
pub fn draw_triangle<B: Backend>(ctx: &Context<B>, color: Rgba) -> Result<(), RenderError> {
    let result = ctx.backend.draw(DrawCall {
        program: ctx.program,
        geometry: &ctx.geometry,
        color_slot: &ctx.color_slot,
        clear_color: ctx.config.clear_color,
        color,
        vertex_count: VERTEX_COUNT,
    });

    if let Err(e) = &result {
        log::warn!("draw on '{}' failed: {e}", ctx.surface_id);
    }
    result
}
