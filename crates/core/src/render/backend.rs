//! [`Backend`] implementation on top of a `glow::Context`.
//!
//! Works with any context glow can wrap: a WebGL2 context in the browser or
//! a desktop GL 3.3+ / GLES 3.0 context natively. Every frame sets the
//! viewport to the current surface size, clears the default framebuffer,
//! draws the triangle and flushes.

use super::shader::compile_program;
use crate::backend::{Backend, DrawCall};
use crate::error::RenderError;
use crate::shader::{ShaderError, ShaderSources, COLOR_UNIFORM, POSITION_ATTRIBUTE};
use crate::triangle::COMPONENTS_PER_VERTEX;
use std::cell::Cell;

/// `GL_CONTEXT_LOST` (desktop GL robustness).
const GL_CONTEXT_LOST: u32 = 0x0507;
/// `CONTEXT_LOST_WEBGL`.
const CONTEXT_LOST_WEBGL: u32 = 0x9242;

/// Live view of the surface a [`GlBackend`] draws to, polled before every
/// draw.
pub trait SurfaceWatch {
    /// Current drawing buffer size in pixels.
    fn size(&self) -> (u32, u32);

    /// Whether the platform reports the context as lost right now.
    fn is_lost(&self) -> bool;
}

/// Vertex buffer plus the vertex array object recording its layout.
pub struct GlGeometry {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

/// Remembers a context loss once seen. WebGL reports `CONTEXT_LOST_WEBGL`
/// from `getError` only once, and objects created before the loss stay
/// invalid even if the context is later restored.
#[derive(Debug, Default)]
struct LossLatch {
    lost: Cell<bool>,
}

impl LossLatch {
    /// Fails with `ContextLost` if a loss is `reported` now or was seen before.
    fn check(&self, reported: bool) -> Result<(), RenderError> {
        if reported {
            self.lost.set(true);
        }
        if self.lost.get() {
            return Err(RenderError::ContextLost);
        }
        Ok(())
    }

    /// Maps a `glGetError` code, latching context loss.
    fn observe(&self, code: u32) -> Result<(), RenderError> {
        match render_error_from_code(code) {
            None => Ok(()),
            Some(RenderError::ContextLost) => {
                self.lost.set(true);
                Err(RenderError::ContextLost)
            }
            Some(e) => Err(e),
        }
    }
}

/// A glow context bound to one surface.
///
/// Without a [`SurfaceWatch`] the surface size given to [`GlBackend::new`]
/// is used for every frame.
pub struct GlBackend {
    gl: glow::Context,
    size: Cell<(u32, u32)>,
    watch: Option<Box<dyn SurfaceWatch>>,
    loss: LossLatch,
}

impl GlBackend {
    pub fn new(gl: glow::Context, width: u32, height: u32) -> Self {
        log::debug!("gl backend created ({width}x{height})");
        Self {
            gl,
            size: Cell::new((width, height)),
            watch: None,
            loss: LossLatch::default(),
        }
    }

    /// Follows `watch` for the surface size and context loss.
    pub fn with_watch(mut self, watch: impl SurfaceWatch + 'static) -> Self {
        self.size.set(watch.size());
        self.watch = Some(Box::new(watch));
        self
    }

    fn refresh_size(&self) -> (u32, u32) {
        if let Some(watch) = &self.watch {
            let size = watch.size();
            if size != self.size.get() {
                log::debug!("surface resized to {}x{}", size.0, size.1);
                self.size.set(size);
            }
        }
        self.size.get()
    }
}

/// Maps a `glGetError` code to a render error, or `None` for `NO_ERROR`.
fn render_error_from_code(code: u32) -> Option<RenderError> {
    match code {
        glow::NO_ERROR => None,
        GL_CONTEXT_LOST | CONTEXT_LOST_WEBGL => Some(RenderError::ContextLost),
        other => Some(RenderError::DrawFailed(format!("GL error 0x{other:04X}"))),
    }
}

impl Backend for GlBackend {
    type Program = glow::Program;
    type Geometry = GlGeometry;
    type ColorSlot = glow::UniformLocation;

    fn surface_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn compile_program(&self, sources: &ShaderSources) -> Result<glow::Program, ShaderError> {
        compile_program(&self.gl, sources)
    }

    #[allow(unsafe_code)]
    fn delete_program(&self, program: glow::Program) {
        use glow::HasContext;

        // SAFETY: program was created on this context.
        unsafe { self.gl.delete_program(program) };
    }

    #[allow(unsafe_code)]
    fn upload_geometry(&self, program: glow::Program, vertices: &[f32]) -> Result<GlGeometry, String> {
        use glow::HasContext;

        let gl = &self.gl;

        // SAFETY: all handles are created here on the same context and
        // released again on every failure path.
        unsafe {
            let location = gl
                .get_attrib_location(program, POSITION_ATTRIBUTE)
                .ok_or_else(|| format!("attribute '{POSITION_ATTRIBUTE}' not found"))?;

            let vao = gl.create_vertex_array()?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(e);
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(
                location,
                COMPONENTS_PER_VERTEX as i32,
                glow::FLOAT,
                false,
                0,
                0,
            );
            gl.enable_vertex_attrib_array(location);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            if let Some(e) = render_error_from_code(gl.get_error()) {
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(e.to_string());
            }

            Ok(GlGeometry { vao, vbo })
        }
    }

    #[allow(unsafe_code)]
    fn delete_geometry(&self, geometry: GlGeometry) {
        use glow::HasContext;

        // SAFETY: both handles were created in upload_geometry.
        unsafe {
            self.gl.delete_buffer(geometry.vbo);
            self.gl.delete_vertex_array(geometry.vao);
        }
    }

    #[allow(unsafe_code)]
    fn color_slot(&self, program: glow::Program) -> Option<glow::UniformLocation> {
        use glow::HasContext;

        // SAFETY: program is a linked program on this context.
        unsafe { self.gl.get_uniform_location(program, COLOR_UNIFORM) }
    }

    #[allow(unsafe_code)]
    fn draw(&self, call: DrawCall<'_, Self>) -> Result<(), RenderError> {
        use glow::HasContext;

        let reported = self.watch.as_ref().is_some_and(|w| w.is_lost());
        self.loss.check(reported)?;

        let gl = &self.gl;
        let (width, height) = self.refresh_size();
        let [cr, cg, cb, ca] = call.clear_color;
        let [r, g, b, a] = call.color;

        // SAFETY: program, VAO and uniform location all belong to this
        // context and outlive the call.
        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(cr, cg, cb, ca);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(call.program));
            gl.uniform_4_f32(Some(call.color_slot), r, g, b, a);
            gl.bind_vertex_array(Some(call.geometry.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, call.vertex_count as i32);
            gl.bind_vertex_array(None);
            gl.flush();

            self.loss.observe(gl.get_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_error_code_is_success() {
        assert_eq!(render_error_from_code(glow::NO_ERROR), None);
    }

    #[test]
    fn context_lost_codes_map_to_context_lost() {
        assert_eq!(
            render_error_from_code(CONTEXT_LOST_WEBGL),
            Some(RenderError::ContextLost)
        );
        assert_eq!(
            render_error_from_code(GL_CONTEXT_LOST),
            Some(RenderError::ContextLost)
        );
    }

    #[test]
    fn other_codes_carry_hex_value() {
        let err = render_error_from_code(glow::INVALID_OPERATION).unwrap();
        assert_eq!(err, RenderError::DrawFailed("GL error 0x0502".into()));
    }

    #[test]
    fn loss_from_get_error_is_reported_on_every_later_draw() {
        let latch = LossLatch::default();
        assert_eq!(latch.check(false), Ok(()));
        assert_eq!(latch.observe(CONTEXT_LOST_WEBGL), Err(RenderError::ContextLost));
        // getError no longer repeats the loss.
        assert_eq!(latch.check(false), Err(RenderError::ContextLost));
        assert_eq!(latch.check(false), Err(RenderError::ContextLost));
    }

    #[test]
    fn reported_loss_is_latched() {
        let latch = LossLatch::default();
        assert_eq!(latch.check(true), Err(RenderError::ContextLost));
        assert_eq!(latch.check(false), Err(RenderError::ContextLost));
    }

    #[test]
    fn other_errors_do_not_latch() {
        let latch = LossLatch::default();
        assert!(matches!(
            latch.observe(glow::INVALID_OPERATION),
            Err(RenderError::DrawFailed(_))
        ));
        assert_eq!(latch.observe(glow::NO_ERROR), Ok(()));
        assert_eq!(latch.check(false), Ok(()));
    }

    #[test]
    #[ignore = "requires GL context"]
    fn draw_presents_triangle_in_uniform_color() {
        // Would test: after draw with GREEN, reading the center pixel back
        // with read_pixels yields (0, 255, 0, 255).
    }
}
