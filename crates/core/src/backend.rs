//! The seams between the triangle renderer and whatever actually draws.
//!
//! A [`SurfaceHost`] resolves surface identifiers and hands out one
//! [`Backend`] per surface. A `Backend` is the narrow slice of a graphics
//! API the renderer needs: compile a program, upload a vertex buffer, find
//! the color uniform, and draw. The glow implementation lives in
//! [`crate::render`]; the software rasterizer lives in its own crate.
//!
//! All methods take `&self`. Everything runs on the thread that owns the
//! surface, so backends that need to mutate use interior mutability.

use crate::color::Rgba;
use crate::error::{InitError, RenderError};
use crate::shader::{ShaderError, ShaderSources};

/// A graphics backend bound to exactly one surface.
pub trait Backend {
    /// Handle to a linked shader program.
    type Program: Copy;
    /// Handle to uploaded vertex data and its attribute layout.
    type Geometry;
    /// Location of the color uniform within a program.
    type ColorSlot;

    /// Width and height of the drawing surface in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Compiles both stages and links them into a program.
    ///
    /// Implementations must release every intermediate object they created
    /// when they return an error.
    fn compile_program(&self, sources: &ShaderSources) -> Result<Self::Program, ShaderError>;

    /// Releases a program.
    fn delete_program(&self, program: Self::Program);

    /// Uploads tightly packed `x, y, z` positions and binds them to the
    /// program's position attribute.
    fn upload_geometry(
        &self,
        program: Self::Program,
        vertices: &[f32],
    ) -> Result<Self::Geometry, String>;

    /// Releases uploaded geometry.
    fn delete_geometry(&self, geometry: Self::Geometry);

    /// Looks up the color uniform, or `None` if the program has none.
    fn color_slot(&self, program: Self::Program) -> Option<Self::ColorSlot>;

    /// Clears the surface, draws the geometry with the given color and
    /// presents the frame.
    fn draw(&self, call: DrawCall<'_, Self>) -> Result<(), RenderError>;
}

/// Everything a single draw needs.
pub struct DrawCall<'a, B: Backend + ?Sized> {
    pub program: B::Program,
    pub geometry: &'a B::Geometry,
    pub color_slot: &'a B::ColorSlot,
    pub clear_color: Rgba,
    /// Passed to the backend as given; channels are never clamped.
    pub color: Rgba,
    pub vertex_count: usize,
}

/// A host environment that owns drawing surfaces keyed by string.
pub trait SurfaceHost {
    type Backend: Backend;

    /// Resolves `surface_id` and creates a backend bound to it.
    ///
    /// # Errors
    ///
    /// Returns `InitError::SurfaceNotFound` if nothing by that name exists
    /// or it is not a drawing surface, and `InitError::ContextCreationError`
    /// if the surface refuses to give out a context.
    fn create_backend(&self, surface_id: &str) -> Result<Self::Backend, InitError>;
}
