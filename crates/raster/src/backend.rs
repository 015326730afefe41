//! A CPU [`Backend`] that renders into an in-memory RGBA8 framebuffer.
//!
//! The software backend does not interpret GLSL. It runs the fixed
//! pass-through vertex stage and flat color fragment stage directly, and
//! checks shader sources only structurally (non-empty, has `main`, balanced
//! braces, writes `gl_Position`, declares the attribute and uniform the
//! pipeline binds) so that bad sources fail the way a driver would fail
//! them: with a numbered-source diagnostic.

use crate::pixel::{quantize, texels_to_bytes};
use crate::rasterize::fill_triangles;
use glam::Vec3;
use std::cell::RefCell;
use triangle_viewer_core::shader::{format_shader_error, COLOR_UNIFORM, POSITION_ATTRIBUTE};
use triangle_viewer_core::triangle::COMPONENTS_PER_VERTEX;
use triangle_viewer_core::{
    Backend, DrawCall, RenderError, Rgba, ShaderError, ShaderSources, ShaderStage,
};

/// Handle to a linked software program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareProgram(usize);

/// Handle to uploaded software geometry.
#[derive(Debug, PartialEq, Eq)]
pub struct SoftwareGeometry(usize);

/// Color uniform location; remembers the program it was looked up in.
#[derive(Debug, PartialEq, Eq)]
pub struct SoftwareColorSlot(SoftwareProgram);

struct ProgramRecord {
    vertex: String,
    fragment: String,
}

struct State {
    programs: Vec<Option<ProgramRecord>>,
    geometries: Vec<Option<Vec<Vec3>>>,
    texels: Vec<[u8; 4]>,
    last_color: Option<Rgba>,
    lost: bool,
}

/// Software backend for one surface of `width` x `height` pixels.
pub struct SoftwareBackend {
    width: u32,
    height: u32,
    state: RefCell<State>,
}

/// Checks one stage the way a compiler front end would reject it outright.
fn check_stage(stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    let last_line = source.lines().count();
    let problem = if source.trim().is_empty() {
        Some("ERROR: 0:0: empty shader source".to_string())
    } else if !source.contains("void main") {
        Some(format!("ERROR: 0:{last_line}: missing entry point 'main'"))
    } else if source.matches('{').count() != source.matches('}').count() {
        Some(format!("ERROR: 0:{last_line}: unbalanced braces"))
    } else {
        None
    };

    match problem {
        Some(log) => Err(ShaderError::CompileError {
            stage,
            log: format_shader_error(source, &log),
        }),
        None => Ok(()),
    }
}

impl SoftwareBackend {
    /// Creates a backend with a framebuffer cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        log::debug!("software backend created ({width}x{height})");
        Self {
            width,
            height,
            state: RefCell::new(State {
                programs: Vec::new(),
                geometries: Vec::new(),
                texels: vec![[0; 4]; width as usize * height as usize],
                last_color: None,
                lost: false,
            }),
        }
    }

    /// The presented frame as tightly packed RGBA8 rows, top row first.
    pub fn frame_rgba8(&self) -> Vec<u8> {
        texels_to_bytes(&self.state.borrow().texels)
    }

    /// The texel at `(x, y)` (origin top-left), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.state.borrow().texels[y as usize * self.width as usize + x as usize])
    }

    /// The unquantized color most recently handed to the color uniform.
    pub fn last_color(&self) -> Option<Rgba> {
        self.state.borrow().last_color
    }

    /// Number of programs and geometries currently allocated.
    pub fn live_objects(&self) -> usize {
        let state = self.state.borrow();
        state.programs.iter().flatten().count() + state.geometries.iter().flatten().count()
    }

    /// Simulates losing the graphics context; every later draw fails.
    pub fn lose_context(&self) {
        log::warn!("software context lost");
        self.state.borrow_mut().lost = true;
    }
}

impl Backend for SoftwareBackend {
    type Program = SoftwareProgram;
    type Geometry = SoftwareGeometry;
    type ColorSlot = SoftwareColorSlot;

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn compile_program(&self, sources: &ShaderSources) -> Result<SoftwareProgram, ShaderError> {
        check_stage(ShaderStage::Vertex, &sources.vertex)?;
        check_stage(ShaderStage::Fragment, &sources.fragment)?;

        if !sources.vertex.contains("gl_Position") {
            return Err(ShaderError::LinkError(
                "vertex stage never writes gl_Position".into(),
            ));
        }

        let mut state = self.state.borrow_mut();
        state.programs.push(Some(ProgramRecord {
            vertex: sources.vertex.clone(),
            fragment: sources.fragment.clone(),
        }));
        Ok(SoftwareProgram(state.programs.len() - 1))
    }

    fn delete_program(&self, program: SoftwareProgram) {
        if let Some(slot) = self.state.borrow_mut().programs.get_mut(program.0) {
            *slot = None;
        }
    }

    fn upload_geometry(
        &self,
        program: SoftwareProgram,
        vertices: &[f32],
    ) -> Result<SoftwareGeometry, String> {
        let mut state = self.state.borrow_mut();

        let record = state
            .programs
            .get(program.0)
            .and_then(Option::as_ref)
            .ok_or("unknown program")?;
        if !record.vertex.contains(POSITION_ATTRIBUTE) {
            return Err(format!("attribute '{POSITION_ATTRIBUTE}' not found"));
        }
        if vertices.len() % COMPONENTS_PER_VERTEX != 0 {
            return Err(format!(
                "vertex data length {} is not a multiple of {COMPONENTS_PER_VERTEX}",
                vertices.len()
            ));
        }

        let positions = vertices
            .chunks_exact(COMPONENTS_PER_VERTEX)
            .map(Vec3::from_slice)
            .collect();
        state.geometries.push(Some(positions));
        Ok(SoftwareGeometry(state.geometries.len() - 1))
    }

    fn delete_geometry(&self, geometry: SoftwareGeometry) {
        if let Some(slot) = self.state.borrow_mut().geometries.get_mut(geometry.0) {
            *slot = None;
        }
    }

    fn color_slot(&self, program: SoftwareProgram) -> Option<SoftwareColorSlot> {
        let state = self.state.borrow();
        let record = state.programs.get(program.0)?.as_ref()?;
        let declared = record.fragment.contains(COLOR_UNIFORM);
        declared.then_some(SoftwareColorSlot(program))
    }

    fn draw(&self, call: DrawCall<'_, Self>) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        if state.lost {
            return Err(RenderError::ContextLost);
        }
        if !matches!(state.programs.get(call.program.0), Some(Some(_))) {
            return Err(RenderError::DrawFailed("program is not linked".into()));
        }
        if call.color_slot.0 != call.program {
            return Err(RenderError::DrawFailed(
                "uniform location does not belong to the bound program".into(),
            ));
        }

        let State {
            geometries,
            texels,
            last_color,
            ..
        } = &mut *state;

        let positions = geometries
            .get(call.geometry.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| RenderError::DrawFailed("geometry was deleted".into()))?;
        let count = call.vertex_count.min(positions.len());

        texels.fill(quantize(call.clear_color));
        fill_triangles(
            texels,
            self.width,
            self.height,
            &positions[..count],
            quantize(call.color),
        );
        *last_color = Some(call.color);

        Ok(())
    }
}
