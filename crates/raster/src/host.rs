//! A [`SurfaceHost`] whose surfaces are plain in-memory framebuffers.

use crate::backend::SoftwareBackend;
use std::cell::Cell;
use std::collections::BTreeMap;
use triangle_viewer_core::{InitError, SurfaceHost};

/// Largest framebuffer a software surface may allocate, in texels
/// (16384 x 16384, 1 GiB of RGBA8).
pub const MAX_SURFACE_TEXELS: usize = 16384 * 16384;

/// A table of named software surfaces and their sizes in pixels.
#[derive(Debug, Default)]
pub struct SoftwareHost {
    surfaces: BTreeMap<String, (u32, u32)>,
    created: Cell<usize>,
}

impl SoftwareHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface and returns the host, for chaining.
    pub fn with_surface(mut self, id: impl Into<String>, width: u32, height: u32) -> Self {
        self.add_surface(id, width, height);
        self
    }

    /// Adds or resizes a surface.
    pub fn add_surface(&mut self, id: impl Into<String>, width: u32, height: u32) {
        self.surfaces.insert(id.into(), (width, height));
    }

    /// Names of all registered surfaces, sorted.
    pub fn surface_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    /// How many backends this host has handed out.
    pub fn backends_created(&self) -> usize {
        self.created.get()
    }
}

impl SurfaceHost for SoftwareHost {
    type Backend = SoftwareBackend;

    fn create_backend(&self, surface_id: &str) -> Result<SoftwareBackend, InitError> {
        let &(width, height) = self
            .surfaces
            .get(surface_id)
            .ok_or_else(|| InitError::SurfaceNotFound(surface_id.to_owned()))?;

        if width == 0 || height == 0 {
            return Err(InitError::ContextCreationError(format!(
                "surface '{surface_id}' has zero area ({width}x{height})"
            )));
        }

        let texels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= MAX_SURFACE_TEXELS)
            .ok_or_else(|| {
                InitError::ContextCreationError(format!(
                    "surface '{surface_id}' is too large ({width}x{height})"
                ))
            })?;
        log::debug!("allocating {texels} texels for '{surface_id}'");

        self.created.set(self.created.get() + 1);
        Ok(SoftwareBackend::new(width, height))
    }
}
