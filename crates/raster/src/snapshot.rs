//! PNG output of a software frame.
//!
//! Feature-gated behind `png` (default on) so that consumers that only need
//! the rasterizer do not pull in the `image` crate.

use crate::backend::SoftwareBackend;
use std::path::Path;
use thiserror::Error;
use triangle_viewer_core::Backend;

/// Errors produced while writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The frame buffer did not match the surface dimensions.
    #[error("frame buffer size mismatch for {width}x{height} surface")]
    BufferMismatch { width: u32, height: u32 },

    /// Encoding or writing the file failed.
    #[error("failed to write PNG: {0}")]
    Io(String),
}

/// Writes the backend's current frame as a PNG image.
pub fn write_png(backend: &SoftwareBackend, path: &Path) -> Result<(), SnapshotError> {
    let (width, height) = backend.surface_size();
    let img = image::RgbaImage::from_raw(width, height, backend.frame_rgba8())
        .ok_or(SnapshotError::BufferMismatch { width, height })?;
    img.save(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
    log::debug!("wrote {width}x{height} snapshot to {}", path.display());
    Ok(())
}
