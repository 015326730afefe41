//! Conversion from float color channels to RGBA8 framebuffer texels.
//!
//! This mirrors what a fixed-point color attachment does with the value a
//! fragment shader writes: clamp to [0, 1], then scale and round to 8 bits.

use triangle_viewer_core::Rgba;

/// Quantizes one channel to 8 bits. `NaN` becomes 0.
pub fn quantize_channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Quantizes all four channels of a color.
pub fn quantize(color: Rgba) -> [u8; 4] {
    color.map(quantize_channel)
}

/// Flattens texels into a tightly packed RGBA8 byte buffer.
pub fn texels_to_bytes(texels: &[[u8; 4]]) -> Vec<u8> {
    texels.iter().flatten().copied().collect()
}
