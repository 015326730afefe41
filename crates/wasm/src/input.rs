//! Conversion of values arriving from JavaScript into core types.
//!
//! Kept free of `web-sys` so it can be tested natively.

use triangle_viewer_core::color::rgba_from_slice;
use triangle_viewer_core::{ConfigError, Rgba, ViewerConfig};

/// Picks the color to draw: the given channels, or `default` when the
/// caller passed nothing.
///
/// Returns `ConfigError::InvalidColor` unless exactly four channels are given.
pub fn resolve_color(channels: Option<&[f32]>, default: Rgba) -> Result<Rgba, ConfigError> {
    channels.map_or(Ok(default), rgba_from_slice)
}

/// Parses the optional config JSON passed to `initialize`.
pub fn parse_config(json: Option<&str>) -> Result<ViewerConfig, ConfigError> {
    match json {
        Some(text) if !text.trim().is_empty() => ViewerConfig::from_json(text),
        _ => Ok(ViewerConfig::default()),
    }
}
