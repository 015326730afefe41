//! Viewer configuration read from JSON.
//!
//! Every field is optional in the JSON text; missing keys take their
//! defaults and unknown keys are ignored, so `{}` is a valid config.

use crate::color::{Rgba, RED, TRANSPARENT};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings applied when a context is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Color the surface is cleared to before each draw.
    pub clear_color: Rgba,
    /// Color drawn when the caller does not supply one.
    pub initial_color: Rgba,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            clear_color: TRANSPARENT,
            initial_color: RED,
        }
    }
}

impl ViewerConfig {
    /// Parses a config from JSON text.
    ///
    /// Returns `ConfigError::InvalidConfig` if the text is not a JSON
    /// object or a present key has the wrong shape.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a config from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the config as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "clear_color": self.clear_color,
            "initial_color": self.initial_color,
        })
    }
}
