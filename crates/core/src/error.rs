//! Error types for the triangle viewer core.

use crate::shader::{ShaderError, ShaderStage};
use thiserror::Error;

/// Errors produced while initializing a graphics context for a surface.
///
/// All variants are fatal to initialization. A surface whose initialization
/// failed keeps the error and reports it again on every later attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// The identifier was empty or did not resolve to a drawing surface.
    #[error("surface not found: '{0}'")]
    SurfaceNotFound(String),

    /// The surface already has a live context.
    #[error("surface already initialized: '{0}'")]
    AlreadyInitialized(String),

    /// The backend refused to create a drawing context or one of its
    /// fixed resources (vertex buffer, color uniform).
    #[error("context creation failed: {0}")]
    ContextCreationError(String),

    /// A shader stage was rejected by the backend compiler.
    #[error("shader compile error ({stage}):\n{log}")]
    ShaderCompileError {
        /// The stage that failed.
        stage: ShaderStage,
        /// Numbered source followed by the backend's info log.
        log: String,
    },

    /// The compiled stages could not be linked into a program.
    #[error("shader link error:\n{0}")]
    ShaderLinkError(String),
}

impl From<ShaderError> for InitError {
    fn from(e: ShaderError) -> Self {
        match e {
            ShaderError::CompileError { stage, log } => InitError::ShaderCompileError { stage, log },
            ShaderError::LinkError(log) => InitError::ShaderLinkError(log),
        }
    }
}

/// Errors produced by a single draw call.
///
/// A render error does not invalidate the context; the caller decides
/// whether to keep drawing or to re-create it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The backend reported an error after issuing the draw.
    #[error("draw call failed: {0}")]
    DrawFailed(String),

    /// The backend lost its graphics context.
    #[error("graphics context lost")]
    ContextLost,
}

/// Errors produced while reading viewer configuration or color input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration text was not valid JSON for a `ViewerConfig`.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color list did not have three or four channels.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidConfig(e.to_string())
    }
}
