//! Shader sources, stage naming and compile-error formatting.
//!
//! Everything here is pure string handling so that every backend, GPU or
//! software, reports shader failures the same way. The GL compile and link
//! calls live in [`crate::render::shader`].

use std::fmt;
use thiserror::Error;

/// Name of the vertex position attribute in [`VERTEX_SHADER`].
pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Name of the color uniform in [`FRAGMENT_SHADER`].
pub const COLOR_UNIFORM: &str = "u_color";

/// GLSL ES 3.0 vertex shader: passes clip-space positions straight through.
pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
void main() {
    gl_Position = vec4(a_position, 1.0);
}
"#;

/// GLSL ES 3.0 fragment shader: fills every fragment with `u_color`.
pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}
"#;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed.
        stage: ShaderStage,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// The vertex/fragment pair a context is built from.
///
/// [`ShaderSources::default`] is the fixed triangle pair; other sources are
/// only useful for exercising a backend's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Returns the source for the given stage.
    pub fn source(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::new(VERTEX_SHADER, FRAGMENT_SHADER)
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`, so that line references in the log
/// can be matched against the GLSL. Either argument may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Returns the driver log, or a generic message when the driver gave none.
pub fn info_log_or_unknown(log: String, what: &str) -> String {
    if log.trim().is_empty() {
        format!("unknown error {what}")
    } else {
        log
    }
}
