//! Shader compilation and linking against a live `glow::Context`.

use crate::shader::{format_shader_error, info_log_or_unknown, ShaderError, ShaderSources, ShaderStage};

fn gl_shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` with the numbered source and the
/// driver's info log if the GLSL fails to compile.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We pass a valid shader type
    // and source string, and delete the shader on the failure path.
    let shader = unsafe {
        gl.create_shader(gl_shader_type(stage))
            .map_err(|e| ShaderError::CompileError { stage, log: e })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::CompileError {
            stage,
            log: format_shader_error(source, &info_log_or_unknown(info_log, "creating shader")),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// Shaders are detached after linking; the program keeps its own copies.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails.
#[allow(unsafe_code)]
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    // SAFETY: shader handles come from compile_shader on the same context.
    let program = unsafe { gl.create_program().map_err(ShaderError::LinkError)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    let linked = unsafe { gl.get_program_link_status(program) };

    if linked {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ShaderError::LinkError(info_log_or_unknown(
            info_log,
            "linking program",
        )))
    }
}

/// Compiles both stages of `sources` and links them into a program.
///
/// Shader objects are deleted after linking regardless of the outcome.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    sources: &ShaderSources,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_shader(gl, ShaderStage::Vertex, &sources.vertex)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, &sources.fragment) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid shader from a successful compile_shader call.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    // SAFETY: both handles are valid; a linked program does not need them.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_gl_shader_types() {
        assert_eq!(gl_shader_type(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(gl_shader_type(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn compile_program_links_fixed_shaders() {
        // Would test: compile_program(gl, &ShaderSources::default()) is Ok.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn compile_shader_reports_driver_log() {
        // Would test: a fragment source with a typo yields CompileError whose
        // log contains both numbered source lines and the driver message.
    }
}
