//! The seam between the renderer and an OpenGL binding.
//!
//! Everything the component asks of the GPU goes through [`GlApi`]. The
//! production implementation is [`EpoxyGl`], which calls straight into
//! libepoxy while a `GLArea` context is current.

use crate::shader::{GlslProfile, ShaderError, ShaderSources};
use crate::uniforms::UniformValue;

mod epoxy_gl;
#[cfg(test)]
pub(crate) mod fake;

pub use epoxy_gl::{EpoxyGl, load_epoxy};

/// Name of a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Location of a uniform inside one particular program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// GPU objects backing the static quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadMesh {
    pub vao: u32,
    pub vbo: u32,
    pub vertex_count: i32,
}

pub trait GlApi {
    /// Which GLSL dialect the current context speaks.
    fn glsl_profile(&self) -> GlslProfile;

    /// Compiles both stages and links them. On failure nothing is left behind
    /// on the GPU.
    fn compile_program(&mut self, sources: &ShaderSources) -> Result<ProgramId, ShaderError>;

    fn delete_program(&mut self, program: ProgramId);

    /// `None` when the program does not use (or the linker dropped) the uniform.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Raw `GL_SHADING_LANGUAGE_VERSION` string.
    fn shading_language_version(&mut self) -> String;

    /// Uploads position-only vertices (3 floats each) and wires attribute 0.
    fn upload_quad(&mut self, vertices: &[f32]) -> QuadMesh;

    fn delete_quad(&mut self, mesh: QuadMesh);

    fn enable_alpha_blending(&mut self);

    fn viewport(&mut self, width: i32, height: i32);

    fn clear(&mut self, color: [f32; 3]);

    fn use_program(&mut self, program: ProgramId);

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    fn draw_triangles(&mut self, mesh: &QuadMesh);
}
