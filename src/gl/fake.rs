//! In-memory [`GlApi`] that records every call, for tests.
//!
//! A stage containing a line `#error <message>` fails to compile with
//! `<message>` as its log. A line `// link-error: <message>` fails the link.

use std::collections::HashMap;

use super::{GlApi, ProgramId, QuadMesh, UniformLocation};
use crate::shader::{GlslProfile, ShaderError, ShaderSources, ShaderStage};
use crate::uniforms::UniformValue;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CompileProgram(ProgramId),
    DeleteProgram(ProgramId),
    UploadQuad(usize),
    DeleteQuad(QuadMesh),
    EnableBlending,
    Viewport(i32, i32),
    Clear([f32; 3]),
    UseProgram(ProgramId),
    SetUniform(UniformLocation, UniformValue),
    Draw(QuadMesh),
}

#[derive(Debug)]
pub struct FakeGl {
    pub calls: Vec<GlCall>,
    pub version: String,
    pub profile: GlslProfile,
    next_name: u32,
    live: HashMap<ProgramId, ShaderSources>,
}

impl Default for FakeGl {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            version: "4.60 FakeGL".to_owned(),
            profile: GlslProfile::Desktop,
            next_name: 1,
            live: HashMap::new(),
        }
    }
}

const LOCATION_STRIDE: i32 = 100;

impl FakeGl {
    fn next_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    pub fn is_live(&self, program: ProgramId) -> bool {
        self.live.contains_key(&program)
    }

    /// The program a location handed out by this fake belongs to.
    pub fn program_of(location: UniformLocation) -> ProgramId {
        ProgramId((location.0 / LOCATION_STRIDE) as u32)
    }

    pub fn uniform_values(&self) -> Vec<(UniformLocation, UniformValue)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::SetUniform(location, value) => Some((*location, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GlCall::Draw(_)))
            .count()
    }

    fn directive<'a>(source: &'a str, prefix: &str) -> Option<&'a str> {
        source
            .lines()
            .find_map(|line| line.trim().strip_prefix(prefix))
            .map(str::trim)
    }
}

impl GlApi for FakeGl {
    fn glsl_profile(&self) -> GlslProfile {
        self.profile
    }

    fn compile_program(&mut self, sources: &ShaderSources) -> Result<ProgramId, ShaderError> {
        for (stage, source) in [
            (ShaderStage::Vertex, &sources.vertex),
            (ShaderStage::Fragment, &sources.fragment),
        ] {
            if let Some(log) = Self::directive(source, "#error") {
                return Err(ShaderError::Compile {
                    stage,
                    log: log.to_owned(),
                });
            }
        }
        if let Some(log) = Self::directive(&sources.fragment, "// link-error:") {
            return Err(ShaderError::Link {
                log: log.to_owned(),
            });
        }

        let program = ProgramId(self.next_name());
        self.live.insert(program, sources.clone());
        self.calls.push(GlCall::CompileProgram(program));
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.live.remove(&program);
        self.calls.push(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let sources = self.live.get(&program)?;
        let needle = format!(" {name};");
        let index = [&sources.vertex, &sources.fragment]
            .iter()
            .flat_map(|s| s.lines())
            .filter(|line| line.trim_start().starts_with("uniform "))
            .position(|line| line.contains(&needle))?;
        Some(UniformLocation(
            program.0 as i32 * LOCATION_STRIDE + index as i32,
        ))
    }

    fn shading_language_version(&mut self) -> String {
        self.version.clone()
    }

    fn upload_quad(&mut self, vertices: &[f32]) -> QuadMesh {
        self.calls.push(GlCall::UploadQuad(vertices.len()));
        QuadMesh {
            vao: self.next_name(),
            vbo: self.next_name(),
            vertex_count: (vertices.len() / 3) as i32,
        }
    }

    fn delete_quad(&mut self, mesh: QuadMesh) {
        self.calls.push(GlCall::DeleteQuad(mesh));
    }

    fn enable_alpha_blending(&mut self) {
        self.calls.push(GlCall::EnableBlending);
    }

    fn viewport(&mut self, width: i32, height: i32) {
        self.calls.push(GlCall::Viewport(width, height));
    }

    fn clear(&mut self, color: [f32; 3]) {
        self.calls.push(GlCall::Clear(color));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(GlCall::UseProgram(program));
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        self.calls.push(GlCall::SetUniform(location, value));
    }

    fn draw_triangles(&mut self, mesh: &QuadMesh) {
        self.calls.push(GlCall::Draw(*mesh));
    }
}
