use crate::gl::{GlApi, ProgramId};
use crate::shader::{ShaderError, ShaderSources, linked_status};
use crate::uniforms::{FrameUniforms, UniformSet};

/// The active program and the uniforms bound into it.
///
/// Uniforms only ever move as a block, and only after a new program linked,
/// so they never point into a program that is gone or unlinked.
#[derive(Debug, Default)]
pub struct ShaderPipeline {
    program: Option<ProgramId>,
    uniforms: UniformSet,
}

impl ShaderPipeline {
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// Tries to replace the active program with one built from `sources`.
    ///
    /// Returns the status line for the outcome: the GLSL version on success,
    /// the driver's diagnostic on failure. On failure the previous program
    /// stays active.
    pub fn rebuild(
        &mut self,
        gl: &mut dyn GlApi,
        sources: &ShaderSources,
    ) -> Result<String, ShaderError> {
        let program = match gl.compile_program(sources) {
            Ok(program) => program,
            Err(e) => {
                match e.stage() {
                    Some(stage) => log::warn!("{stage} shader failed to compile: {e}"),
                    None => log::warn!("shader program failed to link: {e}"),
                }
                return Err(e);
            }
        };

        self.uniforms.disconnect_all();
        if let Some(old) = self.program.replace(program) {
            gl.delete_program(old);
        }
        self.uniforms.connect_all(gl, program);

        let status = linked_status(&gl.shading_language_version());
        log::info!("linked shader program {}: {status}", program.0);
        Ok(status)
    }

    /// Binds the program and pushes `frame`. Returns `false` when nothing has
    /// linked yet.
    pub fn bind(&self, gl: &mut dyn GlApi, frame: &FrameUniforms) -> bool {
        let Some(program) = self.program else {
            return false;
        };
        gl.use_program(program);
        self.uniforms.apply(gl, program, frame);
        true
    }

    pub fn release(&mut self, gl: &mut dyn GlApi) {
        self.uniforms.disconnect_all();
        if let Some(program) = self.program.take() {
            gl.delete_program(program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::fake::{FakeGl, GlCall};
    use crate::shader::GlslProfile;

    fn good() -> ShaderSources {
        ShaderSources::builtin(GlslProfile::Desktop)
    }

    fn broken() -> ShaderSources {
        let mut sources = good();
        sources.fragment.push_str("\n#error 0:12(3): error: `colour' undeclared\n");
        sources
    }

    #[test]
    fn successful_build_activates_program() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();

        let status = pipeline.rebuild(&mut gl, &good()).unwrap();

        assert_eq!(status, "GLSL: v4.60");
        let program = pipeline.program().unwrap();
        assert!(gl.is_live(program));
        assert!(
            pipeline
                .uniforms()
                .bindings()
                .iter()
                .all(|b| b.program() == Some(program) && b.location().is_some())
        );
    }

    #[test]
    fn failed_build_keeps_previous_program() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();
        pipeline.rebuild(&mut gl, &good()).unwrap();
        let before = pipeline.program();

        let err = pipeline.rebuild(&mut gl, &broken()).unwrap_err();

        assert_eq!(err.to_string(), "0:12(3): error: `colour' undeclared");
        assert_eq!(pipeline.program(), before);
        assert!(gl.is_live(before.unwrap()));
        assert!(
            pipeline
                .uniforms()
                .bindings()
                .iter()
                .all(|b| b.program() == before)
        );
    }

    #[test]
    fn failed_first_build_leaves_nothing_bound() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();

        assert!(pipeline.rebuild(&mut gl, &broken()).is_err());
        assert_eq!(pipeline.program(), None);

        let frame = FrameUniforms {
            resolution: [1.0, 1.0],
            time: 0.0,
            display_scale_factor: 1.0,
            background_color: [0.0; 3],
        };
        assert!(!pipeline.bind(&mut gl, &frame));
        assert!(gl.calls.is_empty());
    }

    #[test]
    fn link_failure_reports_linker_log() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();
        let mut sources = good();
        sources.fragment.push_str("\n// link-error: error: fragment output not written\n");

        let err = pipeline.rebuild(&mut gl, &sources).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert_eq!(err.to_string(), "error: fragment output not written");
    }

    #[test]
    fn uniforms_follow_only_the_latest_program() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();
        let mut programs = Vec::new();

        for _ in 0..5 {
            pipeline.rebuild(&mut gl, &good()).unwrap();
            programs.push(pipeline.program().unwrap());
        }

        let last = *programs.last().unwrap();
        for binding in pipeline.uniforms().bindings() {
            assert_eq!(binding.program(), Some(last));
            assert_eq!(FakeGl::program_of(binding.location().unwrap()), last);
        }
        // every superseded program was deleted
        for old in &programs[..programs.len() - 1] {
            assert!(!gl.is_live(*old));
            assert!(gl.calls.contains(&GlCall::DeleteProgram(*old)));
        }
    }

    #[test]
    fn release_deletes_program_and_unbinds() {
        let mut gl = FakeGl::default();
        let mut pipeline = ShaderPipeline::default();
        pipeline.rebuild(&mut gl, &good()).unwrap();
        let program = pipeline.program().unwrap();

        pipeline.release(&mut gl);

        assert!(!gl.is_live(program));
        assert_eq!(pipeline.program(), None);
        assert!(pipeline.uniforms().bindings().iter().all(|b| b.program().is_none()));
    }
}
