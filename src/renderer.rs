//! Per-context rendering: what happens when a context appears, on every
//! frame, and when the context goes away.

use std::time::Duration;

use crate::gl::{GlApi, QuadMesh};
use crate::pipeline::ShaderPipeline;
use crate::shader::ShaderSources;
use crate::uniforms::FrameUniforms;

/// Two triangles covering clip space, 3 floats per vertex.
pub const QUAD_VERTICES: [f32; 18] = [
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    1.0, 1.0, 0.0, //
    -1.0, -1.0, 0.0, //
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, //
];

/// Logical size of the surface and the display scale it is shown at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub width: i32,
    pub height: i32,
    pub scale: f32,
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
        }
    }
}

impl SurfaceMetrics {
    pub fn new(width: i32, height: i32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    /// Viewport in device pixels.
    pub fn viewport(&self) -> (i32, i32) {
        (
            (self.scale * self.width as f32).round() as i32,
            (self.scale * self.height as f32).round() as i32,
        )
    }

    pub fn resolution(&self) -> [f32; 2] {
        let (width, height) = self.viewport();
        [width as f32, height as f32]
    }
}

/// Everything the host knows about the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub metrics: SurfaceMetrics,
    pub elapsed: Duration,
    pub background_color: [f32; 3],
}

impl FrameContext {
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            resolution: self.metrics.resolution(),
            time: self.elapsed.as_secs_f32(),
            display_scale_factor: self.metrics.scale,
            background_color: self.background_color,
        }
    }
}

/// Callbacks driven by a context's lifetime.
pub trait Renderer {
    fn context_created(&mut self, gl: &mut dyn GlApi);
    fn render(&mut self, gl: &mut dyn GlApi, frame: &FrameContext);
    fn context_closing(&mut self, gl: &mut dyn GlApi);
}

pub type StatusSink = Box<dyn FnMut(String)>;

/// Draws the fixed quad with the fixed shader pair.
pub struct QuadRenderer {
    /// `None` draws with the built-in pair for the context's profile.
    sources: Option<ShaderSources>,
    pipeline: ShaderPipeline,
    mesh: Option<QuadMesh>,
    on_status: StatusSink,
}

impl QuadRenderer {
    /// `on_status` receives the status line after every compile attempt.
    pub fn new(on_status: StatusSink) -> Self {
        Self {
            sources: None,
            pipeline: ShaderPipeline::default(),
            mesh: None,
            on_status,
        }
    }

    pub fn with_sources(sources: ShaderSources, on_status: StatusSink) -> Self {
        Self {
            sources: Some(sources),
            pipeline: ShaderPipeline::default(),
            mesh: None,
            on_status,
        }
    }

    pub fn pipeline(&self) -> &ShaderPipeline {
        &self.pipeline
    }

    pub fn mesh(&self) -> Option<QuadMesh> {
        self.mesh
    }

    pub fn compile(&mut self, gl: &mut dyn GlApi) {
        let builtin;
        let sources = match &self.sources {
            Some(sources) => sources,
            None => {
                builtin = ShaderSources::builtin(gl.glsl_profile());
                &builtin
            }
        };
        let status = match self.pipeline.rebuild(gl, sources) {
            Ok(status) => status,
            Err(e) => e.to_string(),
        };
        (self.on_status)(status);
    }
}

impl Renderer for QuadRenderer {
    fn context_created(&mut self, gl: &mut dyn GlApi) {
        self.compile(gl);
        if self.mesh.is_none() {
            self.mesh = Some(gl.upload_quad(&QUAD_VERTICES));
        }
        gl.enable_alpha_blending();
    }

    fn render(&mut self, gl: &mut dyn GlApi, frame: &FrameContext) {
        let (width, height) = frame.metrics.viewport();
        gl.viewport(width, height);
        gl.clear(frame.background_color);

        let Some(mesh) = self.mesh else {
            return;
        };
        if self.pipeline.bind(gl, &frame.uniforms()) {
            gl.draw_triangles(&mesh);
        }
    }

    fn context_closing(&mut self, gl: &mut dyn GlApi) {
        self.pipeline.release(gl);
        if let Some(mesh) = self.mesh.take() {
            gl.delete_quad(mesh);
        }
    }
}
