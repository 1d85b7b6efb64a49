//! The four uniforms fed to the shader every frame, and their bindings.

use crate::gl::{GlApi, ProgramId, UniformLocation};

/// A value pushed to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `float` in GLSL
    Float(f32),
    /// `vec2` in GLSL
    Vec2([f32; 2]),
    /// `vec3` in GLSL
    Vec3([f32; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformName {
    Resolution,
    Time,
    DisplayScaleFactor,
    BackgroundColor,
}

impl UniformName {
    pub const ALL: [UniformName; 4] = [
        UniformName::Resolution,
        UniformName::Time,
        UniformName::DisplayScaleFactor,
        UniformName::BackgroundColor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UniformName::Resolution => "resolution",
            UniformName::Time => "time",
            UniformName::DisplayScaleFactor => "displayScaleFactor",
            UniformName::BackgroundColor => "backgroundColor",
        }
    }
}

/// Host-side values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Device pixels.
    pub resolution: [f32; 2],
    /// Seconds.
    pub time: f32,
    pub display_scale_factor: f32,
    /// Linear 0..1 RGB.
    pub background_color: [f32; 3],
}

impl FrameUniforms {
    fn value_of(&self, name: UniformName) -> UniformValue {
        match name {
            UniformName::Resolution => UniformValue::Vec2(self.resolution),
            UniformName::Time => UniformValue::Float(self.time),
            UniformName::DisplayScaleFactor => UniformValue::Float(self.display_scale_factor),
            UniformName::BackgroundColor => UniformValue::Vec3(self.background_color),
        }
    }
}

/// One named uniform and the program it currently points into.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBinding {
    name: UniformName,
    connection: Option<(ProgramId, Option<UniformLocation>)>,
}

impl UniformBinding {
    pub fn new(name: UniformName) -> Self {
        Self {
            name,
            connection: None,
        }
    }

    pub fn name(&self) -> UniformName {
        self.name
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.connection.map(|(program, _)| program)
    }

    pub fn location(&self) -> Option<UniformLocation> {
        self.connection.and_then(|(_, location)| location)
    }

    pub fn connect(&mut self, gl: &mut dyn GlApi, program: ProgramId) {
        let location = gl.uniform_location(program, self.name.as_str());
        if location.is_none() {
            log::debug!("uniform `{}` is not used by program {}", self.name.as_str(), program.0);
        }
        self.connection = Some((program, location));
    }

    pub fn disconnect(&mut self) {
        self.connection = None;
    }
}

/// All four bindings. They are always moved between programs together.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSet {
    bindings: [UniformBinding; 4],
}

impl Default for UniformSet {
    fn default() -> Self {
        Self {
            bindings: UniformName::ALL.map(UniformBinding::new),
        }
    }
}

impl UniformSet {
    pub fn bindings(&self) -> &[UniformBinding] {
        &self.bindings
    }

    pub fn disconnect_all(&mut self) {
        for binding in &mut self.bindings {
            binding.disconnect();
        }
    }

    pub fn connect_all(&mut self, gl: &mut dyn GlApi, program: ProgramId) {
        for binding in &mut self.bindings {
            binding.connect(gl, program);
        }
    }

    /// Pushes `frame` to every binding that resolved to a location in
    /// `program`. Bindings pointing anywhere else are skipped.
    pub fn apply(&self, gl: &mut dyn GlApi, program: ProgramId, frame: &FrameUniforms) {
        for binding in &self.bindings {
            if binding.program() != Some(program) {
                continue;
            }
            if let Some(location) = binding.location() {
                gl.set_uniform(location, frame.value_of(binding.name()));
            }
        }
    }
}
