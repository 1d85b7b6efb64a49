//! Shader sources and compile diagnostics.

use std::fmt;

use thiserror::Error;

const BASIC_VERTEX: &str = include_str!("../shaders/basic_vertex.glsl");
const BLOB_FRAGMENT: &str = include_str!("../shaders/blob.glsl");

/// Name the vertex shader's position input is bound to before linking.
pub const POSITION_ATTRIBUTE: &str = "position";

/// GTK can hand out either a desktop GL or a GLES context, and the GLSL
/// header differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslProfile {
    Desktop,
    Es,
}

impl GlslProfile {
    pub fn header(self) -> &'static str {
        match self {
            GlslProfile::Desktop => "#version 150 core\n",
            GlslProfile::Es => "#version 300 es\nprecision highp float;\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// A failed attempt at building a program.
///
/// The `Display` output is the driver's diagnostic text, untouched, since
/// that is what ends up in the status label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("{log}")]
    Link { log: String },
}

impl ShaderError {
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            ShaderError::Compile { stage, .. } => Some(*stage),
            ShaderError::Link { .. } => None,
        }
    }
}

/// A complete vertex + fragment pair, headers included.
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

    /// The fixed pair this component draws with.
    pub fn builtin(profile: GlslProfile) -> Self {
        let header = profile.header();
        Self::new(
            format!("{header}{BASIC_VERTEX}"),
            format!("{header}{BLOB_FRAGMENT}"),
        )
    }
}

/// Pulls the numeric version out of a `GL_SHADING_LANGUAGE_VERSION` string.
///
/// Drivers prefix and suffix it freely (`"4.60 NVIDIA"`,
/// `"OpenGL ES GLSL ES 3.20"`), so the first token that parses wins.
pub fn parse_language_version(raw: &str) -> Option<f64> {
    raw.split_whitespace()
        .find_map(|token| token.parse::<f64>().ok())
}

/// Status line shown after a successful link.
pub fn linked_status(raw_version: &str) -> String {
    let version = parse_language_version(raw_version).unwrap_or(0.0);
    format!("GLSL: v{version:.2}")
}
