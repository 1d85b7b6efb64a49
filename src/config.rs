//! Start-up configuration for [`GlComponent`](crate::GlComponent).

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlVersion {
    pub major: i32,
    pub minor: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusLabelConfig {
    pub font_size: f32,
    /// Margin around the label, logical pixels.
    pub inset: i32,
    pub height: i32,
}

impl Default for StatusLabelConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            inset: 4,
            height: 75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentConfig {
    pub gl_version: GlVersion,
    pub continuous_repaint: bool,
    pub background_color: [f32; 3],
    pub orientation_axis: [f32; 3],
    pub status_label: StatusLabelConfig,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            gl_version: GlVersion { major: 3, minor: 2 },
            continuous_repaint: true,
            background_color: [0.0, 0.0, 0.0],
            orientation_axis: [0.0, 1.0, 0.0],
            status_label: StatusLabelConfig::default(),
        }
    }
}

impl ComponentConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Background colour with every channel clamped to `0..=1`.
    pub fn clamped_background(&self) -> [f32; 3] {
        self.background_color.map(|c| c.clamp(0.0, 1.0))
    }
}
