use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    /// Outline triangles instead of filling them
    pub wireframe: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            wireframe: true,
        }
    }
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;

        Self::parse(&src)
    }

    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(src)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.window.width,
                height: self.window.height,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config structure: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Window size {width}x{height} must not be zero")]
    ZeroSize { width: u32, height: u32 },
}
