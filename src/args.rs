use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
pub struct Args {
    /// TOML file with window and render settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// Draw filled triangles instead of outlines
    #[arg(long)]
    pub fill: bool,
    /// GLSL file replacing the built-in vertex shader
    #[arg(long)]
    pub vertex_shader: Option<PathBuf>,
    /// GLSL file replacing the built-in fragment shader
    #[arg(long)]
    pub fragment_shader: Option<PathBuf>,
    /// Maximum level of log messages
    #[arg(long, value_enum, default_value_t = LogLevelArg::Info)]
    pub log_level: LogLevelArg,
}

impl Args {
    /// Command line wins over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.window.width = width;
        }

        if let Some(height) = self.height {
            config.window.height = height;
        }

        if self.fill {
            config.render.wireframe = false;
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(l: LogLevelArg) -> Self {
        match l {
            LogLevelArg::Off => Self::Off,
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}
