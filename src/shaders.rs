use std::path::{Path, PathBuf};

use thiserror::Error;

pub const QUAD_VERT: &str = include_str!("gl_shaders/quad.glsl");
pub const SOLID_FRAG: &str = include_str!("gl_shaders/solid.glsl");

#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: QUAD_VERT.to_string(),
            fragment: SOLID_FRAG.to_string(),
        }
    }
}

impl ShaderSources {
    /// Built-in sources, with either stage replaced by a file when given.
    pub fn load(vertex: Option<&Path>, fragment: Option<&Path>) -> Result<Self, ShaderFileError> {
        let mut sources = Self::default();

        if let Some(path) = vertex {
            sources.vertex = read_source(path)?;
        }

        if let Some(path) = fragment {
            sources.fragment = read_source(path)?;
        }

        Ok(sources)
    }
}

fn read_source(path: &Path) -> Result<String, ShaderFileError> {
    std::fs::read_to_string(path).map_err(|source| ShaderFileError {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
#[error("Cannot read shader file {path:?}: {source}")]
pub struct ShaderFileError {
    path: PathBuf,
    source: std::io::Error,
}
