use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by the viewer core. Only shader failures are fatal; the
/// viewer logs and swallows the rest.
#[derive(Debug)]
pub enum ViewerError {
    Io { path: PathBuf, source: std::io::Error },
    ImageDecode { path: PathBuf, source: image::ImageError },
    MissingCubeMapFace { dir: PathBuf, face: &'static str },
    ShaderCompile { path: PathBuf, log: String },
    ProgramLink { vertex: PathBuf, fragment: PathBuf, log: String },
    Gpu(String),
    InvalidMesh(String),
    UnsupportedModelFormat(String),
    ModelImport { path: PathBuf, source: gltf::Error },
    Config { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ViewerError::ImageDecode { path, source } => {
                write!(f, "failed to decode image {}: {}", path.display(), source)
            }
            ViewerError::MissingCubeMapFace { dir, face } => {
                write!(f, "cube map {} has no '{}' face", dir.display(), face)
            }
            ViewerError::ShaderCompile { path, log } => {
                write!(f, "shader {} failed to compile: {}", path.display(), log)
            }
            ViewerError::ProgramLink { vertex, fragment, log } => {
                write!(
                    f,
                    "program ({}, {}) failed to link: {}",
                    vertex.display(),
                    fragment.display(),
                    log
                )
            }
            ViewerError::Gpu(msg) => write!(f, "GPU error: {}", msg),
            ViewerError::InvalidMesh(msg) => write!(f, "invalid mesh: {}", msg),
            ViewerError::UnsupportedModelFormat(ext) => {
                write!(f, "unsupported model format '{}'", ext)
            }
            ViewerError::ModelImport { path, source } => {
                write!(f, "failed to import {}: {}", path.display(), source)
            }
            ViewerError::Config { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io { source, .. } => Some(source),
            ViewerError::ImageDecode { source, .. } => Some(source),
            ViewerError::ModelImport { source, .. } => Some(source),
            ViewerError::Config { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<String> for ViewerError {
    fn from(msg: String) -> Self {
        ViewerError::Gpu(msg)
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
