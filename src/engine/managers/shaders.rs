use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::error::{ViewerError, ViewerResult};
use crate::engine::gpu::{GpuDevice, ProgramHandle, ShaderStage};

/// Fixed attribute locations shared by every program and every vertex array.
pub const VERTEX_ATTRIBUTE: u32 = 0;
pub const NORMAL_ATTRIBUTE: u32 = 1;
pub const TEX_COORD_ATTRIBUTE: u32 = 2;

pub const ATTRIBUTE_BINDINGS: [(u32, &str); 3] = [
    (VERTEX_ATTRIBUTE, "vertex"),
    (NORMAL_ATTRIBUTE, "normal"),
    (TEX_COORD_ATTRIBUTE, "texCoord"),
];

/// Vertex and fragment source files for one program slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderSource {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into() }
    }
}

pub fn read_shader_source(path: &Path) -> ViewerResult<String> {
    std::fs::read_to_string(path).map_err(|source| ViewerError::Io { path: path.to_path_buf(), source })
}

/// Reads, compiles and links one program with the fixed attribute
/// bindings. Nothing is left allocated on failure.
pub fn compile_program<D: GpuDevice>(
    gl: &D,
    vertex_path: &Path,
    fragment_path: &Path,
) -> ViewerResult<ProgramHandle> {
    let vertex_source = read_shader_source(vertex_path)?;
    let fragment_source = read_shader_source(fragment_path)?;

    let vs = gl
        .compile_shader(ShaderStage::Vertex, &vertex_source)
        .map_err(|log| ViewerError::ShaderCompile { path: vertex_path.to_path_buf(), log })?;
    let fs = match gl.compile_shader(ShaderStage::Fragment, &fragment_source) {
        Ok(fs) => fs,
        Err(log) => {
            gl.delete_shader(vs);
            return Err(ViewerError::ShaderCompile { path: fragment_path.to_path_buf(), log });
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(ViewerError::Gpu(e));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    for (index, name) in ATTRIBUTE_BINDINGS {
        gl.bind_attrib_location(program, index, name);
    }
    let linked = gl.link_program(program);

    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if let Err(log) = linked {
        gl.delete_program(program);
        return Err(ViewerError::ProgramLink {
            vertex: vertex_path.to_path_buf(),
            fragment: fragment_path.to_path_buf(),
            log,
        });
    }

    log::debug!("linked program {:?} from {}", program, vertex_path.display());
    Ok(program)
}
