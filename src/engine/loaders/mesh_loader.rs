use std::path::Path;

use crate::engine::components::TriangleMesh;
use crate::engine::error::{ViewerError, ViewerResult};

const SPHERE_RADIUS: f32 = 1.0;
const SPHERE_STACKS: u32 = 32;
const SPHERE_SLICES: u32 = 64;

/// Produces a validated mesh for `path`, dispatching on its extension:
/// `null`/`sphere` build the procedural sphere, `gltf`/`glb` import the
/// first primitive of the first mesh.
pub fn read_mesh(path: &Path) -> ViewerResult<TriangleMesh> {
    let extension = model_extension(path);
    let mesh = match extension.as_str() {
        "null" | "sphere" => TriangleMesh::sphere(SPHERE_RADIUS, SPHERE_STACKS, SPHERE_SLICES),
        "gltf" | "glb" => read_gltf(path)?,
        other => return Err(ViewerError::UnsupportedModelFormat(other.to_string())),
    };

    mesh.validate()?;
    Ok(mesh)
}

/// True for model paths that name the built-in sphere rather than a file.
pub fn is_procedural(path: &Path) -> bool {
    matches!(model_extension(path).as_str(), "null" | "sphere")
}

/// Lowercased extension, treating a bare ".null" as extension "null".
fn model_extension(path: &Path) -> String {
    path.extension()
        .or_else(|| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix('.'))
                .map(std::ffi::OsStr::new)
        })
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_gltf(path: &Path) -> ViewerResult<TriangleMesh> {
    let (document, buffers, _images) = gltf::import(path)
        .map_err(|source| ViewerError::ModelImport { path: path.to_path_buf(), source })?;

    let primitive = document
        .meshes()
        .next()
        .and_then(|mesh| mesh.primitives().next())
        .ok_or_else(|| ViewerError::InvalidMesh(format!("{} contains no mesh", path.display())))?;

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return Err(ViewerError::InvalidMesh(format!(
            "{} uses {:?} primitives, only triangles are drawn",
            path.display(),
            primitive.mode()
        )));
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let positions: Vec<f32> = reader
        .read_positions()
        .ok_or_else(|| ViewerError::InvalidMesh(format!("{} has no positions", path.display())))?
        .flatten()
        .collect();
    let vertex_count = positions.len() / 3;

    let normals: Vec<f32> = reader
        .read_normals()
        .ok_or_else(|| ViewerError::InvalidMesh(format!("{} has no normals", path.display())))?
        .flatten()
        .collect();

    let tex_coords: Vec<f32> = match reader.read_tex_coords(0) {
        Some(coords) => coords.into_f32().flatten().collect(),
        None => {
            log::warn!("{} has no texture coordinates, using zeros", path.display());
            vec![0.0; vertex_count * 2]
        }
    };

    let faces: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertex_count as u32).collect(),
    };

    log::info!(
        "imported {} ({} vertices, {} faces)",
        path.display(),
        vertex_count,
        faces.len() / 3
    );
    Ok(TriangleMesh::new(positions, normals, tex_coords, faces))
}
