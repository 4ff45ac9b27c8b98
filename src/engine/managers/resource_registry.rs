use std::path::{Path, PathBuf};

use crate::engine::components::skybox::{SKYBOX_INDICES, SKYBOX_VERTICES, SKYBOX_VERTEX_COUNT};
use crate::engine::components::TriangleMesh;
use crate::engine::error::{ViewerError, ViewerResult};
use crate::engine::gpu::{
    BufferHandle, CubeFace, GpuDevice, ImageTarget, ProgramHandle, SamplerParams, TextureHandle,
    TextureTarget, VertexArrayHandle,
};
use crate::engine::loaders::decode_image;
use crate::engine::managers::shaders::{
    compile_program, ShaderSource, NORMAL_ATTRIBUTE, TEX_COORD_ATTRIBUTE, VERTEX_ATTRIBUTE,
};

/// Five mesh programs followed by the sky program.
pub const PROGRAM_COUNT: usize = 6;
pub const SKY_PROGRAM_INDEX: usize = PROGRAM_COUNT - 1;

/// Face file names in upload order.
pub const CUBE_MAP_FACES: [(&str, CubeFace); 6] = [
    ("right", CubeFace::PositiveX),
    ("left", CubeFace::NegativeX),
    ("top", CubeFace::PositiveY),
    ("bottom", CubeFace::NegativeY),
    ("back", CubeFace::PositiveZ),
    ("front", CubeFace::NegativeZ),
];

const FACE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeMapSlot {
    Specular,
    Diffuse,
}

impl CubeMapSlot {
    pub const ALL: [CubeMapSlot; 2] = [CubeMapSlot::Specular, CubeMapSlot::Diffuse];

    fn index(self) -> usize {
        self as usize
    }

    pub fn texture_unit(self) -> u32 {
        match self {
            CubeMapSlot::Specular => 0,
            CubeMapSlot::Diffuse => 1,
        }
    }

    pub fn uniform_name(self) -> &'static str {
        match self {
            CubeMapSlot::Specular => "specular_map",
            CubeMapSlot::Diffuse => "diffuse_map",
        }
    }

    fn sampler_params(self) -> SamplerParams {
        match self {
            CubeMapSlot::Specular => SamplerParams::CUBE_MAP_MIPMAPPED,
            CubeMapSlot::Diffuse => SamplerParams::CUBE_MAP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Color,
    Roughness,
    Metalness,
    BrdfLut,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Color,
        TextureSlot::Roughness,
        TextureSlot::Metalness,
        TextureSlot::BrdfLut,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn texture_unit(self) -> u32 {
        self as u32
    }

    pub fn uniform_name(self) -> &'static str {
        match self {
            TextureSlot::Color => "color_map",
            TextureSlot::Roughness => "roughness_map",
            TextureSlot::Metalness => "metalness_map",
            TextureSlot::BrdfLut => "brdfLUT_map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    pub vao: VertexArrayHandle,
    pub positions: BufferHandle,
    pub normals: BufferHandle,
    pub tex_coords: BufferHandle,
    pub indices: BufferHandle,
    pub index_count: usize,
    pub vertex_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyboxBuffers {
    pub vao: VertexArrayHandle,
    pub vertices: BufferHandle,
    pub indices: BufferHandle,
    pub index_count: usize,
}

/// A texture handle plus whether its last load completed.
#[derive(Debug, Clone, Copy)]
struct TextureEntry {
    handle: TextureHandle,
    ready: bool,
}

/// Sole owner of every GPU object the viewer allocates. Each semantic slot
/// holds at most one live handle; reloads overwrite or swap in place.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    mesh: Option<MeshBuffers>,
    skybox: Option<SkyboxBuffers>,
    cube_maps: [Option<TextureEntry>; 2],
    textures: [Option<TextureEntry>; 4],
    programs: [Option<ProgramHandle>; PROGRAM_COUNT],
    released: bool,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a handle for every texture slot that lacks one.
    pub fn create_textures<D: GpuDevice>(&mut self, gl: &D) -> ViewerResult<()> {
        for entry in self.cube_maps.iter_mut().chain(self.textures.iter_mut()) {
            if entry.is_none() {
                *entry = Some(TextureEntry { handle: gl.create_texture()?, ready: false });
            }
        }
        Ok(())
    }

    /// Uploads `mesh` into a fresh vertex array. The previous mesh buffers
    /// are released only once the new ones exist, so a failure leaves the
    /// old mesh drawable and nothing half-built bound.
    pub fn create_mesh_buffers<D: GpuDevice>(
        &mut self,
        gl: &D,
        mesh: &TriangleMesh,
    ) -> ViewerResult<MeshBuffers> {
        mesh.validate()?;

        let vao = gl.create_vertex_array()?;
        let mut buffers = Vec::with_capacity(4);
        for _ in 0..4 {
            match gl.create_buffer() {
                Ok(buffer) => buffers.push(buffer),
                Err(e) => {
                    buffers.into_iter().for_each(|b| gl.delete_buffer(b));
                    gl.delete_vertex_array(vao);
                    return Err(ViewerError::Gpu(e));
                }
            }
        }
        let (positions, normals, tex_coords, indices) = (buffers[0], buffers[1], buffers[2], buffers[3]);

        gl.bind_vertex_array(Some(vao));

        gl.upload_vertex_buffer(positions, bytemuck::cast_slice(&mesh.positions));
        gl.vertex_attrib_f32(VERTEX_ATTRIBUTE, 3);

        gl.upload_vertex_buffer(normals, bytemuck::cast_slice(&mesh.normals));
        gl.vertex_attrib_f32(NORMAL_ATTRIBUTE, 3);

        gl.upload_vertex_buffer(tex_coords, bytemuck::cast_slice(&mesh.tex_coords));
        gl.vertex_attrib_f32(TEX_COORD_ATTRIBUTE, 2);

        gl.upload_index_buffer(indices, bytemuck::cast_slice(&mesh.faces));

        gl.bind_vertex_array(None);
        gl.unbind_buffers();

        let created = MeshBuffers {
            vao,
            positions,
            normals,
            tex_coords,
            indices,
            index_count: mesh.faces.len(),
            vertex_count: mesh.vertex_count(),
        };
        if let Some(previous) = self.mesh.replace(created) {
            release_mesh(gl, &previous);
        }

        log::debug!(
            "mesh buffers ready: {} vertices, {} indices",
            created.vertex_count,
            created.index_count
        );
        Ok(created)
    }

    /// Builds the skybox vertex array once; later calls are no-ops.
    pub fn create_skybox_buffers<D: GpuDevice>(&mut self, gl: &D) -> ViewerResult<SkyboxBuffers> {
        if let Some(existing) = self.skybox {
            return Ok(existing);
        }

        let vao = gl.create_vertex_array()?;
        let vertices = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(ViewerError::Gpu(e));
            }
        };
        let indices = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_buffer(vertices);
                gl.delete_vertex_array(vao);
                return Err(ViewerError::Gpu(e));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.upload_vertex_buffer(vertices, bytemuck::cast_slice(&SKYBOX_VERTICES));
        gl.vertex_attrib_f32(VERTEX_ATTRIBUTE, 3);
        gl.upload_index_buffer(indices, bytemuck::cast_slice(&SKYBOX_INDICES));
        gl.bind_vertex_array(None);
        gl.unbind_buffers();

        let skybox = SkyboxBuffers { vao, vertices, indices, index_count: SKYBOX_INDICES.len() };
        self.skybox = Some(skybox);
        log::debug!("skybox buffers ready: {} corners", SKYBOX_VERTEX_COUNT);
        Ok(skybox)
    }

    /// Loads the six faces of `dir` into the slot's cube map. Stops at the
    /// first face that fails; the slot then stays unusable until a later
    /// load succeeds.
    pub fn load_cube_map<D: GpuDevice>(
        &mut self,
        gl: &D,
        dir: &Path,
        slot: CubeMapSlot,
    ) -> ViewerResult<()> {
        let handle = ensure_entry(gl, &mut self.cube_maps[slot.index()])?;
        set_ready(&mut self.cube_maps[slot.index()], false);

        gl.bind_texture(TextureTarget::CubeMap, Some(handle));
        for (face_name, face) in CUBE_MAP_FACES {
            let uploaded = resolve_face_path(dir, face_name)
                .and_then(|path| upload_image(gl, ImageTarget::CubeFace(face), &path));
            if let Err(e) = uploaded {
                gl.bind_texture(TextureTarget::CubeMap, None);
                return Err(e);
            }
        }

        let params = slot.sampler_params();
        gl.set_sampler_params(TextureTarget::CubeMap, params);
        if params == SamplerParams::CUBE_MAP_MIPMAPPED {
            gl.generate_mipmap(TextureTarget::CubeMap);
        }
        gl.bind_texture(TextureTarget::CubeMap, None);

        set_ready(&mut self.cube_maps[slot.index()], true);
        log::info!("loaded {:?} cube map from {}", slot, dir.display());
        Ok(())
    }

    pub fn load_texture_2d<D: GpuDevice>(
        &mut self,
        gl: &D,
        path: &Path,
        slot: TextureSlot,
    ) -> ViewerResult<()> {
        let handle = ensure_entry(gl, &mut self.textures[slot.index()])?;
        set_ready(&mut self.textures[slot.index()], false);

        gl.bind_texture(TextureTarget::Texture2D, Some(handle));
        let uploaded = upload_image(gl, ImageTarget::Texture2D, path);
        if uploaded.is_ok() {
            gl.set_sampler_params(TextureTarget::Texture2D, SamplerParams::TEXTURE_2D);
        }
        gl.bind_texture(TextureTarget::Texture2D, None);
        uploaded?;

        set_ready(&mut self.textures[slot.index()], true);
        log::info!("loaded {:?} map from {}", slot, path.display());
        Ok(())
    }

    /// Compiles every program. All-or-nothing: on failure the programs
    /// built by this call are deleted and the error is returned.
    pub fn load_programs<D: GpuDevice>(
        &mut self,
        gl: &D,
        sources: &[ShaderSource],
    ) -> ViewerResult<()> {
        check_source_count(sources)?;

        let mut built = Vec::with_capacity(PROGRAM_COUNT);
        for source in sources {
            match compile_program(gl, &source.vertex, &source.fragment) {
                Ok(program) => built.push(program),
                Err(e) => {
                    built.into_iter().for_each(|p| gl.delete_program(p));
                    return Err(e);
                }
            }
        }

        for (slot, program) in self.programs.iter_mut().zip(built) {
            if let Some(previous) = slot.replace(program) {
                gl.delete_program(previous);
            }
        }
        log::info!("compiled {} shader programs", PROGRAM_COUNT);
        Ok(())
    }

    /// Recompiles every program, swapping each slot only when its new
    /// program links. Failed slots keep their previous program. Returns
    /// the errors of the slots that failed.
    pub fn reload_programs<D: GpuDevice>(
        &mut self,
        gl: &D,
        sources: &[ShaderSource],
    ) -> Vec<ViewerError> {
        if let Err(e) = check_source_count(sources) {
            return vec![e];
        }

        let mut failures = Vec::new();
        for (index, source) in sources.iter().enumerate() {
            match compile_program(gl, &source.vertex, &source.fragment) {
                Ok(program) => {
                    if let Some(previous) = self.programs[index].replace(program) {
                        gl.delete_program(previous);
                    }
                }
                Err(e) => {
                    log::warn!("keeping previous program {}: {}", index, e);
                    failures.push(e);
                }
            }
        }
        failures
    }

    /// Frees every owned GPU object. Only the first call does anything.
    pub fn release_all<D: GpuDevice>(&mut self, gl: &D) {
        if self.released {
            log::warn!("GPU resources already released");
            return;
        }

        if let Some(mesh) = self.mesh.take() {
            release_mesh(gl, &mesh);
        }
        if let Some(skybox) = self.skybox.take() {
            gl.delete_buffer(skybox.vertices);
            gl.delete_buffer(skybox.indices);
            gl.delete_vertex_array(skybox.vao);
        }
        for entry in self.cube_maps.iter_mut().chain(self.textures.iter_mut()) {
            if let Some(entry) = entry.take() {
                gl.delete_texture(entry.handle);
            }
        }
        for program in self.programs.iter_mut() {
            if let Some(program) = program.take() {
                gl.delete_program(program);
            }
        }
        gl.use_program(None);

        self.released = true;
        log::info!("released GPU resources");
    }

    pub fn mesh(&self) -> Option<&MeshBuffers> {
        self.mesh.as_ref()
    }

    pub fn skybox(&self) -> Option<&SkyboxBuffers> {
        self.skybox.as_ref()
    }

    /// Handle of a cube map whose last load succeeded.
    pub fn cube_map(&self, slot: CubeMapSlot) -> Option<TextureHandle> {
        self.cube_maps[slot.index()].filter(|entry| entry.ready).map(|entry| entry.handle)
    }

    /// Handle of a 2D map whose last load succeeded.
    pub fn texture(&self, slot: TextureSlot) -> Option<TextureHandle> {
        self.textures[slot.index()].filter(|entry| entry.ready).map(|entry| entry.handle)
    }

    pub fn program(&self, index: usize) -> Option<ProgramHandle> {
        self.programs.get(index).copied().flatten()
    }

    pub fn sky_program(&self) -> Option<ProgramHandle> {
        self.program(SKY_PROGRAM_INDEX)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

fn release_mesh<D: GpuDevice>(gl: &D, mesh: &MeshBuffers) {
    for buffer in [mesh.positions, mesh.normals, mesh.tex_coords, mesh.indices] {
        gl.delete_buffer(buffer);
    }
    gl.delete_vertex_array(mesh.vao);
}

fn ensure_entry<D: GpuDevice>(gl: &D, entry: &mut Option<TextureEntry>) -> ViewerResult<TextureHandle> {
    if let Some(existing) = entry {
        return Ok(existing.handle);
    }
    let handle = gl.create_texture()?;
    *entry = Some(TextureEntry { handle, ready: false });
    Ok(handle)
}

fn set_ready(entry: &mut Option<TextureEntry>, ready: bool) {
    if let Some(entry) = entry {
        entry.ready = ready;
    }
}

fn check_source_count(sources: &[ShaderSource]) -> ViewerResult<()> {
    if sources.len() != PROGRAM_COUNT {
        return Err(ViewerError::Gpu(format!(
            "expected {} shader programs, got {}",
            PROGRAM_COUNT,
            sources.len()
        )));
    }
    Ok(())
}

/// `<dir>/<face>`, or the same name with a common image extension.
fn resolve_face_path(dir: &Path, face: &'static str) -> ViewerResult<PathBuf> {
    let bare = dir.join(face);
    if bare.is_file() {
        return Ok(bare);
    }
    FACE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", face, ext)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ViewerError::MissingCubeMapFace { dir: dir.to_path_buf(), face })
}

fn upload_image<D: GpuDevice>(gl: &D, target: ImageTarget, path: &Path) -> ViewerResult<()> {
    let image = decode_image(path)?;
    gl.tex_image_rgba8(target, image.width, image.height, &image.pixels);
    Ok(())
}
