//! Narrow GPU seam used by the viewer core.
//!
//! `GpuDevice` mirrors the subset of `glow::HasContext` the viewer needs,
//! with safe `&self` methods and opaque integer handles. `GlowDevice` is the
//! production implementation; the registry and renderer never touch glow
//! directly.

pub mod glow_device;
#[cfg(test)]
pub mod recording;

pub use glow_device::GlowDevice;

macro_rules! gpu_handle {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub u32);
        )*
    };
}

gpu_handle!(
    BufferHandle,
    VertexArrayHandle,
    TextureHandle,
    ShaderHandle,
    ProgramHandle,
    UniformLocation,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    CubeMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// Destination of a pixel upload: a whole 2D texture or one cube face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    Texture2D,
    CubeFace(CubeFace),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap: Wrap,
}

impl SamplerParams {
    pub const TEXTURE_2D: SamplerParams = SamplerParams {
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        wrap: Wrap::Repeat,
    };

    pub const CUBE_MAP: SamplerParams = SamplerParams {
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        wrap: Wrap::ClampToEdge,
    };

    pub const CUBE_MAP_MIPMAPPED: SamplerParams = SamplerParams {
        min_filter: Filter::LinearMipmapLinear,
        mag_filter: Filter::Linear,
        wrap: Wrap::ClampToEdge,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
    CullFace,
    CubeMapSeamless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
}

/// Every method operates on global context state (bound buffer, texture,
/// program); callers rebind what they need instead of assuming bindings
/// survive calls made elsewhere.
///
/// Uniform setters take `Option<&UniformLocation>`; `None` is a no-op, which
/// is how unresolved uniform names are tolerated.
pub trait GpuDevice {
    fn create_buffer(&self) -> Result<BufferHandle, String>;
    fn delete_buffer(&self, buffer: BufferHandle);
    /// Binds `buffer` to the array target and uploads `data` as static draw.
    fn upload_vertex_buffer(&self, buffer: BufferHandle, data: &[u8]);
    /// Binds `buffer` to the element target of the current vertex array.
    fn upload_index_buffer(&self, buffer: BufferHandle, data: &[u8]);
    /// Points `location` at the currently bound array buffer (tightly packed f32s).
    fn vertex_attrib_f32(&self, location: u32, components: i32);
    fn unbind_buffers(&self);

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;
    fn delete_vertex_array(&self, vao: VertexArrayHandle);
    fn bind_vertex_array(&self, vao: Option<VertexArrayHandle>);

    fn create_texture(&self) -> Result<TextureHandle, String>;
    fn delete_texture(&self, texture: TextureHandle);
    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>);
    /// Active texture unit, zero based.
    fn active_texture(&self, unit: u32);
    /// Uploads tightly packed RGBA8 pixels to the bound texture.
    fn tex_image_rgba8(&self, target: ImageTarget, width: u32, height: u32, pixels: &[u8]);
    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams);
    fn generate_mipmap(&self, target: TextureTarget);

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String>;
    fn delete_shader(&self, shader: ShaderHandle);
    fn create_program(&self) -> Result<ProgramHandle, String>;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn bind_attrib_location(&self, program: ProgramHandle, index: u32, name: &str);
    fn link_program(&self, program: ProgramHandle) -> Result<(), String>;
    fn delete_program(&self, program: ProgramHandle);
    fn use_program(&self, program: Option<ProgramHandle>);

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    fn uniform_mat4(&self, location: Option<&UniformLocation>, row_major: &[f32; 16]);
    fn uniform_mat3(&self, location: Option<&UniformLocation>, row_major: &[f32; 9]);
    fn uniform_vec3(&self, location: Option<&UniformLocation>, value: [f32; 3]);
    fn uniform_f32(&self, location: Option<&UniformLocation>, value: f32);
    fn uniform_i32(&self, location: Option<&UniformLocation>, value: i32);

    fn enable(&self, capability: Capability);
    fn disable(&self, capability: Capability);
    fn depth_func(&self, func: DepthFunc);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear(&self, color: [f32; 4]);
    /// Indexed triangle draw over `index_count` u32 indices of the bound vertex array.
    fn draw_indexed_triangles(&self, index_count: usize);
}
