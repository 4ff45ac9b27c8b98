use std::num::NonZeroU32;

use glow::HasContext;

use super::{
    BufferHandle, Capability, CubeFace, DepthFunc, Filter, GpuDevice, ImageTarget,
    ProgramHandle, SamplerParams, ShaderHandle, ShaderStage, TextureHandle, TextureTarget,
    UniformLocation, VertexArrayHandle, Wrap,
};

/// `GpuDevice` backed by a desktop OpenGL 3.3 `glow::Context`.
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    pub fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        Self::new(gl)
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn non_zero(id: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(id)
}

fn native_buffer(handle: BufferHandle) -> Option<glow::NativeBuffer> {
    non_zero(handle.0).map(glow::NativeBuffer)
}

fn native_vertex_array(handle: VertexArrayHandle) -> Option<glow::NativeVertexArray> {
    non_zero(handle.0).map(glow::NativeVertexArray)
}

fn native_texture(handle: TextureHandle) -> Option<glow::NativeTexture> {
    non_zero(handle.0).map(glow::NativeTexture)
}

fn native_shader(handle: ShaderHandle) -> Option<glow::NativeShader> {
    non_zero(handle.0).map(glow::NativeShader)
}

fn native_program(handle: ProgramHandle) -> Option<glow::NativeProgram> {
    non_zero(handle.0).map(glow::NativeProgram)
}

fn native_location(location: Option<&UniformLocation>) -> Option<glow::NativeUniformLocation> {
    location.map(|loc| glow::NativeUniformLocation(loc.0))
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

fn image_target(target: ImageTarget) -> u32 {
    match target {
        ImageTarget::Texture2D => glow::TEXTURE_2D,
        ImageTarget::CubeFace(CubeFace::PositiveX) => glow::TEXTURE_CUBE_MAP_POSITIVE_X,
        ImageTarget::CubeFace(CubeFace::NegativeX) => glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
        ImageTarget::CubeFace(CubeFace::PositiveY) => glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
        ImageTarget::CubeFace(CubeFace::NegativeY) => glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
        ImageTarget::CubeFace(CubeFace::PositiveZ) => glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
        ImageTarget::CubeFace(CubeFace::NegativeZ) => glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
    }
}

fn filter(value: Filter) -> i32 {
    match value {
        Filter::Linear => glow::LINEAR as i32,
        Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR as i32,
    }
}

fn wrap(value: Wrap) -> i32 {
    match value {
        Wrap::Repeat => glow::REPEAT as i32,
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
    }
}

fn capability(value: Capability) -> u32 {
    match value {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::CullFace => glow::CULL_FACE,
        Capability::CubeMapSeamless => glow::TEXTURE_CUBE_MAP_SEAMLESS,
    }
}

impl GpuDevice for GlowDevice {
    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { self.gl.create_buffer().map(|b| BufferHandle(b.0.get())) }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        if let Some(native) = native_buffer(buffer) {
            unsafe { self.gl.delete_buffer(native) }
        }
    }

    fn upload_vertex_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, native_buffer(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn upload_index_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, native_buffer(buffer));
            self.gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn vertex_attrib_f32(&self, location: u32, components: i32) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
            self.gl.enable_vertex_attrib_array(location);
        }
    }

    fn unbind_buffers(&self) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe { self.gl.create_vertex_array().map(|v| VertexArrayHandle(v.0.get())) }
    }

    fn delete_vertex_array(&self, vao: VertexArrayHandle) {
        if let Some(native) = native_vertex_array(vao) {
            unsafe { self.gl.delete_vertex_array(native) }
        }
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayHandle>) {
        unsafe { self.gl.bind_vertex_array(vao.and_then(native_vertex_array)) }
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        unsafe { self.gl.create_texture().map(|t| TextureHandle(t.0.get())) }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        if let Some(native) = native_texture(texture) {
            unsafe { self.gl.delete_texture(native) }
        }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.bind_texture(texture_target(target), texture.and_then(native_texture));
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn tex_image_rgba8(&self, target: ImageTarget, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_image_2d(
                image_target(target),
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams) {
        let target = texture_target(target);
        unsafe {
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, filter(params.min_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, filter(params.mag_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap(params.wrap));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap(params.wrap));
            if target == glow::TEXTURE_CUBE_MAP {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, wrap(params.wrap));
            }
        }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        unsafe { self.gl.generate_mipmap(texture_target(target)) }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(shader_type)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(log);
            }
            Ok(ShaderHandle(shader.0.get()))
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        if let Some(native) = native_shader(shader) {
            unsafe { self.gl.delete_shader(native) }
        }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        unsafe { self.gl.create_program().map(|p| ProgramHandle(p.0.get())) }
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn bind_attrib_location(&self, program: ProgramHandle, index: u32, name: &str) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.bind_attrib_location(program, index, name) }
        }
    }

    fn link_program(&self, program: ProgramHandle) -> Result<(), String> {
        let native = native_program(program).ok_or_else(|| "null program handle".to_string())?;
        unsafe {
            self.gl.link_program(native);
            if !self.gl.get_program_link_status(native) {
                return Err(self.gl.get_program_info_log(native));
            }
        }
        Ok(())
    }

    fn delete_program(&self, program: ProgramHandle) {
        if let Some(native) = native_program(program) {
            unsafe { self.gl.delete_program(native) }
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.and_then(native_program)) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let native = native_program(program)?;
        unsafe { self.gl.get_uniform_location(native, name).map(|loc| UniformLocation(loc.0)) }
    }

    fn uniform_mat4(&self, location: Option<&UniformLocation>, row_major: &[f32; 16]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(native_location(location).as_ref(), true, row_major);
        }
    }

    fn uniform_mat3(&self, location: Option<&UniformLocation>, row_major: &[f32; 9]) {
        unsafe {
            self.gl.uniform_matrix_3_f32_slice(native_location(location).as_ref(), true, row_major);
        }
    }

    fn uniform_vec3(&self, location: Option<&UniformLocation>, value: [f32; 3]) {
        unsafe {
            self.gl.uniform_3_f32(native_location(location).as_ref(), value[0], value[1], value[2]);
        }
    }

    fn uniform_f32(&self, location: Option<&UniformLocation>, value: f32) {
        unsafe { self.gl.uniform_1_f32(native_location(location).as_ref(), value) }
    }

    fn uniform_i32(&self, location: Option<&UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(native_location(location).as_ref(), value) }
    }

    fn enable(&self, value: Capability) {
        unsafe { self.gl.enable(capability(value)) }
    }

    fn disable(&self, value: Capability) {
        unsafe { self.gl.disable(capability(value)) }
    }

    fn depth_func(&self, func: DepthFunc) {
        let func = match func {
            DepthFunc::Less => glow::LESS,
            DepthFunc::LessEqual => glow::LEQUAL,
        };
        unsafe { self.gl.depth_func(func) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_indexed_triangles(&self, index_count: usize) {
        unsafe {
            self.gl.draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
        }
    }
}
