//! In-memory `GpuDevice` that records every call, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{
    BufferHandle, Capability, DepthFunc, GpuDevice, ImageTarget, ProgramHandle, SamplerParams,
    ShaderHandle, ShaderStage, TextureHandle, TextureTarget, UniformLocation, VertexArrayHandle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Mat4([f32; 16]),
    Mat3([f32; 9]),
    Vec3([f32; 3]),
    F32(f32),
    I32(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    UploadVertexBuffer { buffer: BufferHandle, bytes: usize },
    UploadIndexBuffer { buffer: BufferHandle, bytes: usize },
    VertexAttrib { location: u32, components: i32 },
    BindVertexArray(Option<VertexArrayHandle>),
    BindTexture(TextureTarget, Option<TextureHandle>),
    ActiveTexture(u32),
    TexImage { target: ImageTarget, width: u32, height: u32 },
    SamplerParams(TextureTarget, SamplerParams),
    GenerateMipmap(TextureTarget),
    BindAttribLocation { program: ProgramHandle, index: u32, name: String },
    UseProgram(Option<ProgramHandle>),
    Uniform { program: ProgramHandle, name: String, value: UniformValue },
    Enable(Capability),
    Disable(Capability),
    DepthFunc(DepthFunc),
    Viewport(i32, i32, i32, i32),
    Clear,
    DrawIndexed { vao: Option<VertexArrayHandle>, program: Option<ProgramHandle>, index_count: usize },
}

#[derive(Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    calls: RefCell<Vec<GpuCall>>,
    live_buffers: RefCell<HashSet<BufferHandle>>,
    live_vertex_arrays: RefCell<HashSet<VertexArrayHandle>>,
    live_textures: RefCell<HashSet<TextureHandle>>,
    live_programs: RefCell<HashSet<ProgramHandle>>,
    locations: RefCell<HashMap<UniformLocation, (ProgramHandle, String)>>,
    bound_vao: Cell<Option<VertexArrayHandle>>,
    current_program: Cell<Option<ProgramHandle>>,
    /// Uniform names every program reports as missing.
    pub missing_uniforms: RefCell<HashSet<String>>,
    pub fail_compile: Cell<bool>,
    pub fail_buffer_after: Cell<Option<usize>>,
    buffers_created: Cell<usize>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, call: GpuCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draws(&self) -> Vec<GpuCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, GpuCall::DrawIndexed { .. }))
            .cloned()
            .collect()
    }

    /// Values uploaded to uniform `name`, in call order.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                GpuCall::Uniform { name: n, value, .. } if n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.live_vertex_arrays.borrow().len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.borrow().len()
    }

    pub fn live_program_count(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn is_program_live(&self, program: ProgramHandle) -> bool {
        self.live_programs.borrow().contains(&program)
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.bound_vao.get()
    }

    fn record_uniform(&self, location: Option<&UniformLocation>, value: UniformValue) {
        let Some(location) = location else {
            return;
        };
        if let Some((program, name)) = self.locations.borrow().get(location).cloned() {
            self.record(GpuCall::Uniform { program, name, value });
        }
    }
}

impl GpuDevice for RecordingDevice {
    fn create_buffer(&self) -> Result<BufferHandle, String> {
        let created = self.buffers_created.get();
        if let Some(limit) = self.fail_buffer_after.get() {
            if created >= limit {
                return Err("out of buffer objects".to_string());
            }
        }
        self.buffers_created.set(created + 1);
        let handle = BufferHandle(self.next());
        self.live_buffers.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.live_buffers.borrow_mut().remove(&buffer);
    }

    fn upload_vertex_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        self.record(GpuCall::UploadVertexBuffer { buffer, bytes: data.len() });
    }

    fn upload_index_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        self.record(GpuCall::UploadIndexBuffer { buffer, bytes: data.len() });
    }

    fn vertex_attrib_f32(&self, location: u32, components: i32) {
        self.record(GpuCall::VertexAttrib { location, components });
    }

    fn unbind_buffers(&self) {}

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        let handle = VertexArrayHandle(self.next());
        self.live_vertex_arrays.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn delete_vertex_array(&self, vao: VertexArrayHandle) {
        self.live_vertex_arrays.borrow_mut().remove(&vao);
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayHandle>) {
        self.bound_vao.set(vao);
        self.record(GpuCall::BindVertexArray(vao));
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        let handle = TextureHandle(self.next());
        self.live_textures.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.live_textures.borrow_mut().remove(&texture);
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        self.record(GpuCall::BindTexture(target, texture));
    }

    fn active_texture(&self, unit: u32) {
        self.record(GpuCall::ActiveTexture(unit));
    }

    fn tex_image_rgba8(&self, target: ImageTarget, width: u32, height: u32, _pixels: &[u8]) {
        self.record(GpuCall::TexImage { target, width, height });
    }

    fn set_sampler_params(&self, target: TextureTarget, params: SamplerParams) {
        self.record(GpuCall::SamplerParams(target, params));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.record(GpuCall::GenerateMipmap(target));
    }

    fn compile_shader(&self, _stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        if self.fail_compile.get() || source.trim().is_empty() {
            return Err("0:1(1): error: syntax error".to_string());
        }
        Ok(ShaderHandle(self.next()))
    }

    fn delete_shader(&self, _shader: ShaderHandle) {}

    fn create_program(&self) -> Result<ProgramHandle, String> {
        let handle = ProgramHandle(self.next());
        self.live_programs.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn attach_shader(&self, _program: ProgramHandle, _shader: ShaderHandle) {}

    fn bind_attrib_location(&self, program: ProgramHandle, index: u32, name: &str) {
        self.record(GpuCall::BindAttribLocation { program, index, name: name.to_string() });
    }

    fn link_program(&self, _program: ProgramHandle) -> Result<(), String> {
        Ok(())
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.live_programs.borrow_mut().remove(&program);
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.current_program.set(program);
        self.record(GpuCall::UseProgram(program));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        if self.missing_uniforms.borrow().contains(name) {
            return None;
        }
        let mut locations = self.locations.borrow_mut();
        let existing = locations
            .iter()
            .find(|(_, (p, n))| *p == program && n == name)
            .map(|(loc, _)| *loc);
        Some(existing.unwrap_or_else(|| {
            let location = UniformLocation(self.next());
            locations.insert(location, (program, name.to_string()));
            location
        }))
    }

    fn uniform_mat4(&self, location: Option<&UniformLocation>, row_major: &[f32; 16]) {
        self.record_uniform(location, UniformValue::Mat4(*row_major));
    }

    fn uniform_mat3(&self, location: Option<&UniformLocation>, row_major: &[f32; 9]) {
        self.record_uniform(location, UniformValue::Mat3(*row_major));
    }

    fn uniform_vec3(&self, location: Option<&UniformLocation>, value: [f32; 3]) {
        self.record_uniform(location, UniformValue::Vec3(value));
    }

    fn uniform_f32(&self, location: Option<&UniformLocation>, value: f32) {
        self.record_uniform(location, UniformValue::F32(value));
    }

    fn uniform_i32(&self, location: Option<&UniformLocation>, value: i32) {
        self.record_uniform(location, UniformValue::I32(value));
    }

    fn enable(&self, capability: Capability) {
        self.record(GpuCall::Enable(capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(GpuCall::Disable(capability));
    }

    fn depth_func(&self, func: DepthFunc) {
        self.record(GpuCall::DepthFunc(func));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GpuCall::Viewport(x, y, width, height));
    }

    fn clear(&self, _color: [f32; 4]) {
        self.record(GpuCall::Clear);
    }

    fn draw_indexed_triangles(&self, index_count: usize) {
        self.record(GpuCall::DrawIndexed {
            vao: self.bound_vao.get(),
            program: self.current_program.get(),
            index_count,
        });
    }
}
