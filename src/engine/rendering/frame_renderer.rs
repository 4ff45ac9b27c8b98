use crate::engine::components::{Camera, ShadingParams};
use crate::engine::gpu::GpuDevice;
use crate::engine::managers::ResourceRegistry;
use crate::engine::rendering::passes::{MeshPass, SkyboxPass};
use crate::engine::rendering::shading::ShadingMode;
use crate::engine::utils::math::{mat4x4_mul, normal_matrix, Mat3x3, Mat4x4};

/// Everything a pass may read while drawing one frame. Built fresh each
/// frame from the camera so passes never cache matrices.
pub struct FrameContext<'a> {
    pub projection: Mat4x4,
    pub view: Mat4x4,
    pub model: Mat4x4,
    pub normal_matrix: Mat3x3,
    pub sky_model: Mat4x4,
    pub registry: &'a ResourceRegistry,
    pub params: &'a ShadingParams,
    pub mode: ShadingMode,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        camera: &Camera,
        registry: &'a ResourceRegistry,
        params: &'a ShadingParams,
        mode: ShadingMode,
    ) -> Self {
        let view = camera.view();
        let model = camera.model();
        Self {
            projection: camera.projection(),
            view,
            model,
            normal_matrix: normal_matrix(&mat4x4_mul(view, model)),
            sky_model: camera.identity(),
            registry,
            params,
            mode,
        }
    }
}

/// One stage of the frame. `setup` and `cleanup` bracket `render` and own
/// any GL state the pass changes.
pub trait RenderPass<D: GpuDevice> {
    fn setup(&mut self, _gl: &D, _frame: &FrameContext) {}

    fn render(&mut self, gl: &D, frame: &FrameContext);

    fn cleanup(&mut self, _gl: &D) {}

    fn name(&self) -> &'static str;
}

/// Runs the mesh pass then the skybox pass on every repaint.
pub struct FrameRenderer<D: GpuDevice> {
    passes: Vec<Box<dyn RenderPass<D>>>,
    clear_color: [f32; 4],
}

impl<D: GpuDevice> FrameRenderer<D> {
    pub fn new(clear_color: [f32; 4]) -> Self {
        let mut renderer = Self { passes: Vec::new(), clear_color };
        renderer.add_pass(Box::new(MeshPass::new()));
        renderer.add_pass(Box::new(SkyboxPass::new()));
        renderer
    }

    pub fn add_pass(&mut self, pass: Box<dyn RenderPass<D>>) {
        self.passes.push(pass);
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    /// Clears, and when a model is loaded, draws every pass in order.
    pub fn render_frame(
        &mut self,
        gl: &D,
        camera: &Camera,
        registry: &ResourceRegistry,
        params: &ShadingParams,
        mode: ShadingMode,
        initialized: bool,
    ) {
        gl.clear(self.clear_color);
        if !initialized {
            return;
        }

        let [x, y, width, height] = camera.viewport();
        gl.viewport(x, y, width, height);

        let frame = FrameContext::new(camera, registry, params, mode);
        for pass in &mut self.passes {
            pass.setup(gl, &frame);
            pass.render(gl, &frame);
            pass.cleanup(gl);
        }

        gl.bind_vertex_array(None);
        gl.use_program(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gpu::recording::{GpuCall, RecordingDevice};

    #[test]
    fn uninitialized_frame_only_clears() {
        let gl = RecordingDevice::new();
        let mut renderer = FrameRenderer::new([0.0; 4]);
        renderer.render_frame(
            &gl,
            &Camera::new(),
            &ResourceRegistry::new(),
            &ShadingParams::default(),
            ShadingMode::Phong,
            false,
        );
        assert_eq!(gl.calls(), vec![GpuCall::Clear]);
    }

    #[test]
    fn passes_run_mesh_then_skybox() {
        let renderer: FrameRenderer<RecordingDevice> = FrameRenderer::new([0.0; 4]);
        assert_eq!(renderer.pass_names(), vec!["Mesh", "Skybox"]);
    }

    #[test]
    fn viewport_follows_camera() {
        let gl = RecordingDevice::new();
        let mut camera = Camera::new();
        camera.set_viewport(0, 0, 0, 0);
        let mut renderer = FrameRenderer::new([0.0; 4]);
        renderer.render_frame(
            &gl,
            &camera,
            &ResourceRegistry::new(),
            &ShadingParams::default(),
            ShadingMode::Phong,
            true,
        );
        assert!(gl.calls().contains(&GpuCall::Viewport(0, 0, 1, 1)));
        assert!(gl.draws().is_empty());
    }
}
