use std::path::Path;

use crate::engine::components::{Camera, FresnelChannel, ShadingParams, TriangleMesh};
use crate::engine::config::ViewerConfig;
use crate::engine::error::ViewerResult;
use crate::engine::gpu::{Capability, GpuDevice};
use crate::engine::loaders::read_mesh;
use crate::engine::managers::{CubeMapSlot, ResourceRegistry, TextureSlot};
use crate::engine::rendering::{FrameRenderer, ShadingMode, ShadingModeSelector};
use crate::engine::systems::{EventQueue, InputAction, ViewerEvent};

/// Number of base textures `current_texture` selects between in the
/// texture-map shader (color, roughness, metalness).
const BASE_TEXTURE_COUNT: i32 = 3;

/// The viewer core: camera, GPU resources, shading state and the frame
/// renderer, driven by one thread that owns the GL context.
pub struct Viewer<D: GpuDevice> {
    gl: D,
    config: ViewerConfig,
    camera: Camera,
    registry: ResourceRegistry,
    selector: ShadingModeSelector,
    params: ShadingParams,
    renderer: FrameRenderer<D>,
    events: EventQueue,
    initialized: bool,
    repaint_requested: bool,
}

impl<D: GpuDevice> Viewer<D> {
    pub fn new(gl: D, config: ViewerConfig) -> Self {
        let mut camera = Camera::new();
        camera.set_projection(config.camera.field_of_view, config.camera.z_near, config.camera.z_far);
        camera.set_viewport(0, 0, config.window.width as i32, config.window.height as i32);

        let params = ShadingParams { fresnel: config.fresnel, ..ShadingParams::default() };
        let renderer = FrameRenderer::new(config.clear_color);

        Self {
            gl,
            config,
            camera,
            registry: ResourceRegistry::new(),
            selector: ShadingModeSelector::new(),
            params,
            renderer,
            events: EventQueue::new(),
            initialized: false,
            repaint_requested: false,
        }
    }

    /// Sets up GL state and loads everything named in the config. Only
    /// shader failures are fatal; a missing model or texture is logged and
    /// the viewer keeps going.
    pub fn initialize(&mut self) -> ViewerResult<()> {
        self.gl.enable(Capability::DepthTest);
        self.gl.enable(Capability::CullFace);
        self.gl.enable(Capability::CubeMapSeamless);

        self.registry.create_textures(&self.gl)?;
        self.registry.load_programs(&self.gl, &self.config.shaders)?;
        self.registry.create_skybox_buffers(&self.gl)?;

        let model = self.config.model.clone();
        if let Err(e) = self.load_model(&model) {
            log::error!("startup model {} not loaded: {}", model.display(), e);
        }

        let textures = self.config.textures.clone();
        self.load_color_map(&textures.color_map).ok();
        self.load_roughness_map(&textures.roughness_map).ok();
        self.load_metalness_map(&textures.metalness_map).ok();
        self.load_brdf_lut_map(&textures.brdf_lut_map).ok();
        self.load_specular_map(&textures.specular_cube_map).ok();
        self.load_diffuse_map(&textures.diffuse_cube_map).ok();

        log::info!("viewer initialized");
        self.request_repaint();
        Ok(())
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.camera.set_viewport(0, 0, width, height);
        self.request_repaint();
    }

    pub fn load_model(&mut self, path: &Path) -> ViewerResult<()> {
        let mesh = read_mesh(path).inspect_err(|e| log::warn!("cannot read model {}: {}", path.display(), e))?;
        self.set_mesh(&mesh)
    }

    /// Replaces the displayed mesh and reframes the camera on it.
    pub fn set_mesh(&mut self, mesh: &TriangleMesh) -> ViewerResult<()> {
        self.registry
            .create_mesh_buffers(&self.gl, mesh)
            .inspect_err(|e| log::warn!("cannot upload mesh: {}", e))?;

        self.camera.update_model(mesh.min, mesh.max);
        self.initialized = true;
        self.events.push(ViewerEvent::ModelLoaded {
            faces: mesh.face_count(),
            vertices: mesh.vertex_count(),
        });
        self.request_repaint();
        Ok(())
    }

    pub fn load_specular_map(&mut self, dir: &Path) -> ViewerResult<()> {
        self.load_cube_map(dir, CubeMapSlot::Specular)
    }

    pub fn load_diffuse_map(&mut self, dir: &Path) -> ViewerResult<()> {
        self.load_cube_map(dir, CubeMapSlot::Diffuse)
    }

    pub fn load_color_map(&mut self, path: &Path) -> ViewerResult<()> {
        self.load_texture(path, TextureSlot::Color)
    }

    pub fn load_roughness_map(&mut self, path: &Path) -> ViewerResult<()> {
        self.load_texture(path, TextureSlot::Roughness)
    }

    pub fn load_metalness_map(&mut self, path: &Path) -> ViewerResult<()> {
        self.load_texture(path, TextureSlot::Metalness)
    }

    pub fn load_brdf_lut_map(&mut self, path: &Path) -> ViewerResult<()> {
        self.load_texture(path, TextureSlot::BrdfLut)
    }

    fn load_cube_map(&mut self, dir: &Path, slot: CubeMapSlot) -> ViewerResult<()> {
        let result = self.registry.load_cube_map(&self.gl, dir, slot);
        if let Err(e) = &result {
            log::warn!("{:?} cube map unavailable: {}", slot, e);
        }
        self.request_repaint();
        result
    }

    fn load_texture(&mut self, path: &Path, slot: TextureSlot) -> ViewerResult<()> {
        let result = self.registry.load_texture_2d(&self.gl, path, slot);
        if let Err(e) = &result {
            log::warn!("{:?} map unavailable: {}", slot, e);
        }
        self.request_repaint();
        result
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.selector.select(mode);
        self.request_repaint();
    }

    /// Radio-button form of `set_shading_mode`; `false` is ignored.
    pub fn set_shading_enabled(&mut self, mode: ShadingMode, enabled: bool) {
        self.selector.set_enabled(mode, enabled);
        self.request_repaint();
    }

    pub fn set_fresnel_r(&mut self, value: f32) {
        self.set_fresnel(FresnelChannel::R, value);
    }

    pub fn set_fresnel_g(&mut self, value: f32) {
        self.set_fresnel(FresnelChannel::G, value);
    }

    pub fn set_fresnel_b(&mut self, value: f32) {
        self.set_fresnel(FresnelChannel::B, value);
    }

    fn set_fresnel(&mut self, channel: FresnelChannel, value: f32) {
        self.params.set_fresnel(channel, value);
        self.request_repaint();
    }

    pub fn set_current_texture(&mut self, index: i32) {
        self.params.current_texture = index;
        self.request_repaint();
    }

    pub fn set_sky_visible(&mut self, visible: bool) {
        self.params.sky_visible = visible;
        self.request_repaint();
    }

    pub fn set_metalness(&mut self, value: f32) {
        self.params.metalness = value;
        self.request_repaint();
    }

    pub fn set_roughness(&mut self, value: f32) {
        self.params.roughness = value;
        self.request_repaint();
    }

    /// Applies one translated input event. Every action requests a repaint.
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::StartRotating { x, y } => self.camera.start_rotating(x, y),
            InputAction::StopRotating { x, y } => self.camera.stop_rotating(x, y),
            InputAction::StartZooming { x, y } => self.camera.start_zooming(x, y),
            InputAction::StopZooming { x, y } => self.camera.stop_zooming(x, y),
            InputAction::PointerMoved { x, y } => {
                self.camera.set_rotation_x(y);
                self.camera.set_rotation_y(x);
                self.camera.safe_zoom(y);
            }
            InputAction::Zoom(delta) => self.camera.zoom(delta),
            InputAction::Rotate(delta) => self.camera.rotate(delta),
            InputAction::ReloadShaders => {
                self.reload_shaders();
            }
            InputAction::SelectMode(mode) => self.selector.select(mode),
            InputAction::ToggleSky => self.params.sky_visible = !self.params.sky_visible,
            InputAction::CycleTexture => {
                self.params.current_texture = (self.params.current_texture + 1).rem_euclid(BASE_TEXTURE_COUNT);
            }
        }
        self.request_repaint();
    }

    /// Recompiles every program in place. Slots that fail keep their old
    /// program. Returns the number of failed slots.
    pub fn reload_shaders(&mut self) -> usize {
        let failures = self.registry.reload_programs(&self.gl, &self.config.shaders);
        if failures.is_empty() {
            log::info!("shaders reloaded");
        } else {
            for e in &failures {
                log::error!("shader reload: {}", e);
            }
        }
        self.request_repaint();
        failures.len()
    }

    pub fn paint(&mut self) {
        self.renderer.render_frame(
            &self.gl,
            &self.camera,
            &self.registry,
            &self.params,
            self.selector.current(),
            self.initialized,
        );
    }

    /// Frees all GPU resources. Must run while the context is current.
    pub fn cleanup(&mut self) {
        self.registry.release_all(&self.gl);
        self.initialized = false;
    }

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain()
    }

    fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    /// Returns whether a repaint was requested since the last call.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn params(&self) -> &ShadingParams {
        &self.params
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.selector.current()
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn gl(&self) -> &D {
        &self.gl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::default_shaders;
    use crate::engine::gpu::recording::{GpuCall, RecordingDevice, UniformValue};
    use crate::engine::gpu::TextureTarget;
    use crate::engine::managers::{CUBE_MAP_FACES, PROGRAM_COUNT, SKY_PROGRAM_INDEX};
    use std::path::PathBuf;

    fn test_config() -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.shaders = default_shaders(&Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"));
        let missing = std::env::temp_dir().join("pbs-viewer-no-textures");
        config.textures.color_map = missing.join("color.png");
        config.textures.roughness_map = missing.join("roughness.png");
        config.textures.metalness_map = missing.join("metalness.png");
        config.textures.brdf_lut_map = missing.join("lut.png");
        config.textures.specular_cube_map = missing.join("specular");
        config.textures.diffuse_cube_map = missing.join("diffuse");
        config
    }

    fn viewer() -> Viewer<RecordingDevice> {
        let mut viewer = Viewer::new(RecordingDevice::new(), test_config());
        viewer.initialize().unwrap();
        viewer
    }

    fn triangle() -> TriangleMesh {
        TriangleMesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn startup_loads_sphere_and_emits_counts() {
        let mut viewer = viewer();
        assert!(viewer.is_initialized());
        assert!(viewer.take_repaint_request());
        assert!(!viewer.take_repaint_request());

        let events = viewer.drain_events();
        assert_eq!(events.len(), 1);
        let ViewerEvent::ModelLoaded { faces, vertices } = events[0].clone();
        assert_eq!(vertices, 33 * 65);
        assert_eq!(faces, 64 * (2 * 32 - 2));
    }

    #[test]
    fn missing_shader_is_fatal() {
        let mut config = test_config();
        config.shaders[2].vertex = PathBuf::from("/missing/reflection.vert");
        let mut viewer = Viewer::new(RecordingDevice::new(), config);
        assert!(viewer.initialize().is_err());
        assert_eq!(viewer.gl().live_program_count(), 0);
    }

    #[test]
    fn single_triangle_draws_three_indices() {
        let mut viewer = viewer();
        viewer.set_sky_visible(false);
        viewer.set_mesh(&triangle()).unwrap();
        viewer.gl().clear_calls();

        viewer.paint();
        let draws = viewer.gl().draws();
        assert_eq!(draws.len(), 1);
        assert!(matches!(
            draws[0],
            GpuCall::DrawIndexed { index_count: 3, program: Some(p), .. } if Some(p) == viewer.registry().program(0)
        ));
    }

    #[test]
    fn sky_is_drawn_after_mesh_with_sky_program() {
        let mut viewer = viewer();
        viewer.gl().clear_calls();
        viewer.paint();

        let draws = viewer.gl().draws();
        assert_eq!(draws.len(), 2);
        assert!(matches!(
            draws[1],
            GpuCall::DrawIndexed { index_count: 36, program: Some(p), .. }
                if Some(p) == viewer.registry().program(SKY_PROGRAM_INDEX)
        ));
        let calls = viewer.gl().calls();
        assert_eq!(calls.last(), Some(&GpuCall::UseProgram(None)));
        assert!(calls.contains(&GpuCall::DepthFunc(crate::engine::gpu::DepthFunc::LessEqual)));
    }

    #[test]
    fn nothing_is_drawn_before_a_model_loads() {
        let mut config = test_config();
        config.model = PathBuf::from("unsupported.ply");
        let mut viewer = Viewer::new(RecordingDevice::new(), config);
        viewer.initialize().unwrap();
        assert!(!viewer.is_initialized());
        assert!(viewer.drain_events().is_empty());

        viewer.gl().clear_calls();
        viewer.paint();
        assert_eq!(viewer.gl().calls(), vec![GpuCall::Clear]);
    }

    #[test]
    fn paint_uploads_selected_program_uniforms() {
        let mut viewer = viewer();
        viewer.set_shading_enabled(ShadingMode::Pbs, true);
        viewer.set_shading_enabled(ShadingMode::Phong, false);
        viewer.set_metalness(0.75);
        viewer.set_roughness(0.25);
        viewer.gl().clear_calls();

        viewer.paint();
        assert!(viewer.gl().calls().contains(&GpuCall::UseProgram(viewer.registry().program(3))));
        assert_eq!(viewer.gl().uniform_values("metalness"), vec![UniformValue::F32(0.75)]);
        assert_eq!(viewer.gl().uniform_values("roughness"), vec![UniformValue::F32(0.25)]);
        assert_eq!(viewer.gl().uniform_values("light"), vec![UniformValue::Vec3([2.0, 2.0, 5.0])]);
        assert_eq!(viewer.gl().uniform_values("camPos"), vec![UniformValue::Vec3([0.0, 0.0, 0.0])]);
        assert_eq!(
            viewer.gl().uniform_values("brdfLUT_map"),
            vec![UniformValue::I32(3)]
        );
        // Mesh pass and sky pass each upload the projection.
        assert_eq!(viewer.gl().uniform_values("projection").len(), 2);
    }

    #[test]
    fn fresnel_channels_reach_the_shader_in_order() {
        let mut viewer = viewer();
        viewer.set_fresnel_r(0.91);
        viewer.set_fresnel_g(0.37);
        viewer.set_fresnel_b(0.05);
        viewer.gl().clear_calls();

        viewer.paint();
        assert_eq!(viewer.gl().uniform_values("fresnel"), vec![UniformValue::Vec3([0.91, 0.37, 0.05])]);
    }

    #[test]
    fn missing_uniforms_are_skipped() {
        let mut viewer = viewer();
        viewer.gl().missing_uniforms.borrow_mut().insert("fresnel".to_string());
        viewer.gl().clear_calls();

        viewer.paint();
        assert!(viewer.gl().uniform_values("fresnel").is_empty());
        assert_eq!(viewer.gl().draws().len(), 2);
    }

    #[test]
    fn zero_resize_gives_unit_viewport() {
        let mut viewer = viewer();
        viewer.resize(0, 0);
        viewer.gl().clear_calls();
        viewer.paint();
        assert!(viewer.gl().calls().contains(&GpuCall::Viewport(0, 0, 1, 1)));
    }

    #[test]
    fn shader_reload_keeps_mode_and_attribute_bindings() {
        let mut viewer = viewer();
        viewer.set_shading_mode(ShadingMode::IblPbs);
        let before = viewer.registry().program(4);
        viewer.gl().clear_calls();

        viewer.handle_action(InputAction::ReloadShaders);
        assert_eq!(viewer.shading_mode(), ShadingMode::IblPbs);
        let after = viewer.registry().program(4).unwrap();
        assert_ne!(Some(after), before);
        assert_eq!(viewer.gl().live_program_count(), PROGRAM_COUNT);

        let bindings: Vec<(u32, String)> = viewer
            .gl()
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GpuCall::BindAttribLocation { program, index, name } if program == after => Some((index, name)),
                _ => None,
            })
            .collect();
        assert_eq!(
            bindings,
            vec![(0, "vertex".to_string()), (1, "normal".to_string()), (2, "texCoord".to_string())]
        );
    }

    #[test]
    fn failed_shader_reload_keeps_drawing_with_old_programs() {
        let mut viewer = viewer();
        let before = viewer.registry().program(0);
        viewer.gl().fail_compile.set(true);

        assert_eq!(viewer.reload_shaders(), PROGRAM_COUNT);
        assert_eq!(viewer.registry().program(0), before);

        viewer.gl().clear_calls();
        viewer.paint();
        assert_eq!(viewer.gl().draws().len(), 2);
    }

    #[test]
    fn incomplete_cube_map_is_never_bound() {
        let dir = std::env::temp_dir().join(format!("pbs-viewer-viewer-cube-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (face, _) in CUBE_MAP_FACES.iter().take(5) {
            image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]))
                .save_with_format(dir.join(format!("{}.png", face)), image::ImageFormat::Png)
                .unwrap();
        }

        let mut viewer = viewer();
        assert!(viewer.load_specular_map(&dir).is_err());
        assert!(viewer.registry().cube_map(CubeMapSlot::Specular).is_none());

        viewer.gl().clear_calls();
        viewer.paint();
        let cube_binds: Vec<_> = viewer
            .gl()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, GpuCall::BindTexture(TextureTarget::CubeMap, _)))
            .collect();
        assert!(!cube_binds.is_empty());
        assert!(cube_binds.iter().all(|call| *call == GpuCall::BindTexture(TextureTarget::CubeMap, None)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn pointer_drag_orbits_and_zooms() {
        let mut viewer = viewer();
        let distance = viewer.camera().distance();

        viewer.handle_action(InputAction::PointerMoved { x: 10.0, y: 10.0 });
        viewer.handle_action(InputAction::StartRotating { x: 10.0, y: 10.0 });
        viewer.handle_action(InputAction::PointerMoved { x: 30.0, y: 10.0 });
        viewer.handle_action(InputAction::StopRotating { x: 30.0, y: 10.0 });
        assert!(viewer.camera().yaw() > 0.0);
        assert_eq!(viewer.camera().distance(), distance);

        viewer.handle_action(InputAction::StartZooming { x: 30.0, y: 10.0 });
        viewer.handle_action(InputAction::PointerMoved { x: 30.0, y: 50.0 });
        viewer.handle_action(InputAction::StopZooming { x: 30.0, y: 50.0 });
        assert!(viewer.camera().distance() > distance);
        assert!(viewer.take_repaint_request());
    }

    #[test]
    fn keyboard_shortcuts_toggle_state() {
        let mut viewer = viewer();
        viewer.handle_action(InputAction::ToggleSky);
        assert!(!viewer.params().sky_visible);

        for expected in [1, 2, 0] {
            viewer.handle_action(InputAction::CycleTexture);
            assert_eq!(viewer.params().current_texture, expected);
        }

        viewer.handle_action(InputAction::SelectMode(ShadingMode::Reflection));
        assert_eq!(viewer.shading_mode(), ShadingMode::Reflection);
    }

    #[test]
    fn cleanup_releases_everything() {
        let mut viewer = viewer();
        viewer.cleanup();
        let gl = viewer.gl();
        assert_eq!(gl.live_buffer_count(), 0);
        assert_eq!(gl.live_vertex_array_count(), 0);
        assert_eq!(gl.live_texture_count(), 0);
        assert_eq!(gl.live_program_count(), 0);

        viewer.gl().clear_calls();
        viewer.paint();
        assert_eq!(viewer.gl().calls(), vec![GpuCall::Clear]);
    }
}
