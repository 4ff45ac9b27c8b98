use crate::engine::gpu::{Capability, DepthFunc, GpuDevice, TextureTarget};
use crate::engine::managers::CubeMapSlot;
use crate::engine::rendering::frame_renderer::{FrameContext, RenderPass};
use crate::engine::rendering::passes::mesh_pass::bind_sampler;

/// Draws the environment cube around the mesh with the sky program and the
/// specular cube map. Skipped entirely while the sky is hidden.
#[derive(Debug, Default)]
pub struct SkyboxPass {
    state_changed: bool,
}

impl SkyboxPass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: GpuDevice> RenderPass<D> for SkyboxPass {
    fn setup(&mut self, gl: &D, frame: &FrameContext) {
        if !frame.params.sky_visible {
            return;
        }
        // Seen from inside, and drawn at the far plane.
        gl.disable(Capability::CullFace);
        gl.depth_func(DepthFunc::LessEqual);
        self.state_changed = true;
    }

    fn render(&mut self, gl: &D, frame: &FrameContext) {
        if !frame.params.sky_visible {
            return;
        }
        let (Some(skybox), Some(program)) = (frame.registry.skybox(), frame.registry.sky_program()) else {
            return;
        };

        gl.use_program(Some(program));
        let location = |name: &str| gl.uniform_location(program, name);
        gl.uniform_mat4(location("projection").as_ref(), &frame.projection);
        gl.uniform_mat4(location("view").as_ref(), &frame.view);
        gl.uniform_mat4(location("model").as_ref(), &frame.sky_model);
        gl.uniform_mat3(location("normal_matrix").as_ref(), &frame.normal_matrix);

        let slot = CubeMapSlot::Specular;
        bind_sampler(
            gl,
            program,
            TextureTarget::CubeMap,
            slot.texture_unit(),
            frame.registry.cube_map(slot),
            slot.uniform_name(),
        );

        gl.bind_vertex_array(Some(skybox.vao));
        gl.draw_indexed_triangles(skybox.index_count);
        gl.bind_vertex_array(None);
    }

    fn cleanup(&mut self, gl: &D) {
        if self.state_changed {
            gl.depth_func(DepthFunc::Less);
            gl.enable(Capability::CullFace);
            self.state_changed = false;
        }
    }

    fn name(&self) -> &'static str {
        "Skybox"
    }
}
