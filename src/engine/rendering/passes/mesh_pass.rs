use crate::engine::components::material::{ALBEDO, CAMERA_ORIGIN, LIGHT_POSITION};
use crate::engine::gpu::{Capability, DepthFunc, GpuDevice, ProgramHandle, TextureHandle, TextureTarget};
use crate::engine::managers::{CubeMapSlot, TextureSlot};
use crate::engine::rendering::frame_renderer::{FrameContext, RenderPass};

/// Draws the loaded mesh with the program of the active shading mode.
#[derive(Debug, Default)]
pub struct MeshPass {
    missing_program_reported: bool,
}

impl MeshPass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: GpuDevice> RenderPass<D> for MeshPass {
    fn setup(&mut self, gl: &D, _frame: &FrameContext) {
        gl.enable(Capability::DepthTest);
        gl.depth_func(DepthFunc::Less);
        gl.enable(Capability::CullFace);
    }

    fn render(&mut self, gl: &D, frame: &FrameContext) {
        let Some(mesh) = frame.registry.mesh() else {
            return;
        };
        let Some(program) = frame.registry.program(frame.mode.program_index()) else {
            if !self.missing_program_reported {
                log::warn!("no program for {} shading", frame.mode.name());
                self.missing_program_reported = true;
            }
            return;
        };
        self.missing_program_reported = false;

        gl.use_program(Some(program));
        let location = |name: &str| gl.uniform_location(program, name);

        gl.uniform_mat4(location("projection").as_ref(), &frame.projection);
        gl.uniform_mat4(location("view").as_ref(), &frame.view);
        gl.uniform_mat4(location("model").as_ref(), &frame.model);
        gl.uniform_mat3(location("normal_matrix").as_ref(), &frame.normal_matrix);

        // Cube maps and 2D maps share units 0 and 1 on different targets;
        // each program samples only one of the two sets.
        for slot in CubeMapSlot::ALL {
            bind_sampler(
                gl,
                program,
                TextureTarget::CubeMap,
                slot.texture_unit(),
                frame.registry.cube_map(slot),
                slot.uniform_name(),
            );
        }
        for slot in TextureSlot::ALL {
            bind_sampler(
                gl,
                program,
                TextureTarget::Texture2D,
                slot.texture_unit(),
                frame.registry.texture(slot),
                slot.uniform_name(),
            );
        }

        let params = frame.params;
        gl.uniform_i32(location("current_texture").as_ref(), params.current_texture);
        gl.uniform_vec3(location("light").as_ref(), LIGHT_POSITION);
        gl.uniform_vec3(location("camPos").as_ref(), CAMERA_ORIGIN);
        gl.uniform_vec3(location("fresnel").as_ref(), params.fresnel);
        gl.uniform_f32(location("roughness").as_ref(), params.roughness);
        gl.uniform_f32(location("metalness").as_ref(), params.metalness);
        gl.uniform_vec3(location("albedo").as_ref(), ALBEDO);

        gl.bind_vertex_array(Some(mesh.vao));
        gl.draw_indexed_triangles(mesh.index_count);
        gl.bind_vertex_array(None);
    }

    fn name(&self) -> &'static str {
        "Mesh"
    }
}

pub(crate) fn bind_sampler<D: GpuDevice>(
    gl: &D,
    program: ProgramHandle,
    target: TextureTarget,
    unit: u32,
    texture: Option<TextureHandle>,
    uniform: &str,
) {
    gl.active_texture(unit);
    gl.bind_texture(target, texture);
    gl.uniform_i32(gl.uniform_location(program, uniform).as_ref(), unit as i32);
}
