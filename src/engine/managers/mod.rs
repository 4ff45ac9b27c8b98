pub mod resource_registry;
pub mod shaders;

pub use resource_registry::{
    CubeMapSlot, MeshBuffers, ResourceRegistry, SkyboxBuffers, TextureSlot, CUBE_MAP_FACES,
    PROGRAM_COUNT, SKY_PROGRAM_INDEX,
};
pub use shaders::{compile_program, read_shader_source, ShaderSource};
