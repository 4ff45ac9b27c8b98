pub mod mesh_pass;
pub mod skybox_pass;

pub use mesh_pass::MeshPass;
pub use skybox_pass::SkyboxPass;
