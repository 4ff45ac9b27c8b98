pub mod camera;
pub mod material;
pub mod mesh;
pub mod skybox;

pub use camera::Camera;
pub use material::{FresnelChannel, ShadingParams};
pub use mesh::TriangleMesh;
