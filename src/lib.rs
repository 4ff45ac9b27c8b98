//! Interactive OpenGL viewer for physically based shading experiments: one
//! mesh, a skybox, and five selectable shading models driven by an orbit
//! camera.

pub mod engine;

pub use engine::*;
