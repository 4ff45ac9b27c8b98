pub mod image_loader;
pub mod mesh_loader;

pub use image_loader::{decode_image, DecodedImage};
pub use mesh_loader::{is_procedural, read_mesh};
