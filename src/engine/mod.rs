pub mod components;
pub mod config;
pub mod error;
pub mod gpu;
pub mod loaders;
pub mod managers;
pub mod rendering;
pub mod systems;
pub mod utils;
pub mod viewer;

// Re-export the types hosts need to embed the viewer
pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use gpu::{GlowDevice, GpuDevice};
pub use rendering::ShadingMode;
pub use systems::{InputAction, InputTranslator, ViewerEvent};
pub use viewer::Viewer;
