pub mod frame_renderer;
pub mod passes;
pub mod shading;

pub use frame_renderer::{FrameContext, FrameRenderer, RenderPass};
pub use passes::*;
pub use shading::{ShadingMode, ShadingModeSelector};
