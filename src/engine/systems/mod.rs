pub mod event_system;
pub mod input_system;

pub use event_system::{EventQueue, ViewerEvent};
pub use input_system::{InputAction, InputTranslator};
