//! Converts raw window events into viewer actions.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::engine::rendering::ShadingMode;

/// What the viewer should do in response to one input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    StartRotating { x: f32, y: f32 },
    StopRotating { x: f32, y: f32 },
    StartZooming { x: f32, y: f32 },
    StopZooming { x: f32, y: f32 },
    /// Fed to both the rotation and the zoom drag; the camera ignores
    /// whichever is not active.
    PointerMoved { x: f32, y: f32 },
    Zoom(f32),
    Rotate(f32),
    ReloadShaders,
    SelectMode(ShadingMode),
    ToggleSky,
    CycleTexture,
}

/// Remembers the last pointer position, since button events carry none.
#[derive(Debug, Default)]
pub struct InputTranslator {
    cursor: (f32, f32),
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn process_cursor_moved(&mut self, x: f64, y: f64) -> Option<InputAction> {
        self.cursor = (x as f32, y as f32);
        Some(InputAction::PointerMoved { x: self.cursor.0, y: self.cursor.1 })
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputAction> {
        let (x, y) = self.cursor;
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => Some(InputAction::StartRotating { x, y }),
            (MouseButton::Left, ElementState::Released) => Some(InputAction::StopRotating { x, y }),
            (MouseButton::Right, ElementState::Pressed) => Some(InputAction::StartZooming { x, y }),
            (MouseButton::Right, ElementState::Released) => Some(InputAction::StopZooming { x, y }),
            _ => None,
        }
    }

    /// Key presses only; releases are ignored.
    pub fn process_key(&mut self, key: PhysicalKey, state: ElementState) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }
        let PhysicalKey::Code(code) = key else {
            return None;
        };

        match code {
            KeyCode::ArrowUp | KeyCode::KeyW => Some(InputAction::Zoom(-1.0)),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(InputAction::Zoom(1.0)),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(InputAction::Rotate(-1.0)),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(InputAction::Rotate(1.0)),
            KeyCode::KeyR => Some(InputAction::ReloadShaders),
            KeyCode::Digit1 => Some(InputAction::SelectMode(ShadingMode::Phong)),
            KeyCode::Digit2 => Some(InputAction::SelectMode(ShadingMode::TextureMap)),
            KeyCode::Digit3 => Some(InputAction::SelectMode(ShadingMode::Reflection)),
            KeyCode::Digit4 => Some(InputAction::SelectMode(ShadingMode::Pbs)),
            KeyCode::Digit5 => Some(InputAction::SelectMode(ShadingMode::IblPbs)),
            KeyCode::KeyK => Some(InputAction::ToggleSky),
            KeyCode::KeyT => Some(InputAction::CycleTexture),
            _ => None,
        }
    }
}
