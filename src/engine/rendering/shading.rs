use serde::{Deserialize, Serialize};

pub use crate::engine::managers::{PROGRAM_COUNT, SKY_PROGRAM_INDEX};

/// Mesh shading techniques. The sky program is not a mode; it is drawn on
/// top of whichever mode is active when the skybox is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingMode {
    #[default]
    Phong,
    TextureMap,
    Reflection,
    Pbs,
    IblPbs,
}

impl ShadingMode {
    pub const SELECTABLE: [ShadingMode; 5] = [
        ShadingMode::Phong,
        ShadingMode::TextureMap,
        ShadingMode::Reflection,
        ShadingMode::Pbs,
        ShadingMode::IblPbs,
    ];

    /// Slot of this mode's program in the resource registry.
    pub fn program_index(self) -> usize {
        match self {
            ShadingMode::Phong => 0,
            ShadingMode::TextureMap => 1,
            ShadingMode::Reflection => 2,
            ShadingMode::Pbs => 3,
            ShadingMode::IblPbs => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShadingMode::Phong => "phong",
            ShadingMode::TextureMap => "texture map",
            ShadingMode::Reflection => "reflection",
            ShadingMode::Pbs => "pbs",
            ShadingMode::IblPbs => "ibl-pbs",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadingModeSelector {
    current: ShadingMode,
}

impl ShadingModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, mode: ShadingMode) {
        if self.current != mode {
            log::debug!("shading mode {} -> {}", self.current.name(), mode.name());
        }
        self.current = mode;
    }

    /// Radio-button style command: only `enabled == true` selects. The
    /// `false` sent by the control being switched off is ignored.
    pub fn set_enabled(&mut self, mode: ShadingMode, enabled: bool) {
        if enabled {
            self.select(mode);
        }
    }

    pub fn current(&self) -> ShadingMode {
        self.current
    }

    pub fn program_index(&self) -> usize {
        self.current.program_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_phong() {
        let selector = ShadingModeSelector::new();
        assert_eq!(selector.current(), ShadingMode::Phong);
        assert_eq!(selector.program_index(), 0);
    }

    #[test]
    fn disabled_commands_never_change_selection() {
        for initial in ShadingMode::SELECTABLE {
            for mode in ShadingMode::SELECTABLE {
                let mut selector = ShadingModeSelector::new();
                selector.select(initial);
                selector.set_enabled(mode, false);
                assert_eq!(selector.current(), initial);
            }
        }
    }

    #[test]
    fn enabled_commands_select_fixed_index() {
        let mut selector = ShadingModeSelector::new();
        for (index, mode) in ShadingMode::SELECTABLE.into_iter().enumerate() {
            selector.set_enabled(mode, true);
            assert_eq!(selector.program_index(), index);
        }
    }

    #[test]
    fn sky_slot_is_never_a_mode_index() {
        assert_eq!(SKY_PROGRAM_INDEX, PROGRAM_COUNT - 1);
        assert!(ShadingMode::SELECTABLE.iter().all(|m| m.program_index() < SKY_PROGRAM_INDEX));
    }
}
