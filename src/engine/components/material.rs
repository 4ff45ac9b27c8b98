use serde::{Deserialize, Serialize};

/// Albedo used by every shading mode; there is no per-mesh material.
pub const ALBEDO: [f32; 3] = [1.0, 1.0, 1.0];
/// Point light position uploaded as `light`.
pub const LIGHT_POSITION: [f32; 3] = [2.0, 2.0, 5.0];
/// Camera-space eye position uploaded as `camPos`.
pub const CAMERA_ORIGIN: [f32; 3] = [0.0, 0.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FresnelChannel {
    R,
    G,
    B,
}

impl FresnelChannel {
    fn index(self) -> usize {
        match self {
            FresnelChannel::R => 0,
            FresnelChannel::G => 1,
            FresnelChannel::B => 2,
        }
    }
}

/// Scalar inputs to the reflectance shaders. Written by UI commands, read
/// once per frame by the mesh pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParams {
    pub fresnel: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub current_texture: i32,
    pub sky_visible: bool,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            fresnel: [0.2, 0.2, 0.2],
            roughness: 0.0,
            metalness: 0.0,
            current_texture: 0,
            sky_visible: true,
        }
    }
}

impl ShadingParams {
    pub fn set_fresnel(&mut self, channel: FresnelChannel, value: f32) {
        self.fresnel[channel.index()] = value;
    }

    pub fn fresnel(&self, channel: FresnelChannel) -> f32 {
        self.fresnel[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresnel_channels_are_independent() {
        let mut params = ShadingParams::default();
        params.set_fresnel(FresnelChannel::G, 0.9);
        assert_eq!(params.fresnel, [0.2, 0.9, 0.2]);
        assert_eq!(params.fresnel(FresnelChannel::G), 0.9);
    }
}
