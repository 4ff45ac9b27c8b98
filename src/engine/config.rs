use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::error::{ViewerError, ViewerResult};
use crate::engine::loaders::mesh_loader::is_procedural;
use crate::engine::managers::{ShaderSource, PROGRAM_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "PBS Viewer".to_string(), width: 1024, height: 768 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub field_of_view: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { field_of_view: 60.0, z_near: 0.0001, z_far: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub color_map: PathBuf,
    pub roughness_map: PathBuf,
    pub metalness_map: PathBuf,
    pub brdf_lut_map: PathBuf,
    pub specular_cube_map: PathBuf,
    pub diffuse_cube_map: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        let material = Path::new("textures/antique-grate1-bl");
        Self {
            color_map: material.join("antique-grate1-albedo.png"),
            roughness_map: material.join("antique-grate1-roughness.png"),
            metalness_map: material.join("antique-grate1-metallic.png"),
            brdf_lut_map: PathBuf::from("textures/ibl/ibl_brdf_lut.png"),
            specular_cube_map: PathBuf::from("textures/desert_specular"),
            diffuse_cube_map: PathBuf::from("textures/desert_diffuse"),
        }
    }
}

/// Startup settings. Every field has a default, so a partial JSON file (or
/// none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    /// Mesh programs in shading-mode order, sky program last.
    pub shaders: Vec<ShaderSource>,
    pub model: PathBuf,
    pub textures: TextureConfig,
    pub fresnel: [f32; 3],
    pub clear_color: [f32; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            shaders: default_shaders(Path::new("shaders")),
            model: PathBuf::from("sphere.null"),
            textures: TextureConfig::default(),
            fresnel: [0.2, 0.2, 0.2],
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

pub fn default_shaders(dir: &Path) -> Vec<ShaderSource> {
    ["phong", "texMap", "reflection", "pbs", "ibl-pbs", "sky"]
        .iter()
        .map(|name| ShaderSource::new(dir.join(format!("{}.vert", name)), dir.join(format!("{}.frag", name))))
        .collect()
}

impl ViewerConfig {
    /// Parses `path` and resolves relative paths against its directory.
    pub fn load(path: &Path) -> ViewerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ViewerError::Io { path: path.to_path_buf(), source })?;
        let mut config: ViewerConfig = serde_json::from_str(&text)
            .map_err(|source| ViewerError::Config { path: path.to_path_buf(), source })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        // Default shader paths stay relative to the working directory.
        if config.shaders.len() != PROGRAM_COUNT {
            log::warn!(
                "{} lists {} shader programs, expected {}; using defaults",
                path.display(),
                config.shaders.len(),
                PROGRAM_COUNT
            );
            config.shaders = ViewerConfig::default().shaders;
        }
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ViewerResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        for source in &mut self.shaders {
            resolve(&mut source.vertex);
            resolve(&mut source.fragment);
        }
        if !is_procedural(&self.model) {
            resolve(&mut self.model);
        }
        let textures = &mut self.textures;
        for path in [
            &mut textures.color_map,
            &mut textures.roughness_map,
            &mut textures.metalness_map,
            &mut textures.brdf_lut_map,
            &mut textures.specular_cube_map,
            &mut textures.diffuse_cube_map,
        ] {
            resolve(path);
        }
    }
}
