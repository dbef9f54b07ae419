use crate::core::geometry::Topology;
use crate::pipeline::render_config::RenderConfig;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_target_fps")]
    pub target_fps: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            target_fps: default_target_fps(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_title() -> String {
    "Dual Rasterizer".to_string()
}
fn default_target_fps() -> usize {
    60
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_target")]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Radians of FOV per scroll unit.
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            target: default_target(),
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            speed: default_speed(),
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

fn default_target() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_speed() -> f32 {
    10.0
}
fn default_sensitivity() -> f32 {
    0.005
}
fn default_zoom_speed() -> f32 {
    0.05
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_light_intensity(),
            ambient: default_ambient(),
            shininess: default_shininess(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_light_intensity() -> f32 {
    7.0
}
fn default_ambient() -> f32 {
    0.025
}
fn default_shininess() -> f32 {
    25.0
}

#[derive(Debug, Deserialize)]
pub struct RenderSettings {
    /// Initial toggle state.
    #[serde(flatten)]
    pub toggles: RenderConfig,
    /// Degrees per second around Y while rotation is on.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_background_color")]
    pub background_color: [f32; 3],
    #[serde(default = "default_gradient_top")]
    pub background_gradient_top: [f32; 3],
    #[serde(default = "default_gradient_bottom")]
    pub background_gradient_bottom: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            toggles: RenderConfig::default(),
            rotation_speed: default_rotation_speed(),
            background_color: default_background_color(),
            background_gradient_top: default_gradient_top(),
            background_gradient_bottom: default_gradient_bottom(),
        }
    }
}

fn default_rotation_speed() -> f32 {
    45.0
}
fn default_background_color() -> [f32; 3] {
    [0.39, 0.39, 0.39]
}
fn default_gradient_top() -> [f32; 3] {
    [0.2, 0.2, 0.3]
}
fn default_gradient_bottom() -> [f32; 3] {
    [0.05, 0.05, 0.1]
}

#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topology: Topology,

    // --- Transform ---
    #[serde(default = "default_mesh_position")]
    pub position: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    // --- Material ---
    pub diffuse_color: Option<[f32; 3]>,
    pub specular_intensity: Option<f32>,
    pub gloss: Option<f32>,
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub gloss_texture: Option<String>,
}

fn default_mesh_position() -> [f32; 3] {
    [0.0, 0.0, 50.0]
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse TOML: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Read(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rasterizer::CullMode;
    use crate::pipeline::render_config::LightMode;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.window.height, 480);
        assert_eq!(cfg.camera.target, [0.0, 0.0, 1.0]);
        assert_eq!(cfg.light.intensity, 7.0);
        assert_eq!(cfg.render.toggles, RenderConfig::default());
        assert!(cfg.meshes.is_empty());
    }

    #[test]
    fn full_scene_parses() {
        let cfg: Config = toml::from_str(
            r#"
            [window]
            width = 800
            height = 600

            [render]
            light_mode = "specular"
            cull_mode = "front"
            rotate = false
            rotation_speed = 90.0

            [[meshes]]
            path = "assets/vehicle.obj"
            topology = "triangle_strip"
            diffuse_texture = "assets/vehicle_diffuse.png"

            [[meshes]]
            path = "assets/cube.obj"
            position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.window.width, 800);
        assert_eq!(cfg.window.title, "Dual Rasterizer");
        assert_eq!(cfg.render.toggles.light_mode, LightMode::Specular);
        assert_eq!(cfg.render.toggles.cull_mode, CullMode::Front);
        assert!(!cfg.render.toggles.rotate);
        assert_eq!(cfg.render.rotation_speed, 90.0);
        assert_eq!(cfg.meshes.len(), 2);
        assert_eq!(cfg.meshes[0].topology, Topology::TriangleStrip);
        assert_eq!(cfg.meshes[0].position, [0.0, 0.0, 50.0]);
        assert_eq!(cfg.meshes[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(cfg.meshes[1].scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = Config::load("/no/such/scene.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let path = std::env::temp_dir().join("dual_rasterizer_bad_config.toml");
        std::fs::write(&path, "[window\nwidth = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = std::fs::remove_file(path);
    }
}
