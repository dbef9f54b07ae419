use crate::core::rasterizer::CullMode;
use crate::scene::texture::TextureFilter;
use log::{info, warn};
use serde::Deserialize;
use std::fmt;

/// Which part of the lighting equation ends up in the color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightMode {
    /// ambient + diffuse * observed area + specular
    #[default]
    Combined,
    Diffuse,
    Specular,
    /// The cosine term alone, as grayscale.
    ObservedArea,
}

impl LightMode {
    pub fn next(self) -> Self {
        match self {
            LightMode::Combined => LightMode::Diffuse,
            LightMode::Diffuse => LightMode::Specular,
            LightMode::Specular => LightMode::ObservedArea,
            LightMode::ObservedArea => LightMode::Combined,
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightMode::Combined => "Combined",
            LightMode::Diffuse => "Diffuse",
            LightMode::Specular => "Specular",
            LightMode::ObservedArea => "ObservedArea",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Uniform,
    /// Vertical gradient, top to bottom.
    Gradient,
}

impl BackgroundMode {
    pub fn next(self) -> Self {
        match self {
            BackgroundMode::Uniform => BackgroundMode::Gradient,
            BackgroundMode::Gradient => BackgroundMode::Uniform,
        }
    }
}

/// Rendering backend. Only the software path is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Software,
    Hardware,
}

/// Per-frame switches consumed by the rasterizer and the pixel shader.
///
/// A snapshot is taken once per frame and shared read-only with every worker.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub backend: Backend,
    pub light_mode: LightMode,
    pub cull_mode: CullMode,
    pub normal_mapping: bool,
    pub show_depth: bool,
    pub show_bounding_box: bool,
    pub background: BackgroundMode,
    pub filter: TextureFilter,
    pub rotate: bool,
    /// Depth mapped to black in the depth visualization.
    pub depth_remap_min: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Software,
            light_mode: LightMode::Combined,
            cull_mode: CullMode::Back,
            normal_mapping: true,
            show_depth: false,
            show_bounding_box: false,
            background: BackgroundMode::Uniform,
            filter: TextureFilter::Point,
            rotate: true,
            depth_remap_min: 0.995,
        }
    }
}

impl fmt::Display for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Cull: {} | Filter: {}",
            self.light_mode, self.cull_mode, self.filter
        )?;
        if !self.normal_mapping {
            write!(f, " | NormalMap off")?;
        }
        if self.show_depth {
            write!(f, " | Depth")?;
        }
        if self.show_bounding_box {
            write!(f, " | BBox")?;
        }
        Ok(())
    }
}

/// A user request to flip one rendering switch between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCommand {
    Backend,
    Rotation,
    TextureFilter,
    LightMode,
    NormalMapping,
    DepthVisualization,
    BoundingBox,
    CullMode,
    Background,
}

/// Mutable toggle state owned by the application loop.
#[derive(Debug, Clone, Default)]
pub struct Toggles {
    config: RenderConfig,
}

impl Toggles {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn apply(&mut self, command: ToggleCommand) {
        let c = &mut self.config;
        match command {
            ToggleCommand::Backend => {
                warn!("Hardware backend is not available, staying on the software rasterizer");
                c.backend = Backend::Software;
                return;
            }
            ToggleCommand::Rotation => c.rotate = !c.rotate,
            ToggleCommand::TextureFilter => c.filter = c.filter.next(),
            ToggleCommand::LightMode => c.light_mode = c.light_mode.next(),
            ToggleCommand::NormalMapping => c.normal_mapping = !c.normal_mapping,
            ToggleCommand::DepthVisualization => c.show_depth = !c.show_depth,
            ToggleCommand::BoundingBox => c.show_bounding_box = !c.show_bounding_box,
            ToggleCommand::CullMode => c.cull_mode = c.cull_mode.next(),
            ToggleCommand::Background => c.background = c.background.next(),
        }
        info!("{:?} toggled: {}", command, c);
    }

    /// The immutable configuration for the next frame.
    pub fn snapshot(&self) -> RenderConfig {
        self.config
    }
}
