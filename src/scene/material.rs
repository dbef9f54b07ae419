use crate::scene::texture::Texture;
use nalgebra::Vector3;
use std::sync::Arc;

/// Surface parameters for the Phong-style shader.
///
/// Every map is optional; unbound maps fall back to the scalar values.
#[derive(Debug, Clone)]
pub struct Material {
    pub diffuse_texture: Option<Arc<Texture>>,
    /// Tangent-space normal map, channels in [0, 1].
    pub normal_texture: Option<Arc<Texture>>,
    /// Specular intensity in the red channel.
    pub specular_texture: Option<Arc<Texture>>,
    /// Gloss (exponent scale) in the red channel.
    pub gloss_texture: Option<Arc<Texture>>,

    pub diffuse_color: Vector3<f32>,
    pub specular_intensity: f32,
    pub gloss: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_texture: None,
            normal_texture: None,
            specular_texture: None,
            gloss_texture: None,
            diffuse_color: Vector3::new(0.8, 0.8, 0.8),
            specular_intensity: 0.5,
            gloss: 1.0,
        }
    }
}
