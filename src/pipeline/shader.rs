use crate::core::color::saturate;
use crate::core::geometry::Varying;
use crate::core::pipeline::Shader;
use crate::pipeline::render_config::{LightMode, RenderConfig};
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use nalgebra::Vector3;
use std::f32::consts::PI;

/// Phong-style pixel shader: lambert diffuse, reflected-ray specular, constant ambient.
pub struct PixelShader<'a> {
    pub light: &'a DirectionalLight,
    pub material: &'a Material,
    pub config: &'a RenderConfig,
}

impl<'a> PixelShader<'a> {
    pub fn new(light: &'a DirectionalLight, material: &'a Material, config: &'a RenderConfig) -> Self {
        Self {
            light,
            material,
            config,
        }
    }

    fn albedo(&self, varying: &Varying) -> Vector3<f32> {
        let base = match &self.material.diffuse_texture {
            Some(tex) => tex.sample(varying.uv.x, varying.uv.y, self.config.filter).xyz(),
            None => self.material.diffuse_color,
        };
        base.component_mul(&varying.color)
    }

    /// The interpolated normal, perturbed by the normal map when enabled and bound.
    fn surface_normal(&self, varying: &Varying) -> Vector3<f32> {
        let normal = varying.normal.try_normalize(1e-8).unwrap_or_else(Vector3::z);

        let Some(normal_map) = self
            .material
            .normal_texture
            .as_ref()
            .filter(|_| self.config.normal_mapping)
        else {
            return normal;
        };

        let Some(tangent) = varying.tangent.xyz().try_normalize(1e-8) else {
            return normal;
        };
        let handedness = if varying.tangent.w < 0.0 { -1.0 } else { 1.0 };
        let binormal = normal.cross(&tangent) * handedness;

        // [0, 1] -> [-1, 1]
        let sampled = normal_map
            .sample(varying.uv.x, varying.uv.y, self.config.filter)
            .xyz()
            .map(|c| c * 2.0 - 1.0);

        (tangent * sampled.x + binormal * sampled.y + normal * sampled.z)
            .try_normalize(1e-8)
            .unwrap_or(normal)
    }

    fn specular_params(&self, varying: &Varying) -> (f32, f32) {
        let sample_red = |tex: &crate::scene::texture::Texture| {
            tex.sample(varying.uv.x, varying.uv.y, self.config.filter).x
        };
        let ks = self
            .material
            .specular_texture
            .as_deref()
            .map_or(self.material.specular_intensity, sample_red);
        let gloss = self
            .material
            .gloss_texture
            .as_deref()
            .map_or(self.material.gloss, sample_red);
        (ks, gloss)
    }
}

/// Reflects the incident direction `i` about the normal `n`.
#[inline]
fn reflect(i: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    i - n * (2.0 * n.dot(i))
}

impl Shader for PixelShader<'_> {
    fn fragment(&self, varying: &Varying) -> Vector3<f32> {
        let light_dir = self.light.direction;
        let n = self.surface_normal(varying);

        let observed = n.dot(&self.light.to_light()).clamp(0.0, 1.0);
        let diffuse = self.albedo(varying) * (self.light.intensity / PI);

        let (ks, gloss) = self.specular_params(varying);
        let r = reflect(&light_dir, &n);
        let spec = ks * r.dot(&-varying.view_dir).clamp(0.0, 1.0).powf(gloss * self.light.shininess);
        let specular = Vector3::new(spec, spec, spec);

        let color = match self.config.light_mode {
            LightMode::Combined => {
                let ambient = Vector3::repeat(self.light.ambient);
                saturate(ambient) + saturate(diffuse * observed) + saturate(specular)
            }
            LightMode::Diffuse => diffuse * observed,
            LightMode::Specular => specular,
            LightMode::ObservedArea => Vector3::repeat(observed),
        };
        saturate(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector4};
    use std::sync::Arc;

    /// Surface facing straight into the light, viewed head on.
    fn lit_varying() -> Varying {
        let light = DirectionalLight::default();
        Varying {
            world_pos: Vector3::zeros(),
            normal: light.to_light(),
            tangent: Vector4::new(1.0, 0.0, 0.0, 1.0),
            view_dir: light.direction,
            uv: Vector2::new(0.5, 0.5),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    fn shade(material: &Material, config: &RenderConfig, varying: &Varying) -> Vector3<f32> {
        let light = DirectionalLight::default();
        PixelShader::new(&light, material, config).fragment(varying)
    }

    fn mode(light_mode: LightMode) -> RenderConfig {
        RenderConfig {
            light_mode,
            ..Default::default()
        }
    }

    #[test]
    fn observed_area_is_gray_cosine() {
        let c = shade(&Material::default(), &mode(LightMode::ObservedArea), &lit_varying());
        assert_relative_eq!(c, Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-5);

        let mut grazing = lit_varying();
        grazing.normal = Vector3::new(0.0, 0.0, 1.0).cross(&grazing.normal);
        let c = shade(&Material::default(), &mode(LightMode::ObservedArea), &grazing);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn diffuse_uses_default_albedo_when_unbound() {
        let light = DirectionalLight {
            intensity: 1.0,
            ..Default::default()
        };
        let material = Material::default();
        let config = mode(LightMode::Diffuse);
        let c = PixelShader::new(&light, &material, &config).fragment(&lit_varying());
        assert_relative_eq!(c.x, 0.8 / PI, epsilon = 1e-5);
        assert_relative_eq!(c.x, c.z);
    }

    #[test]
    fn specular_peaks_on_the_mirror_direction() {
        // View straight down the reflected ray: dot(r, -view) = 1 so specular = ks.
        let c = shade(&Material::default(), &mode(LightMode::Specular), &lit_varying());
        assert_relative_eq!(c.x, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn specular_vanishes_away_from_the_reflection() {
        let mut v = lit_varying();
        v.view_dir = -v.view_dir;
        let c = shade(&Material::default(), &mode(LightMode::Specular), &v);
        assert_relative_eq!(c.x, 0.0);
    }

    #[test]
    fn combined_is_clamped() {
        let c = shade(&Material::default(), &mode(LightMode::Combined), &lit_varying());
        assert!(c.iter().all(|&ch| (0.0..=1.0).contains(&ch)));
        assert_relative_eq!(c.x, 1.0);
    }

    #[test]
    fn unlit_side_keeps_only_ambient() {
        let mut v = lit_varying();
        v.normal = -v.normal;
        v.view_dir = -v.view_dir;
        let c = shade(&Material::default(), &mode(LightMode::Combined), &v);
        assert_relative_eq!(c, Vector3::repeat(0.025), epsilon = 1e-6);
    }

    #[test]
    fn flat_normal_map_keeps_the_vertex_normal() {
        let flat = Texture::from_rgba(1, 1, vec![128, 128, 255, 255]).unwrap();
        let material = Material {
            normal_texture: Some(Arc::new(flat)),
            ..Default::default()
        };
        let with_map = shade(&material, &mode(LightMode::ObservedArea), &lit_varying());
        let without = shade(&Material::default(), &mode(LightMode::ObservedArea), &lit_varying());
        assert_relative_eq!(with_map, without, epsilon = 1e-3);
    }

    #[test]
    fn normal_map_is_ignored_when_disabled() {
        // Map points the normal along the tangent.
        let sideways = Texture::from_rgba(1, 1, vec![255, 128, 128, 255]).unwrap();
        let material = Material {
            normal_texture: Some(Arc::new(sideways)),
            ..Default::default()
        };
        let mut v = lit_varying();
        v.normal = Vector3::new(0.0, 1.0, 0.0);
        v.tangent = Vector4::new(1.0, 0.0, 0.0, 1.0);

        let disabled = RenderConfig {
            light_mode: LightMode::ObservedArea,
            normal_mapping: false,
            ..Default::default()
        };
        let enabled = mode(LightMode::ObservedArea);
        let plain = shade(&Material::default(), &disabled, &v);
        assert_relative_eq!(shade(&material, &disabled, &v), plain);
        assert!((shade(&material, &enabled, &v).x - plain.x).abs() > 0.1);
    }
}
