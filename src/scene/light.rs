use nalgebra::Vector3;

/// The scene's single light: infinitely far away, rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels (normalized).
    pub direction: Vector3<f32>,
    pub intensity: f32,
    /// Constant term added in the combined light mode.
    pub ambient: f32,
    /// Base specular exponent, scaled by the material's gloss.
    pub shininess: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.try_normalize(1e-8).unwrap_or_else(|| Self::default().direction),
            intensity,
            ..Self::default()
        }
    }

    /// Direction FROM the surface TO the light.
    #[inline]
    pub fn to_light(&self) -> Vector3<f32> {
        -self.direction
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.577, -0.577, 0.577).normalize(),
            intensity: 7.0,
            ambient: 0.025,
            shininess: 25.0,
        }
    }
}
