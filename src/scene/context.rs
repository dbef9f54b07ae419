use crate::pipeline::render_config::RenderConfig;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::scene_object::SceneObject;
use std::f32::consts::TAU;

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub light: DirectionalLight,
    pub objects: Vec<SceneObject>,
    /// Y rotation applied to every object while rotation is enabled, radians per second.
    pub rotation_speed: f32,
}

impl RenderContext {
    /// Advances the animation by `dt` seconds.
    pub fn update(&mut self, dt: f32, config: &RenderConfig) {
        if !config.rotate {
            return;
        }
        let delta = self.rotation_speed * dt;
        for object in &mut self.objects {
            let rotation = &mut object.mesh.transform.rotation;
            rotation.y = (rotation.y + delta) % TAU;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }
}
