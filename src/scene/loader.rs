use crate::io::config::{Config, MeshConfig};
use crate::io::error::ParseError;
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::BackgroundPalette;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use crate::scene::mesh::{Mesh, MeshTransform};
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};
use std::path::Path;
use std::sync::Arc;

pub fn build_camera(config: &Config, width: usize, height: usize) -> Camera {
    Camera::new_perspective(
        Point3::from(config.camera.position),
        Point3::from(config.camera.target),
        Vector3::from(config.camera.up),
        config.camera.fov.to_radians(),
        width as f32 / height.max(1) as f32,
        config.camera.near,
        config.camera.far,
    )
}

pub fn build_light(config: &Config) -> DirectionalLight {
    let l = &config.light;
    DirectionalLight {
        ambient: l.ambient,
        shininess: l.shininess,
        ..DirectionalLight::new(Vector3::from(l.direction), l.intensity)
    }
}

pub fn build_palette(config: &Config) -> BackgroundPalette {
    BackgroundPalette {
        uniform: Vector3::from(config.render.background_color),
        gradient_top: Vector3::from(config.render.background_gradient_top),
        gradient_bottom: Vector3::from(config.render.background_gradient_bottom),
    }
}

/// Optional texture: a failed load is a warning and the map stays unbound.
fn load_texture(path: Option<&String>) -> Option<Arc<Texture>> {
    let path = path?;
    match Texture::load(path) {
        Ok(tex) => Some(Arc::new(tex)),
        Err(e) => {
            warn!("{}. Shading falls back to defaults.", e);
            None
        }
    }
}

fn build_material(conf: &MeshConfig) -> Material {
    let defaults = Material::default();
    Material {
        diffuse_texture: load_texture(conf.diffuse_texture.as_ref()),
        normal_texture: load_texture(conf.normal_texture.as_ref()),
        specular_texture: load_texture(conf.specular_texture.as_ref()),
        gloss_texture: load_texture(conf.gloss_texture.as_ref()),
        diffuse_color: conf.diffuse_color.map_or(defaults.diffuse_color, Vector3::from),
        specular_intensity: conf.specular_intensity.unwrap_or(defaults.specular_intensity),
        gloss: conf.gloss.unwrap_or(defaults.gloss),
    }
}

/// Loads one configured mesh with its material and placement.
pub fn load_scene_object(conf: &MeshConfig) -> Result<SceneObject, ParseError> {
    let (vertices, indices) = load_obj(&conf.path)?;

    let transform = MeshTransform {
        translation: Vector3::from(conf.position),
        rotation: Vector3::from(conf.rotation).map(f32::to_radians),
        scale: Vector3::from(conf.scale),
    };
    let mesh = Mesh::new(vertices, indices, conf.topology).with_transform(transform);

    let name = conf.name.clone().unwrap_or_else(|| {
        Path::new(&conf.path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| conf.path.clone())
    });

    Ok(SceneObject::new(name, mesh, build_material(conf)))
}

/// Initial resource loading (Heavy I/O). Returns a RenderContext.
///
/// Meshes that fail to load are logged and left out. With no meshes configured
/// a test quad is placed in front of the camera.
pub fn init_scene(config: &Config, width: usize, height: usize) -> RenderContext {
    let camera = build_camera(config, width, height);

    let mut objects = Vec::with_capacity(config.meshes.len());
    for conf in &config.meshes {
        match load_scene_object(conf) {
            Ok(object) => {
                info!(
                    "Loaded '{}': {} vertices, {} triangles",
                    object.name,
                    object.mesh.vertices.len(),
                    object.mesh.triangle_count()
                );
                objects.push(object);
            }
            Err(e) => error!("Skipping mesh '{}': {}", conf.path, e),
        }
    }

    if config.meshes.is_empty() {
        info!("No meshes configured, using the built-in test quad.");
        let forward = (camera.target - camera.position)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::z);
        let mesh = Mesh::create_test_quad().with_transform(MeshTransform {
            translation: camera.position.coords + forward * 3.0,
            ..Default::default()
        });
        objects.push(SceneObject::new("test quad", mesh, Material::default()));
    }

    RenderContext {
        camera,
        light: build_light(config),
        objects,
        rotation_speed: config.render.rotation_speed.to_radians(),
    }
}
