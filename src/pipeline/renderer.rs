use crate::core::framebuffer::{ClearOptions, DEPTH_CLEAR, FrameBuffer};
use crate::core::rasterizer::{Coverage, Rasterizer};
use crate::pipeline::render_config::{BackgroundMode, RenderConfig};
use crate::pipeline::shader::PixelShader;
use crate::pipeline::vertex::{VertexTransformer, is_trivially_rejected};
use crate::scene::context::RenderContext;
use nalgebra::Vector3;
use std::fmt;

/// Background colors for both background modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPalette {
    pub uniform: Vector3<f32>,
    pub gradient_top: Vector3<f32>,
    pub gradient_bottom: Vector3<f32>,
}

impl Default for BackgroundPalette {
    fn default() -> Self {
        Self {
            uniform: Vector3::new(0.39, 0.39, 0.39),
            gradient_top: Vector3::new(0.2, 0.2, 0.3),
            gradient_bottom: Vector3::new(0.05, 0.05, 0.1),
        }
    }
}

impl BackgroundPalette {
    fn clear_options(&self, mode: BackgroundMode) -> ClearOptions {
        ClearOptions {
            color: self.uniform,
            gradient: match mode {
                BackgroundMode::Uniform => None,
                BackgroundMode::Gradient => Some((self.gradient_top, self.gradient_bottom)),
            },
            depth: DEPTH_CLEAR,
        }
    }
}

/// Per-frame triangle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub rejected: usize,
    pub culled: usize,
    pub degenerate: usize,
    pub pixels_written: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} triangles ({} rejected, {} culled, {} degenerate), {} pixels",
            self.submitted, self.rejected, self.culled, self.degenerate, self.pixels_written
        )
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub palette: BackgroundPalette,
}

impl Renderer {
    pub fn new(width: usize, height: usize, palette: BackgroundPalette) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            palette,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.framebuffer.resize(width, height);
    }

    /// Renders one frame: clear, transform every mesh, rasterize every triangle.
    ///
    /// Triangles are drawn in mesh order, then index order.
    pub fn render_frame(&mut self, context: &mut RenderContext, config: &RenderConfig) -> FrameStats {
        self.framebuffer
            .clear_with_options(&self.palette.clear_options(config.background));

        let transformer = VertexTransformer::new(
            &context.camera,
            self.framebuffer.width(),
            self.framebuffer.height(),
        );

        let mut stats = FrameStats::default();
        for object in &mut context.objects {
            transformer.transform_mesh(&mut object.mesh);

            let shader = PixelShader::new(&context.light, &object.material, config);
            let transformed = &object.mesh.transformed;

            for &[i0, i1, i2] in object.mesh.triangles() {
                stats.submitted += 1;
                let tri = [
                    &transformed[i0 as usize],
                    &transformed[i1 as usize],
                    &transformed[i2 as usize],
                ];
                if is_trivially_rejected(tri) {
                    stats.rejected += 1;
                    continue;
                }

                match self
                    .rasterizer
                    .rasterize_triangle(&mut self.framebuffer, &shader, tri, config)
                {
                    Coverage::Drawn(n) => stats.pixels_written += n,
                    Coverage::Culled => stats.culled += 1,
                    Coverage::Degenerate => stats.degenerate += 1,
                }
            }
        }
        stats
    }

    /// The finished color buffer.
    pub fn present(&self) -> &[u32] {
        self.framebuffer.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render_config::LightMode;
    use crate::scene::camera::Camera;
    use crate::scene::light::DirectionalLight;
    use crate::scene::material::Material;
    use crate::scene::mesh::{Mesh, MeshTransform};
    use crate::scene::scene_object::SceneObject;
    use nalgebra::Point3;

    fn quad_scene() -> RenderContext {
        let mesh = Mesh::create_test_quad().with_transform(MeshTransform {
            translation: Vector3::new(0.0, 0.0, 5.0),
            ..Default::default()
        });
        RenderContext {
            camera: Camera::new_perspective(
                Point3::origin(),
                Point3::new(0.0, 0.0, 1.0),
                Vector3::y(),
                45f32.to_radians(),
                4.0 / 3.0,
                0.1,
                100.0,
            ),
            light: DirectionalLight::default(),
            objects: vec![SceneObject::new("quad", mesh, Material::default())],
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn quad_covers_the_center() {
        let mut renderer = Renderer::new(64, 48, BackgroundPalette::default());
        let mut ctx = quad_scene();
        let stats = renderer.render_frame(&mut ctx, &RenderConfig::default());

        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.culled, 0);
        assert!(stats.pixels_written > 0);
        assert!(renderer.framebuffer.get_depth(32, 24).unwrap() < DEPTH_CLEAR);
        // Corners are background.
        assert_eq!(renderer.framebuffer.get_depth(0, 0), Some(DEPTH_CLEAR));
    }

    #[test]
    fn light_mode_changes_color_but_not_depth() {
        let mut ctx = quad_scene();
        let mut a = Renderer::new(64, 48, BackgroundPalette::default());
        let mut b = Renderer::new(64, 48, BackgroundPalette::default());
        a.render_frame(&mut ctx, &RenderConfig::default());
        b.render_frame(
            &mut ctx,
            &RenderConfig {
                light_mode: LightMode::ObservedArea,
                ..Default::default()
            },
        );
        assert_eq!(a.framebuffer.depth_buffer(), b.framebuffer.depth_buffer());
        assert_ne!(a.present(), b.present());
    }

    #[test]
    fn object_behind_the_camera_is_rejected() {
        let mut ctx = quad_scene();
        ctx.objects[0].mesh.transform.translation.z = -5.0;
        let mut renderer = Renderer::new(32, 32, BackgroundPalette::default());
        let stats = renderer.render_frame(&mut ctx, &RenderConfig::default());
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.pixels_written, 0);
    }

    #[test]
    fn gradient_background_varies_by_row() {
        let mut ctx = quad_scene();
        ctx.objects.clear();
        let mut renderer = Renderer::new(8, 8, BackgroundPalette::default());
        let config = RenderConfig {
            background: BackgroundMode::Gradient,
            ..Default::default()
        };
        renderer.render_frame(&mut ctx, &config);
        let fb = &renderer.framebuffer;
        assert_ne!(fb.get_pixel(0, 0), fb.get_pixel(0, 7));
        assert_eq!(fb.get_pixel(0, 3), fb.get_pixel(7, 3));
    }
}
