use crate::core::geometry::{TransformedVertex, Varying, Vertex};
use crate::core::math::transform::{MIN_CLIP_W, apply_perspective_division, ndc_to_screen};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use rayon::prelude::*;

/// Mesh space -> clip space -> screen space, plus the world-space varyings.
pub struct VertexTransformer {
    view_projection: Matrix4<f32>,
    camera_position: Point3<f32>,
    width: f32,
    height: f32,
}

impl VertexTransformer {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        Self {
            view_projection: camera.view_projection(),
            camera_position: camera.position(),
            width: width as f32,
            height: height as f32,
        }
    }

    /// Transforms a single vertex.
    ///
    /// `rotation` is the rotation part of `world`; normals and tangents use it alone.
    pub fn transform_vertex(
        &self,
        vertex: &Vertex,
        world: &Matrix4<f32>,
        rotation: &Matrix3<f32>,
    ) -> TransformedVertex {
        let world_pos = world * vertex.position.to_homogeneous();
        let clip = self.view_projection * world_pos;

        // Vertices with w <= MIN_CLIP_W divide to the origin; their triangles are rejected.
        let ndc = apply_perspective_division(&clip);
        let s = ndc_to_screen(ndc.x, ndc.y, self.width, self.height);

        let world_pos = world_pos.xyz();
        let tangent_dir = rotation * vertex.tangent.xyz();

        TransformedVertex {
            clip,
            screen: Point3::new(s.x, s.y, ndc.z),
            varying: Varying {
                world_pos,
                normal: rotation * vertex.normal,
                tangent: Vector4::new(tangent_dir.x, tangent_dir.y, tangent_dir.z, vertex.tangent.w),
                view_dir: (world_pos - self.camera_position.coords)
                    .try_normalize(1e-8)
                    .unwrap_or_else(Vector3::z),
                uv: vertex.texcoord,
                color: vertex.color.unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0)),
            },
        }
    }

    /// Fills `mesh.transformed` with one output per vertex, in order.
    pub fn transform_mesh(&self, mesh: &mut Mesh) {
        let world = mesh.transform.matrix();
        let rotation = mesh.transform.rotation_matrix();

        mesh.vertices
            .par_iter()
            .map(|v| self.transform_vertex(v, &world, &rotation))
            .collect_into_vec(&mut mesh.transformed);
    }
}

/// True when the triangle cannot touch the view volume.
///
/// All three vertices outside the same clip plane, or any vertex at or behind the eye
/// (w <= `MIN_CLIP_W`, no clipping is done).
pub fn is_trivially_rejected(tri: [&TransformedVertex; 3]) -> bool {
    if tri.iter().any(|v| v.w() <= MIN_CLIP_W) {
        return true;
    }
    let ndc = tri.map(|v| v.ndc());
    let all = |f: fn(&Vector3<f32>) -> bool| ndc.iter().all(f);

    all(|p| p.x > 1.0)
        || all(|p| p.x < -1.0)
        || all(|p| p.y > 1.0)
        || all(|p| p.y < -1.0)
        || all(|p| p.z < 0.0)
        || all(|p| p.z > 1.0)
}
