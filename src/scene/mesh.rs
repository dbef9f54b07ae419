use crate::core::geometry::{Topology, TransformedVertex, Vertex};
use crate::core::math::transform::{TransformFactory, linear_part};
use log::warn;
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3};

/// Placement of a mesh in the world. Rotation is Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl MeshTransform {
    /// World matrix (T * R * S).
    pub fn matrix(&self) -> Matrix4<f32> {
        TransformFactory::world(&self.translation, &self.rotation, &self.scale)
    }

    /// Rotation part only, used for normals and tangents.
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        linear_part(&TransformFactory::rotation_euler(&self.rotation))
    }
}

/// A collection of vertices and indices representing a 3D object.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
    pub transform: MeshTransform,
    /// Assembled, index-validated triangles.
    triangles: Vec<[u32; 3]>,
    /// Per-frame output of the vertex stage, one entry per vertex.
    pub transformed: Vec<TransformedVertex>,
}

impl Mesh {
    /// Triangles referencing a vertex that does not exist are dropped with a warning.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: Topology) -> Self {
        let count = vertices.len() as u32;
        let assembled = topology.assemble(&indices);
        let total = assembled.len();
        let triangles: Vec<[u32; 3]> = assembled
            .into_iter()
            .filter(|tri| tri.iter().all(|&i| i < count))
            .collect();

        if triangles.len() != total {
            warn!(
                "Dropped {} triangle(s) with out-of-range indices ({} vertices)",
                total - triangles.len(),
                count
            );
        }

        Self {
            vertices,
            indices,
            topology,
            transform: MeshTransform::default(),
            triangles,
            transformed: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: MeshTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A unit quad facing -Z, drawn as a triangle strip.
    ///
    /// Used when the scene has no meshes configured.
    pub fn create_test_quad() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), normal, Vector2::new(0.0, 1.0)), // Top Left
            Vertex::new(Point3::new(1.0, 1.0, 0.0), normal, Vector2::new(1.0, 1.0)), // Top Right
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), normal, Vector2::new(0.0, 0.0)), // Bottom Left
            Vertex::new(Point3::new(1.0, -1.0, 0.0), normal, Vector2::new(1.0, 0.0)), // Bottom Right
        ];

        Self::new(vertices, vec![0, 1, 2, 3], Topology::TriangleStrip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn out_of_range_triangles_are_dropped() {
        let quad = Mesh::create_test_quad();
        let mesh = Mesh::new(quad.vertices, vec![0, 1, 2, 1, 3, 9], Topology::TriangleList);
        assert_eq!(mesh.triangles(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_quad_is_two_strip_triangles() {
        let quad = Mesh::create_test_quad();
        assert_eq!(quad.triangles(), &[[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn rotation_matrix_ignores_translation_and_scale() {
        let transform = MeshTransform {
            translation: Vector3::new(5.0, 5.0, 5.0),
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vector3::new(3.0, 3.0, 3.0),
        };
        let n = transform.rotation_matrix() * Vector3::x();
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);

        let p = transform.matrix() * Point3::origin().to_homogeneous();
        assert_relative_eq!(p.xyz(), transform.translation);
    }
}
