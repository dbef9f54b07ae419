use crate::core::math::transform::apply_perspective_division;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use serde::Deserialize;
use std::ops::{Add, Mul};

/// Represents a single vertex in mesh space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent (xyz) and bitangent handedness (w, +1 or -1) for normal mapping.
    pub tangent: Vector4<f32>,
    /// Optional per-vertex color. Treated as white when absent.
    pub color: Option<Vector3<f32>>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
            tangent: Vector4::new(1.0, 0.0, 0.0, 1.0),
            color: None,
        }
    }

    pub fn with_tangent(mut self, tangent: Vector4<f32>) -> Self {
        self.tangent = tangent;
        self
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = Some(color);
        self
    }
}

/// Attributes carried from the vertex stage to the pixel shader.
///
/// Every field is interpolated perspective-correctly across the triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Varying {
    /// Position in world space.
    pub world_pos: Vector3<f32>,
    /// Normal in world space (rotation only).
    pub normal: Vector3<f32>,
    /// Tangent in world space, w keeps the handedness.
    pub tangent: Vector4<f32>,
    /// normalize(world position - camera position).
    pub view_dir: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub color: Vector3<f32>,
}

impl Add for Varying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            world_pos: self.world_pos + other.world_pos,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_dir: self.view_dir + other.view_dir,
            uv: self.uv + other.uv,
            color: self.color + other.color,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            world_pos: self.world_pos * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_dir: self.view_dir * scalar,
            uv: self.uv * scalar,
            color: self.color * scalar,
        }
    }
}

/// A vertex after the per-frame transformation.
///
/// Created fresh every frame by the vertex transformer and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformedVertex {
    /// Homogeneous clip-space position, before the perspective divide.
    pub clip: Vector4<f32>,
    /// x, y in pixels (top-left origin), z = NDC depth in [0, 1].
    pub screen: Point3<f32>,
    pub varying: Varying,
}

impl TransformedVertex {
    /// The clip-space w, i.e. the view-space distance along the view axis.
    #[inline(always)]
    pub fn w(&self) -> f32 {
        self.clip.w
    }

    /// Normalized device coordinates (x, y in [-1, 1], z in [0, 1] when visible).
    #[inline]
    pub fn ndc(&self) -> Vector3<f32> {
        apply_perspective_division(&self.clip).coords
    }
}

/// How an index list is assembled into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every three indices form one triangle.
    #[default]
    TriangleList,
    /// A sliding window of three indices; every odd triangle has its last two
    /// indices swapped so that all triangles keep the same winding.
    TriangleStrip,
}

impl Topology {
    /// Assembles index triples from an index buffer.
    ///
    /// Strip windows that repeat an index (restart markers) are skipped.
    pub fn assemble(self, indices: &[u32]) -> Vec<[u32; 3]> {
        match self {
            Topology::TriangleList => indices
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect(),
            Topology::TriangleStrip => indices
                .windows(3)
                .enumerate()
                .filter(|(_, w)| w[0] != w[1] && w[1] != w[2] && w[0] != w[2])
                .map(|(i, w)| {
                    if i % 2 == 0 {
                        [w[0], w[1], w[2]]
                    } else {
                        [w[0], w[2], w[1]]
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_groups_indices_in_threes() {
        let tris = Topology::TriangleList.assemble(&[0, 1, 2, 2, 1, 3, 7]);
        assert_eq!(tris, vec![[0, 1, 2], [2, 1, 3]]);
    }

    #[test]
    fn strip_alternates_winding() {
        let tris = Topology::TriangleStrip.assemble(&[0, 1, 2, 3, 4]);
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2], [2, 3, 4]]);
    }

    #[test]
    fn strip_skips_restart_windows() {
        // 3 is repeated to restart the strip; both windows containing the pair are dropped.
        let tris = Topology::TriangleStrip.assemble(&[0, 1, 3, 3, 4, 5]);
        assert_eq!(tris, vec![[0, 1, 3], [3, 5, 4]]);
    }

    #[test]
    fn varying_is_linear() {
        let a = Varying {
            world_pos: Vector3::new(1.0, 2.0, 3.0),
            normal: Vector3::new(0.0, 1.0, 0.0),
            tangent: Vector4::new(1.0, 0.0, 0.0, 1.0),
            view_dir: Vector3::new(0.0, 0.0, 1.0),
            uv: Vector2::new(0.5, 0.25),
            color: Vector3::new(1.0, 1.0, 1.0),
        };
        let sum = a * 0.25 + a * 0.75;
        assert_eq!(sum, a);
    }
}
