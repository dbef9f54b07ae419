use crate::core::geometry::Varying;
use nalgebra::Vector3;
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync {}

impl<T> Interpolatable for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> + Send + Sync {}

/// The per-pixel stage of the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) because rows of a triangle
/// are shaded concurrently.
pub trait Shader: Send + Sync {
    /// Computes the color of a covered pixel from its interpolated attributes.
    ///
    /// The returned color is linear RGB; the frame buffer clamps it to [0, 1]
    /// before packing.
    fn fragment(&self, varying: &Varying) -> Vector3<f32>;
}

/// A shader that ignores its input. Handy for coverage tests and debug passes.
#[derive(Debug, Clone, Copy)]
pub struct SolidShader(pub Vector3<f32>);

impl Shader for SolidShader {
    #[inline]
    fn fragment(&self, _varying: &Varying) -> Vector3<f32> {
        self.0
    }
}
