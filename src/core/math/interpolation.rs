use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Edge function of point `p` against the directed edge `a -> b`.
///
/// This is the 2D cross product (b - a) x (p - a), i.e. twice the signed area
/// of the triangle (a, b, p). On a y-down screen it is positive when `a, b, p`
/// wind clockwise.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Twice the signed screen-space area of a triangle. Positive = clockwise on screen.
#[inline(always)]
pub fn signed_area(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v0, v1, v2)
}

/// Whether `a -> b` is a top or left edge of a clockwise (positive area) triangle.
///
/// Top edges are exactly horizontal and run left to right; left edges run upwards.
#[inline(always)]
pub fn is_top_left(a: Point2<f32>, b: Point2<f32>) -> bool {
    (a.y == b.y && b.x > a.x) || b.y < a.y
}

/// Coverage test for a single edge value under the top-left fill rule.
///
/// `clockwise` is the sign of the triangle's area. Pixels exactly on an edge are
/// only owned by top and left edges, so two triangles sharing an edge never both
/// cover the same pixel.
#[inline(always)]
pub fn edge_covers(value: f32, a: Point2<f32>, b: Point2<f32>, clockwise: bool) -> bool {
    let (value, top_left) = if clockwise {
        (value, is_top_left(a, b))
    } else {
        (-value, is_top_left(b, a))
    };
    value > 0.0 || (value == 0.0 && top_left)
}

/// Compute perspective-correct barycentric coordinates (alpha', beta', gamma').
///
/// With screen-space weights λᵢ and clip w values wᵢ:
///   inv_w = Σ λᵢ / wᵢ
///   λᵢ'   = (λᵢ / wᵢ) / inv_w
///
/// Interpolating an attribute with λ' is the same as Σ(λᵢ·aᵢ/wᵢ) / inv_w.
/// Returns the corrected weights and the interpolated 1/w, or `None` when the
/// interpolated 1/w is not positive (the point lies behind the eye).
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w: [f32; 3],
) -> Option<(Vector3<f32>, f32)> {
    let wa = bary.x / w[0];
    let wb = bary.y / w[1];
    let wc = bary.z / w[2];

    let inv_w = wa + wb + wc;
    if inv_w <= EPSILON * EPSILON || !inv_w.is_finite() {
        return None;
    }
    let w_pixel = 1.0 / inv_w;
    Some((Vector3::new(wa * w_pixel, wb * w_pixel, wc * w_pixel), inv_w))
}

/// Weighted sum of three per-vertex values.
#[inline(always)]
pub fn interpolate<T: Interpolatable>(values: [T; 3], weights: Vector3<f32>) -> T {
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}
