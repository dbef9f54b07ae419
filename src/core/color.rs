use nalgebra::Vector3;

/// Color written by the bounding-box visualization (opaque white).
pub const BOUNDING_BOX_COLOR: u32 = 0x00FF_FFFF;

/// Packs a linear RGB color into a 0RGB `u32`, clamping each channel to [0, 1].
#[inline]
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0).round() as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0).round() as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0).round() as u32;
    (r << 16) | (g << 8) | b
}

/// Unpacks a 0RGB `u32` into channels in [0, 1].
#[inline]
pub fn unpack_rgb(color: u32) -> Vector3<f32> {
    Vector3::new(
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        (color & 0xFF) as f32 / 255.0,
    )
}

/// Clamps every channel to [0, 1].
#[inline]
pub fn saturate(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Maps a depth in [remap_min, 1] to a grayscale color.
///
/// Perspective depth crowds towards 1.0, so the useful range is stretched.
/// Depths below `remap_min` render black.
pub fn depth_to_grayscale(depth: f32, remap_min: f32) -> Vector3<f32> {
    let range = (1.0 - remap_min).max(f32::EPSILON);
    let v = ((depth - remap_min) / range).clamp(0.0, 1.0);
    Vector3::new(v, v, v)
}
