use crate::core::color::{BOUNDING_BOX_COLOR, depth_to_grayscale, pack_rgb};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::TransformedVertex;
use crate::core::math::interpolation::{
    edge_covers, edge_function, interpolate, perspective_correct_barycentric, signed_area,
};
use crate::core::pipeline::Shader;
use crate::pipeline::render_config::RenderConfig;
use nalgebra::{Point2, Vector3};
use rayon::prelude::*;
use serde::Deserialize;
use std::fmt;

/// Twice-area threshold (in square pixels) under which a triangle counts as degenerate.
const DEGENERATE_AREA: f32 = 1e-5;

/// Which triangle orientation is discarded before rasterization.
///
/// Clockwise on screen (positive signed area) is front facing.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    /// Discard triangles with negative signed area.
    #[default]
    Back,
    /// Discard triangles with positive signed area.
    Front,
    /// Rasterize both orientations.
    None,
}

impl CullMode {
    /// Front -> Back -> None -> Front.
    pub fn next(self) -> Self {
        match self {
            CullMode::Front => CullMode::Back,
            CullMode::Back => CullMode::None,
            CullMode::None => CullMode::Front,
        }
    }

    #[inline]
    fn discards(self, area: f32) -> bool {
        match self {
            CullMode::Back => area < 0.0,
            CullMode::Front => area > 0.0,
            CullMode::None => false,
        }
    }
}

impl fmt::Display for CullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CullMode::Back => write!(f, "Back"),
            CullMode::Front => write!(f, "Front"),
            CullMode::None => write!(f, "None"),
        }
    }
}

/// What happened to a triangle handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// The triangle was scanned; holds the number of pixels that passed the depth test.
    Drawn(usize),
    /// Zero signed area.
    Degenerate,
    /// Removed by the active cull mode.
    Culled,
}

/// The Rasterizer turns screen-space triangles into depth-tested, shaded pixels.
///
/// Rows inside a triangle's bounding box are processed in parallel. Every row is a
/// disjoint slice of the frame buffer and a triangle covers each pixel at most once,
/// so no locking is needed; triangles themselves are drawn in submission order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterize a single triangle.
    ///
    /// 1. bounding box, clamped to the viewport
    /// 2. signed area, degenerate triangles are skipped
    /// 3. culling
    /// 4. per pixel: edge functions at the pixel center with the top-left rule
    /// 5. barycentric weights, perspective-corrected with the clip w values
    /// 6. depth test and depth write
    /// 7. debug color or the shader's color
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        vertices: [&TransformedVertex; 3],
        config: &RenderConfig,
    ) -> Coverage {
        let s = vertices.map(|v| Point2::new(v.screen.x, v.screen.y));

        let area = signed_area(s[0], s[1], s[2]);
        if area.abs() < DEGENERATE_AREA || !area.is_finite() {
            return Coverage::Degenerate;
        }
        if config.cull_mode.discards(area) {
            return Coverage::Culled;
        }

        let width = framebuffer.width();
        let height = framebuffer.height();
        let Some((min_x, min_y, max_x, max_y)) = clamped_bounding_box(&s, width, height) else {
            return Coverage::Drawn(0);
        };

        let clockwise = area > 0.0;
        let inv_area = 1.0 / area;
        let w = vertices.map(|v| v.w());
        let depths = Vector3::new(vertices[0].screen.z, vertices[1].screen.z, vertices[2].screen.z);
        let varyings = vertices.map(|v| v.varying);
        let fill_bounding_box = config.show_bounding_box;

        let (colors, depth_rows) = framebuffer.rows_mut(min_y, max_y);

        colors
            .par_chunks_mut(width)
            .zip(depth_rows.par_chunks_mut(width))
            .enumerate()
            .map(|(row, (color_row, depth_row))| {
                let y = min_y + row;
                let mut written = 0;

                for x in min_x..=max_x {
                    let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                    let e0 = edge_function(s[1], s[2], p);
                    let e1 = edge_function(s[2], s[0], p);
                    let e2 = edge_function(s[0], s[1], p);

                    let inside = edge_covers(e0, s[1], s[2], clockwise)
                        && edge_covers(e1, s[2], s[0], clockwise)
                        && edge_covers(e2, s[0], s[1], clockwise);
                    if !inside && !fill_bounding_box {
                        continue;
                    }

                    let bary = Vector3::new(e0, e1, e2) * inv_area;
                    let Some((weights, _inv_w)) = perspective_correct_barycentric(bary, w) else {
                        continue;
                    };

                    let depth = weights.dot(&depths);
                    if !(0.0..=1.0).contains(&depth) || depth >= depth_row[x] {
                        continue;
                    }
                    depth_row[x] = depth;

                    color_row[x] = if fill_bounding_box {
                        BOUNDING_BOX_COLOR
                    } else if config.show_depth {
                        pack_rgb(depth_to_grayscale(depth, config.depth_remap_min))
                    } else {
                        pack_rgb(shader.fragment(&interpolate(varyings, weights)))
                    };
                    written += 1;
                }
                written
            })
            .sum::<usize>()
            .into()
    }
}

impl From<usize> for Coverage {
    fn from(written: usize) -> Self {
        Coverage::Drawn(written)
    }
}

/// Pixel bounding box of three screen points, clamped to `[0, width) x [0, height)`.
///
/// Returns `None` when the box lies completely outside the viewport.
fn clamped_bounding_box(
    points: &[Point2<f32>; 3],
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    if width == 0 || height == 0 {
        return None;
    }
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor();
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor();
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil();
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil();

    // Scissor Test
    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return None;
    }

    let clamp = |v: f32, limit: usize| v.clamp(0.0, (limit - 1) as f32) as usize;
    Some((
        clamp(min_x, width),
        clamp(min_y, height),
        clamp(max_x, width),
        clamp(max_y, height),
    ))
}
