use crate::core::color::pack_rgb;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Far plane value the depth buffer is cleared to.
pub const DEPTH_CLEAR: f32 = 1.0;

/// How the color buffer is reset at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearOptions {
    /// Uniform fill color, used when no gradient is set.
    pub color: Vector3<f32>,
    /// Vertical gradient (top, bottom). Overrides `color`.
    pub gradient: Option<(Vector3<f32>, Vector3<f32>)>,
    pub depth: f32,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            color: Vector3::zeros(),
            gradient: None,
            depth: DEPTH_CLEAR,
        }
    }
}

/// Color and depth buffers for one viewport.
///
/// Colors are packed 0RGB `u32`s, depths are NDC depth in [0, 1] (1.0 = far plane).
/// Both arrays are indexed by `y * width + x`.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![0; size],
            depth_buffer: vec![DEPTH_CLEAR; size],
        }
    }

    /// Reallocates the buffers. A no-op when the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        let size = width * height;
        self.width = width;
        self.height = height;
        self.color_buffer = vec![0; size];
        self.depth_buffer = vec![DEPTH_CLEAR; size];
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets depth everywhere and fills the color buffer.
    pub fn clear_with_options(&mut self, options: &ClearOptions) {
        self.depth_buffer.par_iter_mut().for_each(|d| *d = options.depth);

        if self.width == 0 {
            return;
        }

        match options.gradient {
            Some((top, bottom)) => {
                let last_row = (self.height.max(2) - 1) as f32;
                self.color_buffer
                    .par_chunks_mut(self.width)
                    .enumerate()
                    .for_each(|(y, row)| {
                        let t = y as f32 / last_row;
                        row.fill(pack_rgb(top * (1.0 - t) + bottom * t));
                    });
            }
            None => {
                let packed = pack_rgb(options.color);
                self.color_buffer.par_iter_mut().for_each(|c| *c = packed);
            }
        }
    }

    /// Clears to a uniform color.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.clear_with_options(&ClearOptions {
            color,
            ..Default::default()
        });
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    /// Mutable color and depth slices covering rows `first..=last` (clamped to the buffer).
    ///
    /// Each slice holds whole rows, so they can be split with `chunks_mut(width)`.
    pub fn rows_mut(&mut self, first: usize, last: usize) -> (&mut [u32], &mut [f32]) {
        let last = last.min(self.height.saturating_sub(1));
        if self.height == 0 || first > last {
            return (&mut [], &mut []);
        }
        let start = first * self.width;
        let end = (last + 1) * self.width;
        (
            &mut self.color_buffer[start..end],
            &mut self.depth_buffer[start..end],
        )
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// The finished frame, ready to be handed to the display surface.
    pub fn present(&self) -> &[u32] {
        &self.color_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::unpack_rgb;
    use approx::assert_relative_eq;

    #[test]
    fn clear_resets_depth_and_color() {
        let mut fb = FrameBuffer::new(4, 3);
        {
            let (colors, depths) = fb.rows_mut(1, 1);
            colors[1] = 0x123456;
            depths[1] = 0.5;
        }
        fb.clear(Vector3::new(1.0, 0.0, 0.0));
        assert!(fb.depth_buffer().iter().all(|&d| d == DEPTH_CLEAR));
        assert!(fb.color_buffer().iter().all(|&c| c == 0x00FF_0000));
    }

    #[test]
    fn gradient_depends_on_row_only() {
        let mut fb = FrameBuffer::new(5, 3);
        fb.clear_with_options(&ClearOptions {
            gradient: Some((Vector3::new(1.0, 1.0, 1.0), Vector3::zeros())),
            ..Default::default()
        });
        assert_eq!(fb.get_pixel(0, 0), Some(0x00FF_FFFF));
        assert_eq!(fb.get_pixel(4, 2), Some(0));
        let mid = unpack_rgb(fb.get_pixel(2, 1).unwrap());
        assert_relative_eq!(mid.x, 128.0 / 255.0);
        assert_eq!(fb.get_pixel(0, 1), fb.get_pixel(4, 1));
    }

    #[test]
    fn out_of_bounds_reads_are_rejected() {
        let fb = FrameBuffer::new(2, 2);
        assert_eq!(fb.get_pixel(0, 2), None);
        assert_eq!(fb.get_pixel(2, 0), None);
        assert_eq!(fb.get_depth(5, 5), None);
    }

    #[test]
    fn rows_mut_past_the_end_is_empty() {
        let mut fb = FrameBuffer::new(3, 4);
        let (colors, depths) = fb.rows_mut(5, 9);
        assert!(colors.is_empty());
        assert!(depths.is_empty());
    }

    #[test]
    fn rows_mut_covers_whole_rows() {
        let mut fb = FrameBuffer::new(3, 4);
        let (colors, depths) = fb.rows_mut(1, 10);
        assert_eq!(colors.len(), 9);
        assert_eq!(depths.len(), 9);
        colors[0] = 7;
        assert_eq!(fb.get_pixel(0, 1), Some(7));
    }

    #[test]
    fn resize_reallocates() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(8, 6);
        assert_eq!(fb.present().len(), 48);
        assert_eq!(fb.width(), 8);
        assert_eq!(fb.height(), 6);
    }
}
