use crate::core::color::{ColorRGB, pack_rgb};

/// Color and depth storage for one frame.
///
/// Owned by the renderer; the rasterizer borrows it mutably for the duration of
/// a frame, presentation reads it afterwards.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Packed `0xFFRRGGBB` pixels, row-major.
    pub color_buffer: Vec<u32>,

    /// Depth per pixel. Reset to `f32::MAX` every frame.
    pub depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![0; size],
            depth_buffer: vec![f32::MAX; size],
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(f32::MAX);
    }

    pub fn clear_color(&mut self, color: &ColorRGB) {
        self.color_buffer.fill(pack_rgb(color));
    }

    /// Returns true if `new_depth` is strictly closer than the stored value, in
    /// which case the stored value is replaced.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        let stored = &mut self.depth_buffer[idx];
        if new_depth < *stored {
            *stored = new_depth;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: u32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = pixel;
        }
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
}
