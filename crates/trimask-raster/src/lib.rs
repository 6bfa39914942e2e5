//! Rasterization half of the trimask workspace: turns a triangle selection
//! into an RGBA mask image.
//!
//! The pipeline is small and synchronous: fill the selected triangles'
//! UV-space footprints into a [`PixelBuffer`], optionally soften the edges
//! with a separable box blur, then hand the buffer to the host application
//! (or encode it to PNG here at the export boundary).
//!
//! # Pixel origin convention
//!
//! Buffers are row-major with **row 0 at the top, and UV (0, 0) maps to the
//! top-left pixel** (`x = u * width`, `y = v * height`). The rasterizer,
//! blur, and mask composition all use that one convention; there are no
//! per-call flips.

mod blur;
mod fill;
mod mask;

pub use blur::box_blur;
pub use fill::fill_triangle;
pub use mask::{
    encode_png, render_mask, render_submesh_masks, save_png, triangle_mask, vertex_mask,
    BlurConfig, MaskBackground, MaskConfig, MaskIoError,
};

/// One RGBA pixel, 8 bits per channel.
pub type Rgba8 = [u8; 4];

/// Opaque white, the mask foreground.
pub const WHITE: Rgba8 = [255, 255, 255, 255];
/// Opaque black, the default mask background.
pub const OPAQUE_BLACK: Rgba8 = [0, 0, 0, 255];
/// Fully transparent black.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// A width x height RGBA8 pixel buffer, row-major, row 0 on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<Rgba8>,
}

impl PixelBuffer {
    /// Creates a buffer filled with one color.
    pub fn new(width: u32, height: u32, fill: Rgba8) -> Self {
        Self {
            width,
            height,
            data: vec![fill; (width as usize) * (height as usize)],
        }
    }

    /// Creates a buffer from raw pixel data in row-major order.
    pub fn from_raw(data: Vec<Rgba8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must match width * height"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixels, row-major.
    pub fn data(&self) -> &[Rgba8] {
        &self.data
    }

    /// Mutable access to the pixels, row-major.
    pub fn data_mut(&mut self) -> &mut [Rgba8] {
        &mut self.data
    }

    /// Reads a pixel, clamping out-of-range coordinates to the edge.
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        if self.data.is_empty() {
            return TRANSPARENT;
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.data[(y * self.width + x) as usize]
    }

    /// Writes a pixel; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = color;
        }
    }

    /// Fills the whole buffer with one color.
    pub fn fill(&mut self, color: Rgba8) {
        self.data.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_fill() {
        let mut buffer = PixelBuffer::new(4, 2, OPAQUE_BLACK);
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.data().len(), 8);
        assert_eq!(buffer.get(0, 0), OPAQUE_BLACK);

        buffer.fill(WHITE);
        assert_eq!(buffer.get(3, 1), WHITE);
    }

    #[test]
    fn test_get_clamps_and_set_ignores_out_of_range() {
        let mut buffer = PixelBuffer::new(2, 2, TRANSPARENT);
        buffer.set(1, 1, WHITE);
        assert_eq!(buffer.get(5, 5), WHITE);

        buffer.set(9, 0, WHITE);
        assert_eq!(buffer.get(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_empty_buffer_get() {
        let buffer = PixelBuffer::new(0, 0, WHITE);
        assert_eq!(buffer.get(0, 0), TRANSPARENT);
    }
}
