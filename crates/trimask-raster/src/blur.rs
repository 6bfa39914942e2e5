//! Separable box blur with a sliding-window running sum.

use crate::{PixelBuffer, Rgba8};

/// Softens the buffer in place with an iterated separable box blur.
///
/// Each iteration runs one horizontal and one vertical averaging pass over a
/// `2 * radius + 1` window. Samples past the edge clamp to the nearest valid
/// pixel, and the running sum makes each pass O(pixels) regardless of the
/// radius. All four channels, alpha included, are averaged independently.
///
/// Averages are written back with **truncating** integer division, so a
/// uniform buffer is exactly unchanged. `radius == 0` or
/// `iterations == 0` is a no-op.
pub fn box_blur(buffer: &mut PixelBuffer, radius: u32, iterations: u32) {
    if radius == 0 || iterations == 0 || buffer.data().is_empty() {
        return;
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let radius = radius as usize;
    let mut scratch = vec![[0u8; 4]; width * height];

    for _ in 0..iterations {
        // Horizontal: rows are lanes of stride 1.
        for y in 0..height {
            blur_lane(buffer.data(), &mut scratch, y * width, 1, width, radius);
        }
        // Vertical: columns are lanes of stride `width`.
        for x in 0..width {
            blur_lane(&scratch, buffer.data_mut(), x, width, height, radius);
        }
    }
}

/// One 1D averaging pass over a lane of `len` pixels starting at `start`,
/// `stride` elements apart.
fn blur_lane(
    source: &[Rgba8],
    dest: &mut [Rgba8],
    start: usize,
    stride: usize,
    len: usize,
    radius: usize,
) {
    let window = (2 * radius + 1) as u32;
    let clamped = |i: isize| -> usize {
        let i = i.clamp(0, len as isize - 1) as usize;
        start + i * stride
    };

    // Prime the window around position 0 with edge clamping.
    let mut sum = [0u32; 4];
    for i in -(radius as isize)..=(radius as isize) {
        let pixel = source[clamped(i)];
        for (channel, value) in sum.iter_mut().zip(pixel) {
            *channel += value as u32;
        }
    }

    for pos in 0..len {
        dest[start + pos * stride] = [
            (sum[0] / window) as u8,
            (sum[1] / window) as u8,
            (sum[2] / window) as u8,
            (sum[3] / window) as u8,
        ];
        // Slide: drop the sample leaving the window, take the one entering.
        let old = source[clamped(pos as isize - radius as isize)];
        let new = source[clamped(pos as isize + radius as isize + 1)];
        for (channel, (old_v, new_v)) in sum.iter_mut().zip(old.into_iter().zip(new)) {
            *channel = *channel - old_v as u32 + new_v as u32;
        }
    }
}
