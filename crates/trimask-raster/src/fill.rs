//! Solid triangle fill via the edge-function test.

use glam::Vec2;

use crate::{PixelBuffer, Rgba8};

/// Doubled signed area of the triangle (a, b, c).
fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Fills every pixel whose center lies inside or on the boundary of the
/// triangle (p0, p1, p2), given in pixel-space coordinates.
///
/// The fill color replaces the destination pixel, it does not blend. Each
/// pixel center `(x + 0.5, y + 0.5)` is tested against the three edge
/// functions; no mixed signs means inside, which accepts either winding
/// order. Degenerate (zero-area) triangles fill nothing.
///
/// This is a plain per-pixel scan over the clamped bounding box, no
/// incremental edge-walking. Mask resolutions and triangle counts keep it
/// well inside interactive budgets.
pub fn fill_triangle(buffer: &mut PixelBuffer, p0: Vec2, p1: Vec2, p2: Vec2, color: Rgba8) {
    if buffer.width() == 0 || buffer.height() == 0 {
        return;
    }
    if edge(p0, p1, p2).abs() < 1e-6 {
        return;
    }

    let max_x = buffer.width() as f32 - 1.0;
    let max_y = buffer.height() as f32 - 1.0;
    let x0 = p0.x.min(p1.x).min(p2.x).floor().clamp(0.0, max_x) as u32;
    let x1 = p0.x.max(p1.x).max(p2.x).ceil().clamp(0.0, max_x) as u32;
    let y0 = p0.y.min(p1.y).min(p2.y).floor().clamp(0.0, max_y) as u32;
    let y1 = p0.y.max(p1.y).max(p2.y).ceil().clamp(0.0, max_y) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(p1, p2, p);
            let w1 = edge(p2, p0, p);
            let w2 = edge(p0, p1, p);
            let has_neg = w0 < 0.0 || w1 < 0.0 || w2 < 0.0;
            let has_pos = w0 > 0.0 || w1 > 0.0 || w2 > 0.0;
            if !(has_neg && has_pos) {
                buffer.set(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OPAQUE_BLACK, TRANSPARENT, WHITE};

    #[test]
    fn test_coverage_boundary() {
        let mut buffer = PixelBuffer::new(10, 10, TRANSPARENT);
        fill_triangle(
            &mut buffer,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            WHITE,
        );
        // Center (1.5, 1.5) is deep inside; (9.5, 9.5) is past the hypotenuse.
        assert_eq!(buffer.get(1, 1), WHITE);
        assert_eq!(buffer.get(9, 9), TRANSPARENT);
    }

    #[test]
    fn test_either_winding_fills_identically() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(7.0, 1.0);
        let c = Vec2::new(1.0, 7.0);

        let mut ccw = PixelBuffer::new(8, 8, OPAQUE_BLACK);
        fill_triangle(&mut ccw, a, b, c, WHITE);
        let mut cw = PixelBuffer::new(8, 8, OPAQUE_BLACK);
        fill_triangle(&mut cw, a, c, b, WHITE);
        assert_eq!(ccw, cw);
        assert_eq!(ccw.get(2, 2), WHITE);
    }

    #[test]
    fn test_degenerate_triangle_fills_nothing() {
        let mut buffer = PixelBuffer::new(4, 4, TRANSPARENT);
        fill_triangle(
            &mut buffer,
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.5, 1.5),
            WHITE,
        );
        assert!(buffer.data().iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn test_bounding_box_clamps_to_buffer() {
        // Triangle reaching far outside the buffer still fills its visible part.
        let mut buffer = PixelBuffer::new(4, 4, TRANSPARENT);
        fill_triangle(
            &mut buffer,
            Vec2::new(-10.0, -10.0),
            Vec2::new(20.0, -10.0),
            Vec2::new(-10.0, 20.0),
            WHITE,
        );
        assert_eq!(buffer.get(0, 0), WHITE);
        assert_eq!(buffer.get(3, 3), WHITE);
    }

    #[test]
    fn test_replaces_rather_than_blends() {
        let mut buffer = PixelBuffer::new(4, 4, WHITE);
        fill_triangle(
            &mut buffer,
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
            [10, 20, 30, 40],
        );
        assert_eq!(buffer.get(0, 0), [10, 20, 30, 40]);
    }
}
