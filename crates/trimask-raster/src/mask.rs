//! Mask composition: selected triangles in, RGBA mask image out.

use std::io::Cursor;
use std::path::Path;

use glam::Vec2;
use thiserror::Error;
use trimask_mesh::Mesh;

use crate::{box_blur, fill_triangle, PixelBuffer, OPAQUE_BLACK, TRANSPARENT, WHITE};

/// Errors from encoding or writing a mask image.
#[derive(Debug, Error)]
pub enum MaskIoError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the unselected area of a mask looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskBackground {
    /// Opaque black, for masks consumed as grayscale weight maps.
    #[default]
    OpaqueBlack,
    /// Fully transparent, for masks layered over other textures.
    Transparent,
}

impl MaskBackground {
    fn color(self) -> crate::Rgba8 {
        match self {
            Self::OpaqueBlack => OPAQUE_BLACK,
            Self::Transparent => TRANSPARENT,
        }
    }
}

/// Edge-softening parameters for a rendered mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlurConfig {
    /// Half-width of the box window in pixels.
    pub radius: u32,
    /// Number of horizontal-plus-vertical passes. Two or three passes
    /// approximate a Gaussian closely.
    pub iterations: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: 8,
            iterations: 3,
        }
    }
}

/// Output settings for [`render_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskConfig {
    pub width: u32,
    pub height: u32,
    pub background: MaskBackground,
    /// Edge softening; `None` keeps the mask hard-edged.
    pub blur: Option<BlurConfig>,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

impl MaskConfig {
    /// A hard-edged, opaque-black-background mask of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: MaskBackground::default(),
            blur: None,
        }
    }

    pub fn with_background(mut self, background: MaskBackground) -> Self {
        self.background = background;
        self
    }

    pub fn with_blur(mut self, blur: BlurConfig) -> Self {
        self.blur = Some(blur);
        self
    }
}

/// Renders the selected triangles of `mesh` into a new mask buffer.
///
/// Each selected triangle's UV coordinates are scaled to pixel space
/// (`x = u * width`, `y = v * height`) and filled white over the configured
/// background. When `submesh` is set, only selected triangles of that submesh
/// are drawn. Indices out of range and triangles without UVs are skipped
/// silently, so a selection saved against a different mesh degrades to a
/// partial mask rather than an error.
pub fn render_mask(
    mesh: &Mesh,
    selected: &[u32],
    submesh: Option<u32>,
    config: &MaskConfig,
) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(config.width, config.height, config.background.color());
    let scale = Vec2::new(config.width as f32, config.height as f32);

    for &tri in selected {
        if let Some(filter) = submesh {
            if mesh.submesh_of(tri) != Some(filter) {
                continue;
            }
        }
        if let Some([a, b, c]) = mesh.triangle_uvs(tri) {
            fill_triangle(&mut buffer, a * scale, b * scale, c * scale, WHITE);
        }
    }

    if let Some(blur) = config.blur {
        box_blur(&mut buffer, blur.radius, blur.iterations);
    }
    buffer
}

/// Renders one mask per submesh, each holding only that submesh's share of
/// the selection. The returned vector is indexed by submesh.
pub fn render_submesh_masks(mesh: &Mesh, selected: &[u32], config: &MaskConfig) -> Vec<PixelBuffer> {
    (0..mesh.submesh_count() as u32)
        .map(|submesh| render_mask(mesh, selected, Some(submesh), config))
        .collect()
}

/// A per-triangle membership flag vector, indexed by triangle. Out-of-range
/// selection entries are ignored.
pub fn triangle_mask(mesh: &Mesh, selected: &[u32]) -> Vec<bool> {
    let mut mask = vec![false; mesh.triangle_count()];
    for &tri in selected {
        if let Some(flag) = mask.get_mut(tri as usize) {
            *flag = true;
        }
    }
    mask
}

/// A per-vertex flag vector: true for every vertex referenced by a selected
/// triangle, optionally restricted to one submesh. Useful for hosts that
/// weight vertex attributes rather than texels.
pub fn vertex_mask(mesh: &Mesh, selected: &[u32], submesh: Option<u32>) -> Vec<bool> {
    let mut mask = vec![false; mesh.vertex_count()];
    for &tri in selected {
        if (tri as usize) >= mesh.triangle_count() {
            continue;
        }
        if let Some(filter) = submesh {
            if mesh.submesh_of(tri) != Some(filter) {
                continue;
            }
        }
        for vertex in mesh.triangle(tri) {
            if let Some(flag) = mask.get_mut(vertex as usize) {
                *flag = true;
            }
        }
    }
    mask
}

/// Encodes a buffer as PNG bytes.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, MaskIoError> {
    let bytes: Vec<u8> = buffer.data().iter().flatten().copied().collect();
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        &bytes,
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(out)
}

/// Encodes a buffer as PNG and writes it to `path`.
pub fn save_png<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), MaskIoError> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn make_quad() -> Mesh {
        // Two triangles splitting the unit UV square along its diagonal.
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_render_covers_selected_triangle_only() {
        let mesh = make_quad();
        let config = MaskConfig::new(16, 16);
        // Triangle 0 lies below the diagonal (u > v side).
        let buffer = render_mask(&mesh, &[0], None, &config);
        assert_eq!(buffer.get(12, 3), WHITE);
        assert_eq!(buffer.get(3, 12), OPAQUE_BLACK);
    }

    #[test]
    fn test_full_selection_covers_everything() {
        let mesh = make_quad();
        let config = MaskConfig::new(8, 8);
        let buffer = render_mask(&mesh, &[0, 1], None, &config);
        assert!(buffer.data().iter().all(|&p| p == WHITE));
    }

    #[test]
    fn test_background_modes() {
        let mesh = make_quad();
        let opaque = render_mask(&mesh, &[], None, &MaskConfig::new(4, 4));
        assert_eq!(opaque.get(0, 0), OPAQUE_BLACK);

        let transparent = render_mask(
            &mesh,
            &[],
            None,
            &MaskConfig::new(4, 4).with_background(MaskBackground::Transparent),
        );
        assert_eq!(transparent.get(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_out_of_range_selection_is_skipped() {
        let mesh = make_quad();
        let buffer = render_mask(&mesh, &[7], None, &MaskConfig::new(4, 4));
        assert!(buffer.data().iter().all(|&p| p == OPAQUE_BLACK));
    }

    #[test]
    fn test_blur_softens_the_boundary() {
        let mesh = make_quad();
        let config = MaskConfig::new(32, 32).with_blur(BlurConfig {
            radius: 2,
            iterations: 1,
        });
        let buffer = render_mask(&mesh, &[0], None, &config);
        // A pixel straddling the diagonal is neither fully white nor black.
        let p = buffer.get(16, 15);
        assert!(p[0] > 0 && p[0] < 255, "got {:?}", p);
    }

    #[test]
    fn test_submesh_filter_and_per_submesh_masks() {
        let mesh = make_quad().with_submeshes(vec![0..1, 1..2]);
        let config = MaskConfig::new(16, 16);

        let only_first = render_mask(&mesh, &[0, 1], Some(0), &config);
        assert_eq!(only_first.get(12, 3), WHITE);
        assert_eq!(only_first.get(3, 12), OPAQUE_BLACK);

        let masks = render_submesh_masks(&mesh, &[0, 1], &config);
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].get(12, 3), WHITE);
        assert_eq!(masks[1].get(3, 12), WHITE);
        assert_eq!(masks[1].get(12, 3), OPAQUE_BLACK);
    }

    #[test]
    fn test_triangle_and_vertex_masks() {
        let mesh = make_quad();
        assert_eq!(triangle_mask(&mesh, &[1, 9]), vec![false, true]);

        // Triangle 1 uses vertices 0, 2, 3.
        let vertices = vertex_mask(&mesh, &[1], None);
        assert_eq!(vertices, vec![true, false, true, true]);

        let scoped = vertex_mask(
            &mesh.clone().with_submeshes(vec![0..1, 1..2]),
            &[1],
            Some(0),
        );
        assert!(scoped.iter().all(|&v| !v));
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let mesh = make_quad();
        let buffer = render_mask(&mesh, &[0], None, &MaskConfig::new(8, 8));
        let bytes = encode_png(&buffer).unwrap();
        assert!(!bytes.is_empty());

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let buffer = PixelBuffer::new(4, 4, WHITE);
        save_png(&buffer, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
