//! Uniform-grid spatial index over UV space for point-location queries.
//!
//! The 2D editing view picks triangles by UV coordinate; a linear scan over
//! every triangle per click does not scale, so triangles are bucketed by the
//! grid cells their UV bounding box overlaps.

use std::collections::HashMap;

use glam::Vec2;

use crate::Mesh;

/// Grid resolution used by [`crate::MaskSession`]: 32x32 buckets over the
/// unit UV square.
pub const DEFAULT_GRID_SIZE: u32 = 32;

/// Buckets of triangle indices keyed by integer grid cell.
///
/// A triangle appears in every cell its UV bounding box overlaps, trading
/// over-inclusion for a trivial query path. Cells are keyed by signed
/// coordinates so UVs outside the unit square still index correctly.
#[derive(Debug, Clone, Default)]
pub struct UvTriangleGrid {
    cells: HashMap<(i32, i32), Vec<u32>>,
    grid_size: u32,
}

impl UvTriangleGrid {
    /// Buckets every triangle of the mesh. A mesh without UVs yields an empty
    /// grid.
    pub fn build(mesh: &Mesh, grid_size: u32) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<u32>> = HashMap::new();
        if !mesh.has_uvs() || grid_size == 0 {
            return Self { cells, grid_size };
        }

        for tri in 0..mesh.triangle_count() as u32 {
            let Some([a, b, c]) = mesh.triangle_uvs(tri) else {
                continue;
            };
            let min = a.min(b).min(c);
            let max = a.max(b).max(c);
            let (x0, y0) = cell_coords(min, grid_size);
            let (x1, y1) = cell_coords(max, grid_size);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    cells.entry((x, y)).or_default().push(tri);
                }
            }
        }
        Self { cells, grid_size }
    }

    /// The grid resolution this index was built with.
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// The cell a UV coordinate falls into.
    pub fn cell_of(&self, uv: Vec2) -> (i32, i32) {
        cell_coords(uv, self.grid_size)
    }

    /// Candidate triangles for a cell, in insertion order (ascending triangle
    /// index).
    pub fn candidates(&self, cell: (i32, i32)) -> &[u32] {
        self.cells.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Finds the triangle containing a UV point.
    ///
    /// Candidates from the point's cell are tested exactly with
    /// [`point_in_triangle`] and the first hit wins. When degenerate UVs make
    /// triangles overlap, "first" means lowest triangle index, an explicit
    /// tie-break rather than visual stacking order. Returns `None` when the mesh has
    /// no UVs or no candidate contains the point.
    pub fn find_triangle(&self, mesh: &Mesh, uv: Vec2) -> Option<u32> {
        if !mesh.has_uvs() {
            return None;
        }
        self.candidates(self.cell_of(uv))
            .iter()
            .copied()
            .find(|&tri| {
                mesh.triangle_uvs(tri)
                    .is_some_and(|[a, b, c]| point_in_triangle(uv, a, b, c))
            })
    }
}

fn cell_coords(uv: Vec2, grid_size: u32) -> (i32, i32) {
    (
        (uv.x * grid_size as f32).floor() as i32,
        (uv.y * grid_size as f32).floor() as i32,
    )
}

/// Winding-independent point-in-triangle test via barycentric signs.
///
/// The two barycentric terms and the doubled area are sign-normalized, so
/// triangles wound either way test identically. Points on an edge count as
/// inside; a zero-area triangle contains nothing.
pub fn point_in_triangle(p: Vec2, p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    let mut s = p0.y * p2.x - p0.x * p2.y + (p2.y - p0.y) * p.x + (p0.x - p2.x) * p.y;
    let mut t = p0.x * p1.y - p0.y * p1.x + (p0.y - p1.y) * p.x + (p1.x - p0.x) * p.y;
    let mut area = -p1.y * p2.x + p0.y * (p2.x - p1.x) + p0.x * (p1.y - p2.y) + p1.x * p2.y;

    if area == 0.0 {
        return false;
    }
    if area < 0.0 {
        s = -s;
        t = -t;
        area = -area;
    }
    s >= 0.0 && t >= 0.0 && s + t <= area
}
