//! The immutable mesh snapshot consumed by every analysis pass.

use std::ops::Range;

use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An immutable triangle mesh snapshot.
///
/// The mesh is owned by the caller and only read here. For skinned sources
/// the positions are expected to be a baked (posed) copy supplied by the
/// renderer; this crate never requests re-baking.
///
/// Triangles are addressed by *triangle index*: the position of the index
/// triple within `indices`. That index is the key used by every per-triangle
/// map in this workspace, so it must stay stable for the lifetime of any
/// derived structure.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex UV coordinates. Empty when the mesh has no UV channel.
    pub uvs: Vec<Vec2>,
    /// Vertex indices, three per triangle.
    pub indices: Vec<u32>,
    /// Contiguous triangle-index ranges, one per submesh, in draw order.
    pub submeshes: Vec<Range<u32>>,
}

impl Mesh {
    /// Creates a mesh with a single submesh covering every triangle.
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        let triangle_count = (indices.len() / 3) as u32;
        Self {
            positions,
            uvs,
            indices,
            submeshes: vec![0..triangle_count],
        }
    }

    /// Replaces the submesh ranges.
    ///
    /// Ranges are triangle-index ranges in draw order; every triangle should
    /// belong to exactly one range.
    pub fn with_submeshes(mut self, submeshes: Vec<Range<u32>>) -> Self {
        self.submeshes = submeshes;
        self
    }

    /// Number of triangles (`indices.len() / 3`).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True when the mesh carries a UV channel.
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Number of submeshes.
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// The three vertex indices of a triangle.
    ///
    /// # Panics
    ///
    /// Panics when `tri` is out of range; callers index via maps whose length
    /// equals [`Mesh::triangle_count`].
    pub fn triangle(&self, tri: u32) -> [u32; 3] {
        let base = tri as usize * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// The three UV corners of a triangle, or `None` when the mesh has no UV
    /// channel or the triangle references a vertex without a UV entry.
    pub fn triangle_uvs(&self, tri: u32) -> Option<[Vec2; 3]> {
        if tri as usize >= self.triangle_count() {
            return None;
        }
        let [i0, i1, i2] = self.triangle(tri);
        Some([
            *self.uvs.get(i0 as usize)?,
            *self.uvs.get(i1 as usize)?,
            *self.uvs.get(i2 as usize)?,
        ])
    }

    /// The submesh a triangle belongs to, by linear scan over the ranges.
    ///
    /// Cheap for the handful of submeshes real meshes have. Use
    /// [`crate::MeshTopology`] when querying per-triangle in bulk.
    pub fn submesh_of(&self, tri: u32) -> Option<u32> {
        self.submeshes
            .iter()
            .position(|range| range.contains(&tri))
            .map(|s| s as u32)
    }
}
