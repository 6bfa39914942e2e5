//! Per-mesh topology: submesh map and edge adjacency graphs.
//!
//! Adjacency is derived twice, once over geometric edges (unordered vertex
//! index pairs) and once over UV edges (unordered UV coordinate pairs), plus
//! their intersection, which excludes UV seams. All three are pure functions
//! of the mesh, built once per target and cached by the caller.

use std::collections::HashMap;

use glam::Vec2;

use crate::Mesh;

/// A triangle adjacency graph in compressed sparse row form.
///
/// One contiguous neighbor array with per-triangle offsets, so a lookup is a
/// slice borrow with no per-triangle allocation. Every triangle has an entry
/// even when its neighbor list is empty.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyMap {
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl AdjacencyMap {
    /// Builds the CSR layout from per-triangle neighbor lists.
    fn from_lists(lists: Vec<Vec<u32>>) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        offsets.push(0);
        let mut neighbors = Vec::with_capacity(lists.iter().map(Vec::len).sum());
        for list in &lists {
            neighbors.extend_from_slice(list);
            offsets.push(neighbors.len() as u32);
        }
        Self { offsets, neighbors }
    }

    /// Number of triangles covered by the map.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// True when the map covers no triangles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Neighbor triangle indices of `tri`. Out-of-range triangles have no
    /// neighbors.
    pub fn neighbors(&self, tri: u32) -> &[u32] {
        let i = tri as usize;
        if i + 1 >= self.offsets.len() {
            return &[];
        }
        &self.neighbors[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }
}

/// Cached topology for one mesh: submesh map plus the three adjacency graphs.
///
/// Rebuilt whenever the target mesh changes; holds no mutable state of its
/// own.
#[derive(Debug, Clone, Default)]
pub struct MeshTopology {
    /// Triangle index → submesh index.
    pub triangle_submesh: Vec<u32>,
    /// Triangles sharing a geometric edge (exactly two incident triangles).
    pub adjacency: AdjacencyMap,
    /// Triangles sharing a UV edge (two or more incident triangles).
    pub uv_adjacency: AdjacencyMap,
    /// Intersection of the two: 3D-adjacent AND UV-adjacent. Crossing a UV
    /// seam is impossible through this graph.
    pub seamless_adjacency: AdjacencyMap,
}

impl MeshTopology {
    /// Analyzes a mesh. An empty mesh yields empty maps; this never fails.
    pub fn build(mesh: &Mesh) -> Self {
        let adjacency = build_adjacency(mesh);
        let uv_adjacency = build_uv_adjacency(mesh);
        let seamless_adjacency = build_seamless_adjacency(&adjacency, &uv_adjacency);
        Self {
            triangle_submesh: build_triangle_submesh_map(mesh),
            adjacency,
            uv_adjacency,
            seamless_adjacency,
        }
    }

    /// Number of triangles this topology describes.
    pub fn triangle_count(&self) -> usize {
        self.triangle_submesh.len()
    }
}

/// Maps every triangle to its submesh by walking the submesh ranges in draw
/// order. Range entries beyond the real triangle count are dropped.
pub fn build_triangle_submesh_map(mesh: &Mesh) -> Vec<u32> {
    let triangle_count = mesh.triangle_count();
    let mut map = vec![0u32; triangle_count];
    for (submesh, range) in mesh.submeshes.iter().enumerate() {
        for tri in range.clone() {
            if let Some(slot) = map.get_mut(tri as usize) {
                *slot = submesh as u32;
            }
        }
    }
    map
}

/// Order-independent key for a geometric edge. Vertex indices fit in 32 bits,
/// so the smaller-first pair packs losslessly into a u64.
fn edge_key(a: u32, b: u32) -> u64 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    ((lo as u64) << 32) | hi as u64
}

/// Order-independent key for a UV edge: the lexicographically smaller corner
/// first, compared by exact coordinate equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct UvEdgeKey([u32; 4]);

impl UvEdgeKey {
    fn new(a: Vec2, b: Vec2) -> Self {
        let (p, q) = if b.x < a.x || (b.x == a.x && b.y < a.y) {
            (b, a)
        } else {
            (a, b)
        };
        Self([canon(p.x), canon(p.y), canon(q.x), canon(q.y)])
    }
}

/// Bit pattern of `f`, with -0.0 folded into +0.0 so both hash identically.
fn canon(f: f32) -> u32 {
    (f + 0.0).to_bits()
}

fn push_unique(list: &mut Vec<u32>, tri: u32) {
    if !list.contains(&tri) {
        list.push(tri);
    }
}

/// Builds the geometric adjacency graph.
///
/// Only edges with exactly two incident triangles produce a link: boundary
/// edges (one triangle) and non-manifold edges (more than two) link nothing.
pub fn build_adjacency(mesh: &Mesh) -> AdjacencyMap {
    let triangle_count = mesh.triangle_count();
    let mut edge_triangles: HashMap<u64, Vec<u32>> = HashMap::new();
    for tri in 0..triangle_count as u32 {
        let [a, b, c] = mesh.triangle(tri);
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            edge_triangles.entry(edge_key(v0, v1)).or_default().push(tri);
        }
    }

    let mut lists = vec![Vec::new(); triangle_count];
    for triangles in edge_triangles.values() {
        if let [t0, t1] = triangles[..] {
            push_unique(&mut lists[t0 as usize], t1);
            push_unique(&mut lists[t1 as usize], t0);
        }
    }
    AdjacencyMap::from_lists(lists)
}

/// Builds the UV adjacency graph.
///
/// Edges are keyed by UV coordinates rather than vertex indices, so triangles
/// that share a UV edge through different vertices still connect, while a
/// seam (same vertices, diverging UVs) does not. Unlike the geometric case,
/// every edge with two *or more* incident triangles links all pairs among
/// them, since several triangles can meet at one UV edge where islands pinch.
///
/// A mesh without a UV channel yields an empty map.
pub fn build_uv_adjacency(mesh: &Mesh) -> AdjacencyMap {
    if !mesh.has_uvs() {
        return AdjacencyMap::default();
    }

    let triangle_count = mesh.triangle_count();
    let mut edge_triangles: HashMap<UvEdgeKey, Vec<u32>> = HashMap::new();
    for tri in 0..triangle_count as u32 {
        let Some([a, b, c]) = mesh.triangle_uvs(tri) else {
            continue;
        };
        for (p, q) in [(a, b), (b, c), (c, a)] {
            edge_triangles
                .entry(UvEdgeKey::new(p, q))
                .or_default()
                .push(tri);
        }
    }

    let mut lists = vec![Vec::new(); triangle_count];
    for triangles in edge_triangles.values() {
        for (i, &t0) in triangles.iter().enumerate() {
            for &t1 in &triangles[i + 1..] {
                if t0 != t1 {
                    push_unique(&mut lists[t0 as usize], t1);
                    push_unique(&mut lists[t1 as usize], t0);
                }
            }
        }
    }
    AdjacencyMap::from_lists(lists)
}

/// Intersects the geometric and UV graphs: neighbors reachable across both a
/// shared 3D edge and a shared UV edge.
pub fn build_seamless_adjacency(
    adjacency: &AdjacencyMap,
    uv_adjacency: &AdjacencyMap,
) -> AdjacencyMap {
    let mut lists = vec![Vec::new(); adjacency.len()];
    for tri in 0..adjacency.len() as u32 {
        let uv_neighbors = uv_adjacency.neighbors(tri);
        for &n in adjacency.neighbors(tri) {
            if uv_neighbors.contains(&n) {
                push_unique(&mut lists[tri as usize], n);
            }
        }
    }
    AdjacencyMap::from_lists(lists)
}
