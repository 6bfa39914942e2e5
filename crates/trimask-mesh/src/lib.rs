//! Triangle mesh topology and UV analysis for selection-mask editing.
//!
//! This crate is the analysis half of the trimask workspace: it takes an
//! immutable triangle mesh snapshot and derives the structures an interactive
//! selection tool needs: a triangle-to-submesh map, edge adjacency graphs in
//! both 3D and UV space, a uniform grid for UV point-location queries, and a
//! selection engine built on top of those graphs.
//!
//! Everything here is addressed by *triangle index*: the position of an index
//! triple within the mesh's flattened index list.
//!
//! # Usage
//!
//! ```
//! use glam::{Vec2, Vec3};
//! use trimask_mesh::{ActiveScope, Mesh, MeshTopology, TriangleSelection};
//!
//! let mesh = Mesh::new(
//!     vec![
//!         Vec3::new(0.0, 0.0, 0.0),
//!         Vec3::new(1.0, 0.0, 0.0),
//!         Vec3::new(0.5, 1.0, 0.0),
//!     ],
//!     vec![Vec2::ZERO, Vec2::X, Vec2::ONE],
//!     vec![0, 1, 2],
//! );
//!
//! let topology = MeshTopology::build(&mesh);
//! let mut selection = TriangleSelection::new();
//! selection.add(&topology, ActiveScope::all(), 0);
//! assert!(selection.contains(0));
//! ```

mod grid;
mod mesh;
mod selection;
mod session;
mod topology;

pub use grid::{point_in_triangle, UvTriangleGrid, DEFAULT_GRID_SIZE};
pub use mesh::Mesh;
pub use selection::{ActiveScope, SelectionError, TriangleSelection};
pub use session::MaskSession;
pub use topology::{AdjacencyMap, MeshTopology};
