//! Triangle selection editing: add/remove, invert, ring grow/shrink, UV
//! island toggling, and a flat text persistence format.
//!
//! The selection is the only long-lived mutable state in the workspace. Every
//! mutator returns whether the selection changed, so callers poll a plain
//! return value instead of wiring up change listeners.

use std::collections::{HashSet, VecDeque};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MeshTopology;

/// Errors from selection persistence.
///
/// A parse failure leaves the caller's current selection untouched; the file
/// is rejected as a whole rather than applied partially.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A token in the file was not a decimal triangle index.
    #[error("invalid triangle index {token:?} in selection data")]
    InvalidToken {
        /// The offending token, for the user-facing message.
        token: String,
    },
    /// Reading or writing the selection file failed.
    #[error("selection file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Restricts selection growth to a single submesh.
///
/// A triangle is in scope when the filter is disabled or its submesh matches.
/// The scope gates what may be *added* (`add`, `grow`, `invert`); anything
/// already selected can always be removed or shrunk away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveScope {
    /// Whether the submesh filter applies.
    pub enabled: bool,
    /// The submesh triangles must belong to while enabled.
    pub submesh: u32,
}

impl ActiveScope {
    /// No filtering; every triangle is in scope.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts operations to one submesh.
    pub fn submesh(submesh: u32) -> Self {
        Self {
            enabled: true,
            submesh,
        }
    }

    /// True when `tri` may be selected under this scope.
    pub fn contains(&self, topology: &MeshTopology, tri: u32) -> bool {
        !self.enabled || topology.triangle_submesh.get(tri as usize) == Some(&self.submesh)
    }
}

/// An ordered set of selected triangle indices.
///
/// Stored as an insertion-ordered `Vec` with the no-duplicates invariant
/// enforced by the mutators; consumers iterating for rasterization get a
/// stable order, while all operations treat the contents as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSelection {
    selected: Vec<u32>,
}

impl TriangleSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected triangles.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// True when `tri` is selected.
    pub fn contains(&self, tri: u32) -> bool {
        self.selected.contains(&tri)
    }

    /// The selected triangle indices in insertion order.
    pub fn indices(&self) -> &[u32] {
        &self.selected
    }

    /// Iterates the selected triangle indices.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.selected.iter().copied()
    }

    fn as_set(&self) -> HashSet<u32> {
        self.selected.iter().copied().collect()
    }

    /// Selects one triangle. No-op when already selected, out of range, or
    /// out of scope.
    pub fn add(&mut self, topology: &MeshTopology, scope: ActiveScope, tri: u32) -> bool {
        if tri as usize >= topology.triangle_count()
            || !scope.contains(topology, tri)
            || self.contains(tri)
        {
            return false;
        }
        self.selected.push(tri);
        true
    }

    /// Deselects one triangle. Removal is never scope-filtered.
    pub fn remove(&mut self, tri: u32) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&t| t != tri);
        self.selected.len() != before
    }

    /// Deselects everything.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Inverts the selection within the scope.
    ///
    /// The new selection is every in-scope triangle that was unselected, plus
    /// every selected triangle that is *out* of scope. Selections made
    /// before a scope change are preserved rather than silently discarded.
    pub fn invert(&mut self, topology: &MeshTopology, scope: ActiveScope) -> bool {
        let current = self.as_set();
        let mut next = Vec::new();
        for tri in 0..topology.triangle_count() as u32 {
            if scope.contains(topology, tri) && !current.contains(&tri) {
                next.push(tri);
            }
        }
        for &tri in &self.selected {
            if !scope.contains(topology, tri) {
                next.push(tri);
            }
        }

        let changed = next.iter().copied().collect::<HashSet<_>>() != current;
        self.selected = next;
        changed
    }

    /// Expands the selection by one ring of geometrically adjacent triangles.
    ///
    /// Only in-scope neighbors are added; repeated calls grow further.
    pub fn grow(&mut self, topology: &MeshTopology, scope: ActiveScope) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let current = self.as_set();
        let mut seen = current.clone();
        let mut additions = Vec::new();
        for &tri in &self.selected {
            for &n in topology.adjacency.neighbors(tri) {
                if scope.contains(topology, n) && seen.insert(n) {
                    additions.push(n);
                }
            }
        }
        let changed = !additions.is_empty();
        self.selected.extend(additions);
        changed
    }

    /// Peels one boundary layer off the selection.
    ///
    /// A selected triangle is removed when any geometric neighbor is outside
    /// the selection. A triangle with no neighbors at all (isolated, e.g.
    /// from non-manifold input) is also removed; one shrink always erases
    /// it.
    pub fn shrink(&mut self, topology: &MeshTopology) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let current = self.as_set();
        let before = self.selected.len();
        self.selected.retain(|&tri| {
            let neighbors = topology.adjacency.neighbors(tri);
            !neighbors.is_empty() && neighbors.iter().all(|n| current.contains(n))
        });
        self.selected.len() != before
    }

    /// Toggles the whole UV island reachable from `start`.
    ///
    /// Flood-fills the UV adjacency graph; if any triangle of the island is
    /// currently selected the entire island is deselected, otherwise the
    /// island's in-scope triangles are selected.
    pub fn toggle_uv_island(
        &mut self,
        topology: &MeshTopology,
        scope: ActiveScope,
        start: u32,
    ) -> bool {
        if start as usize >= topology.triangle_count() {
            return false;
        }

        let mut island = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(tri) = queue.pop_front() {
            for &n in topology.uv_adjacency.neighbors(tri) {
                if island.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        if island.iter().any(|&tri| self.contains(tri)) {
            let before = self.selected.len();
            self.selected.retain(|tri| !island.contains(tri));
            self.selected.len() != before
        } else {
            let current = self.as_set();
            let mut changed = false;
            for tri in 0..topology.triangle_count() as u32 {
                if island.contains(&tri) && scope.contains(topology, tri) && !current.contains(&tri)
                {
                    self.selected.push(tri);
                    changed = true;
                }
            }
            changed
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serializes as comma-separated decimal indices, e.g. `"3,17,18,42"`.
    /// No header, no trailing newline.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, tri) in self.selected.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{tri}");
        }
        out
    }

    /// Parses the comma-separated format. Duplicates collapse; whitespace
    /// around tokens is tolerated; blank input yields an empty selection.
    pub fn parse(text: &str) -> Result<Self, SelectionError> {
        let mut selection = Self::new();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(selection);
        }
        let mut seen = HashSet::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            let tri: u32 = token.parse().map_err(|_| SelectionError::InvalidToken {
                token: token.to_string(),
            })?;
            if seen.insert(tri) {
                selection.selected.push(tri);
            }
        }
        Ok(selection)
    }

    /// Writes the selection to a file in the flat text format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SelectionError> {
        fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Reads a selection from a file. On any error the caller's existing
    /// selection is unaffected, since this returns a fresh value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SelectionError> {
        Self::parse(&fs::read_to_string(path)?)
    }
}
