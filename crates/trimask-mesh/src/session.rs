//! The owning editing session: one target mesh, its cached analysis, and the
//! selection being edited.
//!
//! The session is the single writer of the selection: UI layers call its
//! methods instead of sharing a mutable selection handle around. "No target
//! assigned" is a legitimate interactive state, not an error: every mutating
//! call on an empty session is a safe no-op that reports no change.

use std::path::Path;

use glam::Vec2;

use crate::{
    ActiveScope, Mesh, MeshTopology, SelectionError, TriangleSelection, UvTriangleGrid,
    DEFAULT_GRID_SIZE,
};

#[derive(Debug)]
struct Target {
    mesh: Mesh,
    topology: MeshTopology,
    grid: UvTriangleGrid,
}

impl Target {
    fn analyze(mesh: Mesh) -> Self {
        let topology = MeshTopology::build(&mesh);
        let grid = UvTriangleGrid::build(&mesh, DEFAULT_GRID_SIZE);
        Self {
            mesh,
            topology,
            grid,
        }
    }
}

/// An interactive mask-editing session.
///
/// Holds an optional target mesh snapshot together with its derived topology
/// and UV grid, the triangle selection, and the active submesh scope. The
/// derived structures are pure functions of the mesh and are rebuilt whenever
/// the target changes; the selection is cleared at the same time, since
/// triangle indices from a different mesh are meaningless.
#[derive(Debug, Default)]
pub struct MaskSession {
    target: Option<Target>,
    selection: TriangleSelection,
    scope: ActiveScope,
}

impl MaskSession {
    /// Creates a session with no target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a new target mesh (or none), rebuilding the cached analysis
    /// and clearing the selection.
    pub fn set_target(&mut self, mesh: Option<Mesh>) {
        self.target = mesh.map(Target::analyze);
        self.selection.clear();
    }

    /// Re-analyzes the current target in place, keeping the selection.
    ///
    /// For callers that mutated the mesh snapshot out-of-band and know the
    /// triangle indexing is unchanged.
    pub fn rebuild(&mut self) {
        if let Some(target) = self.target.take() {
            self.target = Some(Target::analyze(target.mesh));
        }
    }

    /// True when a target mesh is assigned.
    pub fn is_ready(&self) -> bool {
        self.target.is_some()
    }

    /// The target mesh, if any.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.target.as_ref().map(|t| &t.mesh)
    }

    /// The cached topology of the target, if any.
    pub fn topology(&self) -> Option<&MeshTopology> {
        self.target.as_ref().map(|t| &t.topology)
    }

    /// The cached UV grid of the target, if any.
    pub fn grid(&self) -> Option<&UvTriangleGrid> {
        self.target.as_ref().map(|t| &t.grid)
    }

    /// The current selection (read-only; mutate through the session).
    pub fn selection(&self) -> &TriangleSelection {
        &self.selection
    }

    /// The active submesh scope.
    pub fn scope(&self) -> ActiveScope {
        self.scope
    }

    /// Replaces the active scope. The selection is untouched; out-of-scope
    /// entries survive until explicitly removed or inverted away.
    pub fn set_scope(&mut self, scope: ActiveScope) {
        self.scope = scope;
    }

    /// Number of submeshes in the target, for scope pickers.
    pub fn submesh_count(&self) -> usize {
        self.mesh().map_or(0, Mesh::submesh_count)
    }

    /// True when `tri` may be selected under the current scope.
    pub fn in_scope(&self, tri: u32) -> bool {
        self.topology()
            .is_some_and(|topology| self.scope.contains(topology, tri))
    }

    /// The 2D-view picking half: finds the triangle under a UV coordinate.
    /// 3D ray picking is the host application's job.
    pub fn pick_uv(&self, uv: Vec2) -> Option<u32> {
        let target = self.target.as_ref()?;
        target.grid.find_triangle(&target.mesh, uv)
    }

    // ------------------------------------------------------------------
    // Selection operations. Each returns whether the selection changed and
    // is a no-op without a target.
    // ------------------------------------------------------------------

    /// Selects one triangle under the current scope.
    pub fn add(&mut self, tri: u32) -> bool {
        match &self.target {
            Some(target) => self.selection.add(&target.topology, self.scope, tri),
            None => false,
        }
    }

    /// Deselects one triangle.
    pub fn remove(&mut self, tri: u32) -> bool {
        self.selection.remove(tri)
    }

    /// Deselects everything.
    pub fn clear(&mut self) -> bool {
        self.selection.clear()
    }

    /// Inverts the selection under the current scope.
    pub fn invert(&mut self) -> bool {
        match &self.target {
            Some(target) => self.selection.invert(&target.topology, self.scope),
            None => false,
        }
    }

    /// Grows the selection by one adjacency ring.
    pub fn grow(&mut self) -> bool {
        match &self.target {
            Some(target) => self.selection.grow(&target.topology, self.scope),
            None => false,
        }
    }

    /// Peels one boundary layer off the selection.
    pub fn shrink(&mut self) -> bool {
        match &self.target {
            Some(target) => self.selection.shrink(&target.topology),
            None => false,
        }
    }

    /// Toggles the UV island containing `start`.
    pub fn toggle_uv_island(&mut self, start: u32) -> bool {
        match &self.target {
            Some(target) => self
                .selection
                .toggle_uv_island(&target.topology, self.scope, start),
            None => false,
        }
    }

    /// Saves the selection to a flat text file.
    pub fn save_selection<P: AsRef<Path>>(&self, path: P) -> Result<(), SelectionError> {
        self.selection.save(path)
    }

    /// Loads a selection from a flat text file, replacing the current one.
    /// On error the current selection is left unchanged.
    pub fn load_selection<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SelectionError> {
        self.selection = TriangleSelection::load(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn make_quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![
                Vec2::new(0.1, 0.1),
                Vec2::new(0.9, 0.1),
                Vec2::new(0.9, 0.9),
                Vec2::new(0.1, 0.9),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_operations_without_target_are_noops() {
        let mut session = MaskSession::new();
        assert!(!session.is_ready());
        assert!(!session.add(0));
        assert!(!session.invert());
        assert!(!session.grow());
        assert!(!session.shrink());
        assert!(!session.toggle_uv_island(0));
        assert_eq!(session.pick_uv(Vec2::new(0.5, 0.5)), None);
        assert_eq!(session.submesh_count(), 0);
    }

    #[test]
    fn test_target_change_clears_selection() {
        let mut session = MaskSession::new();
        session.set_target(Some(make_quad()));
        assert!(session.add(0));
        assert_eq!(session.selection().len(), 1);

        session.set_target(Some(make_quad()));
        assert!(session.selection().is_empty());

        session.add(1);
        session.set_target(None);
        assert!(session.selection().is_empty());
        assert!(!session.is_ready());
    }

    #[test]
    fn test_rebuild_keeps_selection() {
        let mut session = MaskSession::new();
        session.set_target(Some(make_quad()));
        session.add(1);
        session.rebuild();
        assert!(session.is_ready());
        assert!(session.selection().contains(1));
    }

    #[test]
    fn test_pick_uv() {
        let mut session = MaskSession::new();
        session.set_target(Some(make_quad()));
        // The quad's diagonal runs from (0.1,0.1) to (0.9,0.9); below it lies
        // triangle 0, above it triangle 1.
        assert_eq!(session.pick_uv(Vec2::new(0.6, 0.3)), Some(0));
        assert_eq!(session.pick_uv(Vec2::new(0.3, 0.6)), Some(1));
        assert_eq!(session.pick_uv(Vec2::new(0.01, 0.5)), None);
    }

    #[test]
    fn test_scope_gates_add() {
        let mesh = make_quad().with_submeshes(vec![0..1, 1..2]);
        let mut session = MaskSession::new();
        session.set_target(Some(mesh));
        session.set_scope(ActiveScope::submesh(1));

        assert!(!session.add(0));
        assert!(session.add(1));
        assert!(session.in_scope(1));
        assert!(!session.in_scope(0));
    }

    #[test]
    fn test_selection_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.tsel");

        let mut session = MaskSession::new();
        session.set_target(Some(make_quad()));
        session.add(0);
        session.add(1);
        session.save_selection(&path).unwrap();

        session.clear();
        session.load_selection(&path).unwrap();
        assert!(session.selection().contains(0));
        assert!(session.selection().contains(1));
    }

    #[test]
    fn test_load_failure_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.tsel");
        std::fs::write(&path, "1,banana,3").unwrap();

        let mut session = MaskSession::new();
        session.set_target(Some(make_quad()));
        session.add(0);
        assert!(session.load_selection(&path).is_err());
        assert!(session.selection().contains(0));
    }
}
