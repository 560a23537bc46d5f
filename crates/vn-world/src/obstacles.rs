//! Per-search snapshot of dynamic bodies.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) of 3-D axis-aligned boxes, one per owned dynamic
//! body.  It is bulk-loaded once at the start of a planning call and is
//! read-only afterwards; bodies that move while the search runs are not
//! reflected.  Teleporter pads go into a flat side list instead, since the
//! walker needs all of them at once rather than a spatial lookup.

use rstar::{RTree, RTreeObject, AABB};

use vn_core::{BodyId, Cell};

use crate::{Body, VoxelWorld};

/// Shrink applied to a cell's box before intersection tests so that a body
/// merely touching a cell face does not occupy it.
const CELL_EPS: f32 = 0.01;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a body's box with its `BodyId`.
#[derive(Clone, Debug)]
struct BodyEntry {
    min: [f32; 3],
    max: [f32; 3],
    id: BodyId,
}

impl RTreeObject for BodyEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

// ── Teleporter ────────────────────────────────────────────────────────────────

/// A teleporter pad captured at snapshot time.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Teleporter {
    pub id: BodyId,
    /// The cell the pad stands in; teleports arrive here.
    pub cell: Cell,
}

impl Teleporter {
    /// `true` if an agent at `cell` is close enough to use this pad.
    #[inline]
    pub fn is_reachable_from(&self, cell: Cell) -> bool {
        self.cell.chebyshev(cell) <= 1
    }
}

// ── ObstacleIndex ─────────────────────────────────────────────────────────────

/// Read-only obstacle snapshot for one planning call.
pub struct ObstacleIndex {
    tree: RTree<BodyEntry>,
    teleporters: Vec<Teleporter>,
}

impl ObstacleIndex {
    /// An index with no bodies and no teleporters.
    pub fn empty() -> Self {
        Self { tree: RTree::new(), teleporters: Vec::new() }
    }

    /// Snapshot the bodies of `world`.
    ///
    /// Every owned dynamic body except `exclude` (normally the planning
    /// agent's own body) goes into the tree.
    pub fn build<W: VoxelWorld + ?Sized>(world: &W, exclude: Option<BodyId>) -> Self {
        Self::from_bodies(world.bodies().iter().filter(|b| Some(b.id) != exclude))
    }

    /// Build from any collection of bodies.  Teleporter pads are collected
    /// separately, sorted by id so edge enumeration order is deterministic.
    ///
    /// Time complexity: O(B log B) for the R-tree bulk load.
    pub fn from_bodies<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Self {
        let mut entries = Vec::new();
        let mut teleporters = Vec::new();

        for body in bodies {
            if body.teleporter {
                teleporters.push(Teleporter { id: body.id, cell: body.cell() });
            }
            if body.is_obstacle() {
                entries.push(BodyEntry { min: body.min, max: body.max, id: body.id });
            }
        }
        teleporters.sort_unstable_by_key(|t| t.id);

        Self {
            tree: RTree::bulk_load(entries),
            teleporters,
        }
    }

    /// `true` if any indexed body overlaps `cell`.
    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.tree
            .locate_in_envelope_intersecting(&cell_envelope(cell))
            .next()
            .is_some()
    }

    /// Ids of every indexed body overlapping `cell`, ascending.
    pub fn bodies_at(&self, cell: Cell) -> Vec<BodyId> {
        let mut ids: Vec<BodyId> = self
            .tree
            .locate_in_envelope_intersecting(&cell_envelope(cell))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Teleporter pads, ascending by id.
    #[inline]
    pub fn teleporters(&self) -> &[Teleporter] {
        &self.teleporters
    }

    /// Number of obstacle bodies in the tree.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for ObstacleIndex {
    fn default() -> Self {
        Self::empty()
    }
}

fn cell_envelope(cell: Cell) -> AABB<[f32; 3]> {
    let p = cell.to_point();
    AABB::from_corners(
        [p[0] + CELL_EPS, p[1] + CELL_EPS, p[2] + CELL_EPS],
        [p[0] + 1.0 - CELL_EPS, p[1] + 1.0 - CELL_EPS, p[2] + 1.0 - CELL_EPS],
    )
}
