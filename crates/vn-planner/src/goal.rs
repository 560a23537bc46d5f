//! Goal regions: acceptance predicates over cells.
//!
//! A goal is a small closed set of variants, each answering the same five
//! questions: membership, a distance lower bound, a-priori feasibility,
//! whether a backward search may be seeded from it, and which cell
//! represents it.  Goals are immutable and built fresh for each request.

use std::f32::consts::SQRT_2;

use vn_core::{Bounds, Cell};
use vn_world::VoxelWorld;

/// Cells at most this far from the horizontal map edge count as "off the map".
pub const WORLD_EDGE_MARGIN: f32 = 1.0;

/// Where an agent is trying to go.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GoalRegion {
    /// Exactly one cell.
    ExactCell { target: Cell },
    /// Next to `target`: same level or one above, offset by at most one step
    /// along a single horizontal axis (no diagonals).  Used for work that is
    /// done standing beside a block.
    Adjacent { target: Cell },
    /// Any cell whose origin lies within `radius` of `center`.
    Sphere { center: [f32; 3], radius: f32 },
    /// Any cell within [`WORLD_EDGE_MARGIN`] of the horizontal map boundary.
    WorldEdge { bounds: Bounds },
}

impl GoalRegion {
    pub fn exact(target: Cell) -> Self {
        GoalRegion::ExactCell { target }
    }

    pub fn adjacent(target: Cell) -> Self {
        GoalRegion::Adjacent { target }
    }

    pub fn sphere(center: [f32; 3], radius: f32) -> Self {
        GoalRegion::Sphere { center, radius }
    }

    pub fn world_edge(bounds: Bounds) -> Self {
        GoalRegion::WorldEdge { bounds }
    }

    /// Membership test.
    pub fn contains(&self, cell: Cell) -> bool {
        match *self {
            GoalRegion::ExactCell { target } => cell == target,
            GoalRegion::Adjacent { target } => {
                let dy = cell.y - target.y;
                let dx = (cell.x - target.x).abs();
                let dz = (cell.z - target.z).abs();
                (dy == 0 || dy == 1) && dx + dz <= 1
            }
            GoalRegion::Sphere { center, radius } => {
                cell.distance_sq_to_point(center) <= radius * radius
            }
            GoalRegion::WorldEdge { bounds } => {
                bounds.contains(cell)
                    && bounds.distance_to_horizontal_edge(cell) <= WORLD_EDGE_MARGIN
            }
        }
    }

    /// Lower bound on the straight-line distance from `cell` to the nearest
    /// member of the region.  Zero inside the region.
    pub fn heuristic(&self, cell: Cell) -> f32 {
        match *self {
            GoalRegion::ExactCell { target } => cell.distance(target),
            // Every member lies within √2 of the target (one up, one across).
            GoalRegion::Adjacent { target } => (cell.distance(target) - SQRT_2).max(0.0),
            GoalRegion::Sphere { center, radius } => {
                (cell.distance_sq_to_point(center).sqrt() - radius).max(0.0)
            }
            GoalRegion::WorldEdge { bounds } => {
                (bounds.distance_to_horizontal_edge(cell) - WORLD_EDGE_MARGIN).max(0.0)
            }
        }
    }

    /// A-priori feasibility.  `false` means no search can succeed, e.g. the
    /// target is walled in on all six faces.
    pub fn is_possible<W: VoxelWorld + ?Sized>(&self, world: &W) -> bool {
        match *self {
            GoalRegion::ExactCell { target } => is_open(world, target),
            GoalRegion::Adjacent { target } => adjacent_members(target).any(|c| is_open(world, c)),
            GoalRegion::Sphere { center, .. } => world.is_valid_cell(Cell::containing(center)),
            GoalRegion::WorldEdge { .. } => true,
        }
    }

    /// `true` if a backward search seeded around
    /// [`representative_cell`](Self::representative_cell) is meaningful.
    pub fn is_reversible(&self) -> bool {
        !matches!(self, GoalRegion::WorldEdge { .. })
    }

    /// The cell standing in for the whole region, or `None` when the region
    /// has no single centre.
    pub fn representative_cell(&self) -> Option<Cell> {
        match *self {
            GoalRegion::ExactCell { target } | GoalRegion::Adjacent { target } => Some(target),
            GoalRegion::Sphere { center, .. } => Some(Cell::containing(center)),
            GoalRegion::WorldEdge { .. } => None,
        }
    }

    /// Short variant label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GoalRegion::ExactCell { .. } => "exact",
            GoalRegion::Adjacent { .. }  => "adjacent",
            GoalRegion::Sphere { .. }    => "sphere",
            GoalRegion::WorldEdge { .. } => "world-edge",
        }
    }
}

/// The ten cells accepted by [`GoalRegion::Adjacent`].
fn adjacent_members(target: Cell) -> impl Iterator<Item = Cell> {
    const STEPS: [(i32, i32); 5] = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)];
    (0..=1).flat_map(move |dy| STEPS.into_iter().map(move |(dx, dz)| target.offset(dx, dy, dz)))
}

/// Passable and not sealed in on every face.
fn is_open<W: VoxelWorld + ?Sized>(world: &W, cell: Cell) -> bool {
    world.is_passable(cell) && cell.neighbors6().iter().any(|&n| world.is_passable(n))
}
