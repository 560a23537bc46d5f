//! The movement capability provider trait: the planner's edge generator.
//!
//! # Pluggability
//!
//! The planner never decides which moves are legal.  It asks a
//! [`MovementCapabilities`] implementation for the outgoing (or, for the
//! inverse search, incoming) edges of one state at a time, so agents with
//! different abilities share the same search code.  `vn-movement` provides
//! the standard voxel walker.

use vn_core::{BodyId, MoveAction, MoveState, MoveType};
use vn_world::{ObstacleIndex, Teleporter};

/// Per-agent edge generator and cost table.
///
/// # Edge streams
///
/// Both edge methods return lazy, finite iterators that are recomputed on
/// every call.  They read live world state, so results must never be cached
/// across searches.  Edges must not have an invalid endpoint.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so that independent requests can be
/// planned on worker threads.
pub trait MovementCapabilities: Send + Sync {
    /// Legal moves leaving `state`.  Every yielded action has
    /// `source == state`.
    fn forward_edges<'a>(
        &'a self,
        state:       MoveState,
        obstacles:   &'a ObstacleIndex,
        teleporters: &'a [Teleporter],
    ) -> impl Iterator<Item = MoveAction> + 'a;

    /// Legal moves arriving at `state`.  Every yielded action has
    /// `destination == state` and keeps its forward orientation.
    fn inverse_edges<'a>(
        &'a self,
        state:       MoveState,
        obstacles:   &'a ObstacleIndex,
        teleporters: &'a [Teleporter],
    ) -> impl Iterator<Item = MoveAction> + 'a;

    /// Per-action cost of a move type for this agent.  Must be non-negative.
    fn intrinsic_cost(&self, move_type: MoveType) -> f32;

    /// `true` if the agent cannot move at all.
    fn is_immobile(&self) -> bool;

    /// The agent's own body, excluded from the obstacle snapshot.
    fn body(&self) -> Option<BodyId> {
        None
    }

    /// Factor turning a goal's distance lower bound into a cost lower bound.
    ///
    /// A move over distance `d` costs `c·d² + c ≥ 2c·d`, so twice the
    /// cheapest intrinsic cost keeps the estimate admissible.
    fn heuristic_scale(&self) -> f32 {
        let cheapest = MoveType::ALL
            .iter()
            .map(|&t| self.intrinsic_cost(t))
            .fold(f32::INFINITY, f32::min);
        if cheapest.is_finite() { 2.0 * cheapest.max(0.0) } else { 0.0 }
    }
}

/// Cost of one action: `squared distance · intrinsic + intrinsic`.
///
/// The additive term charges every discrete action regardless of distance,
/// so an expensive move type is not made cheap by covering more ground.
#[inline]
pub fn action_cost<C: MovementCapabilities + ?Sized>(caps: &C, action: &MoveAction) -> f32 {
    let intrinsic = caps.intrinsic_cost(action.move_type);
    action.distance_sq() * intrinsic + intrinsic
}

/// Total cost of a path.
pub fn path_cost<C: MovementCapabilities + ?Sized>(caps: &C, path: &[MoveAction]) -> f32 {
    path.iter().map(|a| action_cost(caps, a)).sum()
}
