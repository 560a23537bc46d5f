//! The standard voxel walker.
//!
//! # Edge generation
//!
//! Forward edges are a chain of small per-move-type iterators, each gated
//! on the profile and the state's riding flag, followed by one shared filter
//! that drops destinations outside the loaded world or occupied by another
//! body.  Nothing is collected; the planner pulls edges one at a time.
//!
//! Inverse edges are derived from forward edges rather than written out a
//! second time: every state that could possibly reach the queried one is
//! enumerated, and its forward edges that land on the queried state are kept.
//! Teleport edges are the only ones that span more than `max_fall` cells, so
//! the cells around each pad are added as extra candidates when the queried
//! state stands on a pad.

use vn_core::cell::{DIAGONAL_DIRS, HORIZONTAL_DIRS};
use vn_core::{BodyId, Cell, MoveAction, MoveState, MoveType};
use vn_planner::MovementCapabilities;
use vn_world::{ObstacleIndex, Teleporter, Voxel, VoxelWorld};

use crate::{MovementProfile, MovementResult};

/// [`MovementCapabilities`] for one agent in one voxel world.
///
/// Holds a borrow of the world, so edges always reflect the world as it is
/// when the planner asks.
pub struct WalkerCapabilities<'w, W: VoxelWorld + ?Sized> {
    world:   &'w W,
    profile: MovementProfile,
    body:    Option<BodyId>,
}

impl<'w, W: VoxelWorld + ?Sized> WalkerCapabilities<'w, W> {
    /// Validate `profile` and bind it to `world`.
    pub fn new(world: &'w W, profile: MovementProfile) -> MovementResult<Self> {
        profile.validate()?;
        Ok(Self { world, profile, body: None })
    }

    /// The agent's own body, which must not block its own moves.  Takes a
    /// `BodyId` or the owning `AgentId`.
    pub fn with_body(mut self, body: impl Into<BodyId>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn profile(&self) -> &MovementProfile {
        &self.profile
    }

    pub fn world(&self) -> &'w W {
        self.world
    }

    // ── Standing moves ────────────────────────────────────────────────────

    fn walks(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let c = from.cell;
        let world = self.world;
        let straight = HORIZONTAL_DIRS.into_iter().map(move |(dx, dz)| c.offset(dx, 0, dz));
        // No cutting corners: both orthogonal cells must be open.
        let diagonal = DIAGONAL_DIRS
            .into_iter()
            .filter(move |&(dx, dz)| {
                world.is_passable(c.offset(dx, 0, 0)) && world.is_passable(c.offset(0, 0, dz))
            })
            .map(move |(dx, dz)| c.offset(dx, 0, dz));
        straight
            .chain(diagonal)
            .filter(move |&n| world.is_standable(n))
            .map(move |n| MoveAction::new(from, MoveState::standing(n), MoveType::Walk))
    }

    fn jumps(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let c = from.cell;
        let world = self.world;
        let headroom = world.is_passable(c.up());
        HORIZONTAL_DIRS
            .into_iter()
            .filter(move |_| headroom)
            .map(move |(dx, dz)| c.offset(dx, 1, dz))
            .filter(move |&n| world.is_standable(n))
            .map(move |n| MoveAction::new(from, MoveState::standing(n), MoveType::Jump))
    }

    /// Walking off a ledge: step sideways into an unsupported cell and drop
    /// to the first cell below it that can be stood on.
    fn ledge_falls(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let c = from.cell;
        HORIZONTAL_DIRS
            .into_iter()
            .map(move |(dx, dz)| c.offset(dx, 0, dz))
            .filter(move |&side| self.world.is_passable(side) && !self.world.is_standable(side))
            .filter_map(move |side| self.landing_below(side))
            .map(move |n| MoveAction::new(from, MoveState::standing(n), MoveType::Fall))
    }

    /// First standable cell strictly below `cell`, at most `max_fall` down,
    /// with nothing solid in between.
    fn landing_below(&self, cell: Cell) -> Option<Cell> {
        for k in 1..=self.profile.max_fall as i32 {
            let below = cell.offset(0, -k, 0);
            if !self.world.is_passable(below) {
                return None;
            }
            if self.world.is_standable(below) {
                return Some(below);
            }
        }
        None
    }

    fn climbs(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let c = from.cell;
        let here = self.world.voxel(c);
        let up = c.up();
        let down = c.down();
        let climb_up = self.world.is_passable(up)
            && (here == Voxel::Ladder || self.world.voxel(up) == Voxel::Ladder);
        let climb_down = self.world.voxel(down) == Voxel::Ladder;
        [(climb_up, up), (climb_down, down)]
            .into_iter()
            .filter(|&(ok, _)| ok)
            .map(move |(_, n)| MoveAction::new(from, MoveState::standing(n), MoveType::Climb))
    }

    fn flights(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let world = self.world;
        from.cell
            .neighbors26()
            .filter(move |&n| world.is_passable(n))
            .map(move |n| MoveAction::new(from, MoveState::standing(n), MoveType::Fly))
    }

    /// Pads this agent can reach from `from`: every pad other than one
    /// within a step of it.
    fn teleports<'a>(
        &'a self,
        from:        MoveState,
        teleporters: &'a [Teleporter],
    ) -> impl Iterator<Item = MoveAction> + 'a {
        let c = from.cell;
        let world = self.world;
        teleporters
            .iter()
            .filter(move |to| {
                to.cell != c
                    && world.is_passable(to.cell)
                    && teleporters.iter().any(|pad| pad.id != to.id && pad.is_reachable_from(c))
            })
            .map(move |to| MoveAction::new(from, MoveState::standing(to.cell), MoveType::Teleport))
    }

    // ── Riding moves ──────────────────────────────────────────────────────

    fn rides(&self, from: MoveState) -> impl Iterator<Item = MoveAction> + '_ {
        let c = from.cell;
        let world = self.world;
        HORIZONTAL_DIRS
            .into_iter()
            .flat_map(move |(dx, dz)| (-1..=1).map(move |dy| c.offset(dx, dy, dz)))
            .filter(move |&n| world.voxel(n) == Voxel::Rail)
            .map(move |n| MoveAction::new(from, MoveState::riding(n), MoveType::Ride))
    }

    // ── Inverse candidates ────────────────────────────────────────────────

    /// Highest level a non-teleport predecessor can sit above its successor.
    fn reach(&self) -> i32 {
        self.profile.max_fall.max(1) as i32
    }

    /// States that may have a non-teleport edge into `cell`.
    fn local_predecessors(&self, cell: Cell) -> impl Iterator<Item = MoveState> + '_ {
        let world = self.world;
        (-1..=self.reach())
            .flat_map(move |dy| {
                (-1..=1).flat_map(move |dz| (-1..=1).map(move |dx| cell.offset(dx, dy, dz)))
            })
            .filter(move |&p| world.is_valid_cell(p))
            .flat_map(|p| [MoveState::standing(p), MoveState::riding(p)])
    }

    /// Cells outside the local neighbourhood from which a teleport could land
    /// on `state`.  Sorted and deduplicated.
    fn teleport_sources(&self, state: MoveState, teleporters: &[Teleporter]) -> Vec<Cell> {
        if !self.profile.allows(MoveType::Teleport) || state.riding_vehicle {
            return Vec::new();
        }
        let c = state.cell;
        let reach = self.reach();
        let is_local = |p: Cell| {
            (p.x - c.x).abs() <= 1 && (p.z - c.z).abs() <= 1 && (-1..=reach).contains(&(p.y - c.y))
        };

        let mut sources: Vec<Cell> = teleporters
            .iter()
            .filter(|to| to.cell == c)
            .flat_map(|to| teleporters.iter().filter(move |pad| pad.id != to.id))
            .flat_map(|pad| pad.cell.neighborhood27())
            .filter(|&p| !is_local(p) && self.world.is_valid_cell(p))
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }
}

impl<W: VoxelWorld + ?Sized> MovementCapabilities for WalkerCapabilities<'_, W> {
    fn forward_edges<'a>(
        &'a self,
        state:       MoveState,
        obstacles:   &'a ObstacleIndex,
        teleporters: &'a [Teleporter],
    ) -> impl Iterator<Item = MoveAction> + 'a {
        let p = &self.profile;
        let active = state.is_valid() && !p.immobile && self.world.is_passable(state.cell);
        let standing = active && !state.riding_vehicle;
        let riding = active && state.riding_vehicle;
        let supported = standing && self.world.is_standable(state.cell);
        let on_rail = self.world.voxel(state.cell) == Voxel::Rail;

        let walks = supported.then(|| self.walks(state)).into_iter().flatten();
        let jumps = (supported && p.can_jump).then(|| self.jumps(state)).into_iter().flatten();
        let ledge_falls = supported.then(|| self.ledge_falls(state)).into_iter().flatten();
        let drop = (standing && !supported)
            .then(|| self.landing_below(state.cell))
            .flatten()
            .map(|n| MoveAction::new(state, MoveState::standing(n), MoveType::Fall));
        let climbs = (standing && p.can_climb).then(|| self.climbs(state)).into_iter().flatten();
        let flights = (standing && p.can_fly).then(|| self.flights(state)).into_iter().flatten();
        let board = (standing && p.can_ride && on_rail)
            .then(|| MoveAction::new(state, MoveState::riding(state.cell), MoveType::Board));
        let teleports = (standing && p.can_teleport)
            .then(|| self.teleports(state, teleporters))
            .into_iter()
            .flatten();
        let rides = (riding && p.can_ride).then(|| self.rides(state)).into_iter().flatten();
        let dismount = (riding && self.world.is_standable(state.cell))
            .then(|| MoveAction::new(state, MoveState::standing(state.cell), MoveType::Dismount));

        let world = self.world;
        walks
            .chain(jumps)
            .chain(ledge_falls)
            .chain(drop)
            .chain(climbs)
            .chain(flights)
            .chain(board)
            .chain(teleports)
            .chain(rides)
            .chain(dismount)
            .filter(move |a| {
                let to = a.destination.cell;
                world.is_valid_cell(to) && !obstacles.is_occupied(to)
            })
    }

    fn inverse_edges<'a>(
        &'a self,
        state:       MoveState,
        obstacles:   &'a ObstacleIndex,
        teleporters: &'a [Teleporter],
    ) -> impl Iterator<Item = MoveAction> + 'a {
        let active = state.is_valid() && !self.profile.immobile;
        let local = active
            .then(|| self.local_predecessors(state.cell))
            .into_iter()
            .flatten();
        let far = if active { self.teleport_sources(state, teleporters) } else { Vec::new() };

        local
            .chain(far.into_iter().map(MoveState::standing))
            .flat_map(move |prev| {
                self.forward_edges(prev, obstacles, teleporters)
                    .filter(move |a| a.destination == state)
            })
    }

    fn intrinsic_cost(&self, move_type: MoveType) -> f32 {
        self.profile.cost(move_type)
    }

    fn is_immobile(&self) -> bool {
        self.profile.immobile
    }

    fn body(&self) -> Option<BodyId> {
        self.body
    }

    /// Twice the cheapest cost among the moves this agent can actually make.
    fn heuristic_scale(&self) -> f32 {
        let cheapest = MoveType::ALL
            .into_iter()
            .filter(|&t| self.profile.allows(t))
            .map(|t| self.profile.cost(t))
            .fold(f32::INFINITY, f32::min);
        if cheapest.is_finite() { 2.0 * cheapest } else { 0.0 }
    }
}
