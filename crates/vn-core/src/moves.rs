//! Search-graph vertices (`MoveState`) and edges (`MoveAction`).
//!
//! Both are plain `Copy` values compared structurally, so open/closed-set
//! membership in the planner is well-defined without any object identity.

use std::fmt;

use crate::Cell;

// ── MoveType ──────────────────────────────────────────────────────────────────

/// The kind of discrete move an edge represents.
///
/// All variants are always compiled in; which ones an agent can actually
/// perform is decided by its movement capability provider.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    /// Horizontal step onto a supported cell (including diagonals).
    Walk,
    /// Step up one cell onto a neighbouring ledge.
    Jump,
    /// Drop down to the first supported cell below a neighbour.
    Fall,
    /// Vertical movement along a ladder.
    Climb,
    /// Free movement through open air.
    Fly,
    /// Instant hop between two teleporter pads.
    Teleport,
    /// Get on a vehicle standing on a rail cell.
    Board,
    /// Vehicle movement along a rail while riding.
    Ride,
    /// Get off the vehicle.
    Dismount,
}

impl MoveType {
    pub const COUNT: usize = 9;

    /// Every variant, in declaration order (`ALL[t.index()] == t`).
    pub const ALL: [MoveType; Self::COUNT] = [
        MoveType::Walk,
        MoveType::Jump,
        MoveType::Fall,
        MoveType::Climb,
        MoveType::Fly,
        MoveType::Teleport,
        MoveType::Board,
        MoveType::Ride,
        MoveType::Dismount,
    ];

    /// Position in [`MoveType::ALL`]; used to index per-type cost tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label, useful for logs and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveType::Walk     => "walk",
            MoveType::Jump     => "jump",
            MoveType::Fall     => "fall",
            MoveType::Climb    => "climb",
            MoveType::Fly      => "fly",
            MoveType::Teleport => "teleport",
            MoveType::Board    => "board",
            MoveType::Ride     => "ride",
            MoveType::Dismount => "dismount",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MoveState ─────────────────────────────────────────────────────────────────

/// Where an agent is: a cell plus whether it is currently riding a vehicle.
///
/// States derived from out-of-bounds or unloaded cells are represented by
/// [`MoveState::INVALID`], never by an absent value.  The planner refuses to
/// put invalid states into its open or closed sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveState {
    pub cell: Cell,
    pub riding_vehicle: bool,
}

impl MoveState {
    pub const INVALID: MoveState = MoveState { cell: Cell::INVALID, riding_vehicle: false };

    #[inline]
    pub const fn new(cell: Cell, riding_vehicle: bool) -> Self {
        Self { cell, riding_vehicle }
    }

    /// On foot at `cell`.
    #[inline]
    pub const fn standing(cell: Cell) -> Self {
        Self { cell, riding_vehicle: false }
    }

    /// On a vehicle at `cell`.
    #[inline]
    pub const fn riding(cell: Cell) -> Self {
        Self { cell, riding_vehicle: true }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.cell.is_valid()
    }
}

impl Default for MoveState {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.riding_vehicle {
            write!(f, "{} riding", self.cell)
        } else {
            write!(f, "{}", self.cell)
        }
    }
}

// ── MoveAction ────────────────────────────────────────────────────────────────

/// One directed edge of the search graph.
///
/// Only movement capability providers create these; the planner never
/// fabricates an edge.  Edges always keep their forward orientation, even
/// when found by the inverse search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub source: MoveState,
    pub destination: MoveState,
    pub move_type: MoveType,
}

impl MoveAction {
    #[inline]
    pub const fn new(source: MoveState, destination: MoveState, move_type: MoveType) -> Self {
        Self { source, destination, move_type }
    }

    /// Squared distance covered by the move.
    #[inline]
    pub fn distance_sq(&self) -> f32 {
        self.source.cell.distance_sq(self.destination.cell)
    }
}

impl fmt::Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.move_type, self.source, self.destination)
    }
}
