//! Per-agent movement abilities and costs.

use vn_core::MoveType;

use crate::{MovementError, MovementResult};

/// Largest fall an agent may be configured to survive, in cells.  Bounds the
/// neighbourhood the inverse search scans for predecessors.
pub const MAX_FALL_LIMIT: u32 = 32;

/// What one agent can do and what each move type costs it.
///
/// Walking, falling and dismounting are always available to a mobile agent;
/// everything else is opt-in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementProfile {
    pub immobile:     bool,
    pub can_jump:     bool,
    pub can_climb:    bool,
    pub can_fly:      bool,
    pub can_ride:     bool,
    pub can_teleport: bool,
    /// Deepest drop survived when walking off a ledge, in cells.
    pub max_fall:     u32,
    /// Intrinsic cost per move type, indexed by [`MoveType::index`].
    pub costs:        [f32; MoveType::COUNT],
}

impl Default for MovementProfile {
    /// A ground walker that can jump and climb ladders.
    fn default() -> Self {
        let mut costs = [1.0; MoveType::COUNT];
        costs[MoveType::Jump.index()] = 2.0;
        costs[MoveType::Climb.index()] = 2.0;
        costs[MoveType::Teleport.index()] = 0.05;
        costs[MoveType::Ride.index()] = 0.25;
        Self {
            immobile:     false,
            can_jump:     true,
            can_climb:    true,
            can_fly:      false,
            can_ride:     false,
            can_teleport: false,
            max_fall:     3,
            costs,
        }
    }
}

impl MovementProfile {
    /// The default ground walker.
    pub fn walker() -> Self {
        Self::default()
    }

    /// A walker that can also fly in every direction.
    pub fn flyer() -> Self {
        Self { can_fly: true, ..Self::default() }
    }

    /// An agent that never moves.
    pub fn immobile() -> Self {
        Self { immobile: true, ..Self::default() }
    }

    pub fn with_riding(mut self) -> Self {
        self.can_ride = true;
        self
    }

    pub fn with_teleport(mut self) -> Self {
        self.can_teleport = true;
        self
    }

    pub fn with_cost(mut self, move_type: MoveType, cost: f32) -> Self {
        self.costs[move_type.index()] = cost;
        self
    }

    #[inline]
    pub fn cost(&self, move_type: MoveType) -> f32 {
        self.costs[move_type.index()]
    }

    /// `true` if this agent can ever perform `move_type`.
    pub fn allows(&self, move_type: MoveType) -> bool {
        if self.immobile {
            return false;
        }
        match move_type {
            MoveType::Walk | MoveType::Fall | MoveType::Dismount => true,
            MoveType::Jump                   => self.can_jump,
            MoveType::Climb                  => self.can_climb,
            MoveType::Fly                    => self.can_fly,
            MoveType::Teleport               => self.can_teleport,
            MoveType::Board | MoveType::Ride => self.can_ride,
        }
    }

    /// Reject negative or non-finite costs and unbounded falls.
    pub fn validate(&self) -> MovementResult<()> {
        for move_type in MoveType::ALL {
            let cost = self.cost(move_type);
            if !cost.is_finite() || cost < 0.0 {
                return Err(MovementError::InvalidCost { move_type, cost });
            }
        }
        if self.max_fall > MAX_FALL_LIMIT {
            return Err(MovementError::FallTooFar(self.max_fall));
        }
        Ok(())
    }
}
