use thiserror::Error;

use vn_core::MoveType;

#[derive(Debug, Error)]
pub enum MovementError {
    #[error("cost of {move_type} must be finite and non-negative, got {cost}")]
    InvalidCost { move_type: MoveType, cost: f32 },

    #[error("max_fall {0} exceeds the supported limit of {limit}", limit = crate::profile::MAX_FALL_LIMIT)]
    FallTooFar(u32),
}

pub type MovementResult<T> = Result<T, MovementError>;
