//! World-subsystem error type.

use thiserror::Error;

use vn_core::{BodyId, Bounds, Cell};

/// Errors produced by `vn-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("cell {cell} lies outside the map {bounds}")]
    OutOfBounds { cell: Cell, bounds: Bounds },

    #[error("body {0} is registered twice")]
    DuplicateBody(BodyId),

    #[error("body {0} has an empty or inverted bounding box")]
    DegenerateBody(BodyId),

    #[error("map bounds {0} enclose no cells")]
    EmptyBounds(Bounds),

    #[error("map bounds {0} hold too many cells for a dense grid")]
    TooLarge(Bounds),

    #[error("world parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
