//! Planner construction errors.
//!
//! Planning itself never fails with an error: every outcome is a
//! [`ResultCode`](crate::ResultCode).

use thiserror::Error;

use vn_core::CoreError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid planner configuration: {0}")]
    Config(#[from] CoreError),
}

pub type PlannerResult<T> = Result<T, PlanError>;
