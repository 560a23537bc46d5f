//! Core error type.
//!
//! Planning outcomes are never errors; they are reported as result codes by
//! `vn-planner`.  `CoreError` only covers construction-time failures such as
//! an unusable configuration.

use thiserror::Error;

/// The base error type for `vn-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `vn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
