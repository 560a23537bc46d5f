//! `vn-core` — foundational types for the `voxnav` movement planner.
//!
//! This crate is a dependency of every other `vn-*` crate.  It intentionally
//! has no `vn-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `BodyId`                                       |
//! | [`cell`]    | `Cell` grid coordinate, `Bounds` map box                  |
//! | [`moves`]   | `MoveState`, `MoveAction`, `MoveType`                     |
//! | [`config`]  | `PlannerConfig`, `DirectionPolicy`                        |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod moves;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Bounds, Cell};
pub use config::{DirectionPolicy, PlannerConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, BodyId};
pub use moves::{MoveAction, MoveState, MoveType};
