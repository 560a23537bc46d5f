//! `vn-planner` — weighted bidirectional A* over voxel movement states.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`goal`]       | `GoalRegion` (exact, adjacent, sphere, world edge)        |
//! | [`capability`] | `MovementCapabilities` trait, `action_cost`, `path_cost`  |
//! | [`search`]     | Forward and inverse weighted A*, `SearchDirection`        |
//! | [`planner`]    | `Planner`: short-circuits, direction policy, fallback     |
//! | [`result`]     | `ResultCode`, `PlanResult`, `PlanOutcome`, `PlanRequest`  |
//! | [`error`]      | `PlanError`, `PlannerResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `Planner::plan_batch` runs requests on Rayon's pool.       |
//! | `fx-hash`  | FxHash for per-search state maps.                          |
//! | `serde`    | Forwards `serde` to `vn-core` and `vn-world`.              |
//!
//! # Quick start
//!
//! ```ignore
//! let planner = Planner::new(PlannerConfig::default())?;
//! let request = PlanRequest::new(world.state_at(start, false), GoalRegion::exact(target));
//! let outcome = planner.find_path(&world, &walker, &request, || true);
//! if outcome.is_success() {
//!     for action in outcome.moves() { /* execute */ }
//! }
//! ```

pub mod capability;
pub mod error;
pub mod goal;
pub mod planner;
pub mod result;
pub mod search;

#[cfg(test)]
mod tests;

pub use capability::{MovementCapabilities, action_cost, path_cost};
pub use error::{PlanError, PlannerResult};
pub use goal::{GoalRegion, WORLD_EDGE_MARGIN};
pub use planner::{Planner, inverse_seeds, openness};
pub use result::{PlanOutcome, PlanRequest, PlanResult, ResultCode};
pub use search::SearchDirection;
