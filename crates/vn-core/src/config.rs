//! Planner configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to `vn_planner::Planner::new`.

use crate::{CoreError, CoreResult};

/// Which search direction runs first.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectionPolicy {
    /// Forward search first, inverse search as fallback.
    #[default]
    AlwaysForward,
    /// Experimental: compare how much open space surrounds the start and the
    /// goal, and search from the more constrained end first.
    Openness,
}

/// Tunables for one planner instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Expansion budget per search direction when a request does not
    /// override it.
    pub max_expansions: usize,

    /// Heuristic weight when a request does not override it.  1.0 gives
    /// optimal paths; larger values trade optimality for speed.
    pub weight: f32,

    /// Expansions between two samples of the cancellation predicate.
    pub cancel_check_interval: usize,

    /// Added to the heuristic of every mid-ride state that is not itself a
    /// goal, so that searches prefer finishing a ride.
    pub ride_penalty: f32,

    /// Stop as soon as an expanded state yields an edge into the goal
    /// region, instead of waiting for the goal state to be dequeued.  Faster,
    /// but can return a slightly more expensive path.
    pub eager_goal_exit: bool,

    /// Which direction to search first.
    pub direction: DirectionPolicy,

    /// Optional wall-clock budget in milliseconds, shared by both search
    /// directions.  Sampled on the cancellation cadence.
    pub time_budget_ms: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions:        10_000,
            weight:                1.0,
            cancel_check_interval: 10,
            ride_penalty:          100.0,
            eager_goal_exit:       true,
            direction:             DirectionPolicy::AlwaysForward,
            time_budget_ms:        None,
        }
    }
}

impl PlannerConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(CoreError::Config(format!(
                "weight must be finite and non-negative, got {}",
                self.weight
            )));
        }
        if self.cancel_check_interval == 0 {
            return Err(CoreError::Config("cancel_check_interval must be at least 1".into()));
        }
        if !self.ride_penalty.is_finite() || self.ride_penalty < 0.0 {
            return Err(CoreError::Config(format!(
                "ride_penalty must be finite and non-negative, got {}",
                self.ride_penalty
            )));
        }
        Ok(())
    }

    /// The time budget as a `Duration`, if any.
    pub fn time_budget(&self) -> Option<std::time::Duration> {
        self.time_budget_ms.map(std::time::Duration::from_millis)
    }
}
