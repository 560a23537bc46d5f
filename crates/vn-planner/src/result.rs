//! Request and outcome types.

use std::fmt;
use std::time::Duration;

use vn_core::{MoveAction, MoveState};

use crate::{GoalRegion, MovementCapabilities};

// ── ResultCode ────────────────────────────────────────────────────────────────

/// How a planning call ended.  Terminal: a result never changes afterwards.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ResultCode {
    /// The caller's cancellation predicate asked to stop.  Retry at will.
    Cancelled,
    /// The request can never succeed as posed (immobile agent, impossible
    /// goal, invalid start).  Do not retry without changing it.
    Invalid,
    /// The reachable graph was exhausted.  Retry only after the world changes.
    NoSolution,
    /// The expansion or time budget ran out.  Retry with a larger budget.
    MaxExpansionsReached,
    /// A path was found.
    Success,
}

impl ResultCode {
    /// `true` if another search direction may still succeed after this one.
    #[inline]
    pub fn is_recoverable(self) -> bool {
        matches!(self, ResultCode::MaxExpansionsReached)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Cancelled            => "cancelled",
            ResultCode::Invalid              => "invalid",
            ResultCode::NoSolution           => "no-solution",
            ResultCode::MaxExpansionsReached => "max-expansions-reached",
            ResultCode::Success              => "success",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PlanResult / PlanOutcome ──────────────────────────────────────────────────

/// Summary of one planning call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PlanResult {
    pub code: ResultCode,
    /// Expansions performed, summed over both search directions.
    pub expansions: usize,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
}

/// A [`PlanResult`] plus the path, present exactly when the code is
/// [`ResultCode::Success`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlanOutcome {
    /// Moves to execute in order, from the start toward the goal.
    pub path: Option<Vec<MoveAction>>,
    pub result: PlanResult,
}

impl PlanOutcome {
    pub(crate) fn failed(code: ResultCode, expansions: usize, elapsed: Duration) -> Self {
        Self { path: None, result: PlanResult { code, expansions, elapsed } }
    }

    #[inline]
    pub fn code(&self) -> ResultCode {
        self.result.code
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.result.code == ResultCode::Success
    }

    /// The path as a slice; empty when there is none.
    pub fn moves(&self) -> &[MoveAction] {
        self.path.as_deref().unwrap_or(&[])
    }

    /// Total cost of the path under `caps`' cost table.
    pub fn total_cost<C: MovementCapabilities + ?Sized>(&self, caps: &C) -> f32 {
        crate::capability::path_cost(caps, self.moves())
    }
}

// ── PlanRequest ───────────────────────────────────────────────────────────────

/// One planning request.  Budget and weight fall back to the planner's
/// configuration when not set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanRequest {
    pub start: MoveState,
    pub goal: GoalRegion,
    pub max_expansions: Option<usize>,
    pub weight: Option<f32>,
}

impl PlanRequest {
    pub fn new(start: MoveState, goal: GoalRegion) -> Self {
        Self { start, goal, max_expansions: None, weight: None }
    }

    pub fn max_expansions(mut self, budget: usize) -> Self {
        self.max_expansions = Some(budget);
        self
    }

    /// A negative or non-finite weight makes the request `Invalid`.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }
}
