//! The `Planner`: request validation, direction choice and fallback.
//!
//! # Call sequence
//!
//! ```text
//! find_path(world, caps, request, keep_going):
//!   ① Short-circuits (zero expansions):
//!        immobile agent / invalid start / impossible goal → Invalid
//!        start already in goal                             → Success, empty path
//!   ② Snapshot bodies into an ObstacleIndex (once per call).
//!   ③ Primary direction (forward unless the openness policy says otherwise).
//!   ④ If the primary run hit its budget, run the other direction with the
//!      same budget; inverse only when the goal is reversible.
//! ```
//!
//! Each call owns all of its bookkeeping, so one `Planner` can serve any
//! number of threads at once.

use std::time::Instant;

use tracing::{debug, trace};

use vn_core::{Cell, DirectionPolicy, MoveAction, MoveState, PlannerConfig};
use vn_world::{ObstacleIndex, VoxelWorld};

use crate::search::{self, SearchDirection, SearchInput, SearchRun};
use crate::{
    GoalRegion, MovementCapabilities, PlanOutcome, PlanRequest, PlanResult, PlannerResult,
    ResultCode,
};

/// Weighted bidirectional A* movement planner.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner after validating `config`.
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a path for one agent.
    ///
    /// `keep_going` is sampled every `cancel_check_interval` expansions
    /// (starting before the first one); returning `false` ends the call with
    /// [`ResultCode::Cancelled`].
    pub fn find_path<W, C, F>(
        &self,
        world:          &W,
        caps:           &C,
        request:        &PlanRequest,
        mut keep_going: F,
    ) -> PlanOutcome
    where
        W: VoxelWorld + ?Sized,
        C: MovementCapabilities + ?Sized,
        F: FnMut() -> bool,
    {
        let started = Instant::now();
        let goal = &request.goal;
        let start = request.start;

        // ── Short-circuits ────────────────────────────────────────────────
        if caps.is_immobile() {
            return self.finish(started, ResultCode::Invalid, 0, None);
        }
        if !start.is_valid() || !world.is_valid_cell(start.cell) {
            return self.finish(started, ResultCode::Invalid, 0, None);
        }
        if !goal.is_possible(world) {
            return self.finish(started, ResultCode::Invalid, 0, None);
        }
        let weight = request.weight.unwrap_or(self.config.weight);
        if !weight.is_finite() || weight < 0.0 {
            return self.finish(started, ResultCode::Invalid, 0, None);
        }
        if goal.contains(start.cell) {
            return self.finish(started, ResultCode::Success, 0, Some(Vec::new()));
        }

        // ── Search ────────────────────────────────────────────────────────
        let obstacles = ObstacleIndex::build(world, caps.body());
        let input = SearchInput {
            caps,
            obstacles:      &obstacles,
            goal,
            start,
            max_expansions: request.max_expansions.unwrap_or(self.config.max_expansions),
            weight,
            ride_penalty:   self.config.ride_penalty,
            eager_exit:     self.config.eager_goal_exit,
            check_interval: self.config.cancel_check_interval,
            deadline:       self.config.time_budget().map(|b| started + b),
        };

        let primary = self.primary_direction(world, start, goal);
        let first = run_direction(world, &input, primary, &mut keep_going);
        debug!(
            direction = %primary,
            goal = goal.kind(),
            code = %first.code,
            expansions = first.expansions,
            "search finished"
        );

        if !first.code.is_recoverable() {
            return self.finish(started, first.code, first.expansions, first.path);
        }

        let fallback = primary.opposite();
        if fallback == SearchDirection::Inverse && !goal.is_reversible() {
            trace!(goal = goal.kind(), "goal is not reversible; no inverse fallback");
            return self.finish(started, first.code, first.expansions, first.path);
        }

        trace!(direction = %fallback, "primary search exhausted its budget; trying fallback");
        let second = run_direction(world, &input, fallback, &mut keep_going);
        debug!(
            direction = %fallback,
            goal = goal.kind(),
            code = %second.code,
            expansions = second.expansions,
            "fallback search finished"
        );
        self.finish(started, second.code, first.expansions + second.expansions, second.path)
    }

    /// Plan every `(capabilities, request)` pair.
    ///
    /// Requests are independent; with the `parallel` feature they run on
    /// Rayon's thread pool.  `cancel` stops every request still running the
    /// next time it samples cancellation.  Output order matches input order.
    pub fn plan_batch<W, C>(
        &self,
        world:  &W,
        jobs:   &[(&C, PlanRequest)],
        cancel: &std::sync::atomic::AtomicBool,
    ) -> Vec<PlanOutcome>
    where
        W: VoxelWorld + ?Sized,
        C: MovementCapabilities,
    {
        use std::sync::atomic::Ordering;

        let plan_one = |(caps, request): &(&C, PlanRequest)| {
            self.find_path(world, *caps, request, || !cancel.load(Ordering::Relaxed))
        };

        #[cfg(not(feature = "parallel"))]
        {
            jobs.iter().map(plan_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            jobs.par_iter().map(plan_one).collect()
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn primary_direction<W: VoxelWorld + ?Sized>(
        &self,
        world: &W,
        start: MoveState,
        goal:  &GoalRegion,
    ) -> SearchDirection {
        match self.config.direction {
            DirectionPolicy::AlwaysForward => SearchDirection::Forward,
            DirectionPolicy::Openness => {
                let Some(rep) = goal.representative_cell().filter(|_| goal.is_reversible()) else {
                    return SearchDirection::Forward;
                };
                let at_start = openness(world, start.cell);
                let at_goal = openness(world, rep);
                trace!(at_start, at_goal, "openness");
                if at_goal < at_start {
                    SearchDirection::Inverse
                } else {
                    SearchDirection::Forward
                }
            }
        }
    }

    fn finish(
        &self,
        started:    Instant,
        code:       ResultCode,
        expansions: usize,
        path:       Option<Vec<MoveAction>>,
    ) -> PlanOutcome {
        let elapsed = started.elapsed();
        match path {
            Some(path) if code == ResultCode::Success => PlanOutcome {
                path:   Some(path),
                result: PlanResult { code, expansions, elapsed },
            },
            _ => PlanOutcome::failed(code, expansions, elapsed),
        }
    }
}

fn run_direction<W, C, F>(
    world:      &W,
    input:      &SearchInput<'_, C>,
    direction:  SearchDirection,
    keep_going: &mut F,
) -> SearchRun
where
    W: VoxelWorld + ?Sized,
    C: MovementCapabilities + ?Sized,
    F: FnMut() -> bool,
{
    match direction {
        SearchDirection::Forward => search::forward(input, keep_going),
        SearchDirection::Inverse => {
            let seeds = inverse_seeds(world, input.goal);
            search::inverse(input, &seeds, keep_going)
        }
    }
}

/// Goal cells in the 3×3×3 block around the goal's representative cell.
pub fn inverse_seeds<W: VoxelWorld + ?Sized>(world: &W, goal: &GoalRegion) -> Vec<MoveState> {
    let Some(rep) = goal.representative_cell() else {
        return Vec::new();
    };
    rep.neighborhood27()
        .filter(|&c| goal.contains(c))
        .map(|c| world.state_at(c, false))
        .filter(|s| s.is_valid())
        .collect()
}

/// Number of passable cells around `cell`, 0 to 26.
pub fn openness<W: VoxelWorld + ?Sized>(world: &W, cell: Cell) -> usize {
    cell.neighbors26().filter(|&n| world.is_passable(n)).count()
}
