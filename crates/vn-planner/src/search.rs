//! Weighted A* in both directions.
//!
//! # Open set
//!
//! A `BinaryHeap` of `(priority, sequence)` entries with lazy invalidation:
//! improving a state's g-score pushes a fresh entry, and any entry popped for
//! a state that is already closed is skipped without counting as an
//! expansion.  The sequence number breaks priority ties in insertion order,
//! so expansion order is fully deterministic.
//!
//! # Directions
//!
//! - **Forward** starts at the request's start state and expands outgoing
//!   edges until a goal state is reached.
//! - **Inverse** starts from every goal cell around the goal's
//!   representative cell (all at g = 0) and expands incoming edges until the
//!   start state is reached.  Its `came_from` map points *toward* the goal,
//!   so the path is read off by walking forward from the start.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Instant;

use vn_core::{MoveAction, MoveState};
use vn_world::ObstacleIndex;

use crate::capability::action_cost;
use crate::{GoalRegion, MovementCapabilities, ResultCode};

#[cfg(feature = "fx-hash")]
type StateMap<V> = rustc_hash::FxHashMap<MoveState, V>;
#[cfg(not(feature = "fx-hash"))]
type StateMap<V> = std::collections::HashMap<MoveState, V>;

#[cfg(feature = "fx-hash")]
type StateSet = rustc_hash::FxHashSet<MoveState>;
#[cfg(not(feature = "fx-hash"))]
type StateSet = std::collections::HashSet<MoveState>;

// ── Direction ─────────────────────────────────────────────────────────────────

/// Which way a search runs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SearchDirection {
    Forward,
    Inverse,
}

impl SearchDirection {
    pub fn opposite(self) -> Self {
        match self {
            SearchDirection::Forward => SearchDirection::Inverse,
            SearchDirection::Inverse => SearchDirection::Forward,
        }
    }
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchDirection::Forward => "forward",
            SearchDirection::Inverse => "inverse",
        })
    }
}

// ── Inputs / outputs ──────────────────────────────────────────────────────────

/// Everything one search direction needs, resolved by the planner.
pub(crate) struct SearchInput<'a, C: ?Sized> {
    pub caps:           &'a C,
    pub obstacles:      &'a ObstacleIndex,
    pub goal:           &'a GoalRegion,
    pub start:          MoveState,
    pub max_expansions: usize,
    pub weight:         f32,
    pub ride_penalty:   f32,
    pub eager_exit:     bool,
    pub check_interval: usize,
    pub deadline:       Option<Instant>,
}

/// Outcome of one direction.
#[derive(Debug)]
pub(crate) struct SearchRun {
    pub code:       ResultCode,
    pub expansions: usize,
    pub path:       Option<Vec<MoveAction>>,
}

impl SearchRun {
    fn stopped(code: ResultCode, expansions: usize) -> Self {
        Self { code, expansions, path: None }
    }

    fn success(expansions: usize, path: Vec<MoveAction>) -> Self {
        Self { code: ResultCode::Success, expansions, path: Some(path) }
    }
}

// ── Open-set entry ────────────────────────────────────────────────────────────

struct OpenEntry {
    priority: f32,
    seq:      u64,
    state:    MoveState,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: lowest priority, then earliest insertion,
        // is "greatest".
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── Search bookkeeping ────────────────────────────────────────────────────────

/// Open heap, closed set, g-scores and best links for one search call.
#[derive(Default)]
struct Frontier {
    heap:      BinaryHeap<OpenEntry>,
    seq:       u64,
    g_score:   StateMap<f32>,
    came_from: StateMap<MoveAction>,
    closed:    StateSet,
}

impl Frontier {
    fn open(&mut self, state: MoveState, g: f32, priority: f32) {
        debug_assert!(state.is_valid(), "invalid state pushed into the open set");
        self.g_score.insert(state, g);
        self.heap.push(OpenEntry { priority, seq: self.seq, state });
        self.seq += 1;
    }

    /// Pop the best open state and close it, skipping stale entries.
    fn pop(&mut self) -> Option<MoveState> {
        while let Some(entry) = self.heap.pop() {
            if self.closed.insert(entry.state) {
                return Some(entry.state);
            }
        }
        None
    }

    /// `true` if reaching `state` at cost `g` beats what is already known.
    fn improves(&self, state: MoveState, g: f32) -> bool {
        !self.closed.contains(&state) && self.g_score.get(&state).is_none_or(|&old| g < old)
    }

    #[inline]
    fn g(&self, state: MoveState) -> f32 {
        self.g_score.get(&state).copied().unwrap_or(f32::INFINITY)
    }

    #[inline]
    fn has_link(&self, state: MoveState) -> bool {
        self.came_from.contains_key(&state)
    }

    /// Forward reconstruction: follow links back to a state without one
    /// (the start), then reverse.
    fn path_back_from(&self, mut state: MoveState) -> Vec<MoveAction> {
        let mut path = Vec::new();
        while let Some(&edge) = self.came_from.get(&state) {
            path.push(edge);
            state = edge.source;
        }
        path.reverse();
        path
    }

    /// Inverse reconstruction: follow links forward to a state without one
    /// (a goal seed).
    fn path_forward_from(&self, mut state: MoveState) -> Vec<MoveAction> {
        let mut path = Vec::new();
        while let Some(&edge) = self.came_from.get(&state) {
            path.push(edge);
            state = edge.destination;
        }
        path
    }
}

/// Sample cancellation and the deadline every `check_interval` expansions.
fn interrupted<C: ?Sized, F: FnMut() -> bool>(
    input:      &SearchInput<'_, C>,
    expansions: usize,
    keep_going: &mut F,
) -> Option<ResultCode> {
    if !expansions.is_multiple_of(input.check_interval) {
        return None;
    }
    if !keep_going() {
        return Some(ResultCode::Cancelled);
    }
    if input.deadline.is_some_and(|d| Instant::now() >= d) {
        return Some(ResultCode::MaxExpansionsReached);
    }
    None
}

// ── Forward search ────────────────────────────────────────────────────────────

pub(crate) fn forward<C, F>(input: &SearchInput<'_, C>, keep_going: &mut F) -> SearchRun
where
    C: MovementCapabilities + ?Sized,
    F: FnMut() -> bool,
{
    let scale = input.caps.heuristic_scale();
    let goal = input.goal;
    let estimate = |state: MoveState| {
        let penalty = if state.riding_vehicle && !goal.contains(state.cell) {
            input.ride_penalty
        } else {
            0.0
        };
        input.weight * (scale * goal.heuristic(state.cell) + penalty)
    };

    let mut frontier = Frontier::default();
    frontier.open(input.start, 0.0, estimate(input.start));
    let mut expansions = 0usize;

    loop {
        if expansions >= input.max_expansions {
            return SearchRun::stopped(ResultCode::MaxExpansionsReached, expansions);
        }
        if let Some(code) = interrupted(input, expansions, keep_going) {
            return SearchRun::stopped(code, expansions);
        }
        let Some(current) = frontier.pop() else {
            return SearchRun::stopped(ResultCode::NoSolution, expansions);
        };
        expansions += 1;

        let linked = frontier.has_link(current);
        if linked && goal.contains(current.cell) {
            return SearchRun::success(expansions, frontier.path_back_from(current));
        }

        let current_g = frontier.g(current);
        let teleporters = input.obstacles.teleporters();
        for edge in input.caps.forward_edges(current, input.obstacles, teleporters) {
            let next = edge.destination;
            if !next.is_valid() {
                continue;
            }
            if input.eager_exit && linked && !next.riding_vehicle && goal.contains(next.cell) {
                let mut path = frontier.path_back_from(current);
                path.push(edge);
                return SearchRun::success(expansions, path);
            }

            let tentative = current_g + action_cost(input.caps, &edge);
            if !frontier.improves(next, tentative) {
                continue;
            }
            frontier.came_from.insert(next, edge);
            frontier.open(next, tentative, tentative + estimate(next));
        }
    }
}

// ── Inverse search ────────────────────────────────────────────────────────────

pub(crate) fn inverse<C, F>(
    input:      &SearchInput<'_, C>,
    seeds:      &[MoveState],
    keep_going: &mut F,
) -> SearchRun
where
    C: MovementCapabilities + ?Sized,
    F: FnMut() -> bool,
{
    let scale = input.caps.heuristic_scale();
    let start = input.start;
    let estimate = |state: MoveState| {
        let penalty = if state.riding_vehicle && state != start { input.ride_penalty } else { 0.0 };
        input.weight * (scale * state.cell.distance(start.cell) + penalty)
    };

    let mut frontier = Frontier::default();
    for &seed in seeds.iter().filter(|s| s.is_valid()) {
        if frontier.improves(seed, 0.0) {
            frontier.open(seed, 0.0, estimate(seed));
        }
    }
    let mut expansions = 0usize;

    loop {
        if expansions >= input.max_expansions {
            return SearchRun::stopped(ResultCode::MaxExpansionsReached, expansions);
        }
        if let Some(code) = interrupted(input, expansions, keep_going) {
            return SearchRun::stopped(code, expansions);
        }
        let Some(current) = frontier.pop() else {
            return SearchRun::stopped(ResultCode::NoSolution, expansions);
        };
        expansions += 1;

        let linked = frontier.has_link(current);
        if linked && current == start {
            return SearchRun::success(expansions, frontier.path_forward_from(current));
        }

        let current_g = frontier.g(current);
        let teleporters = input.obstacles.teleporters();
        for edge in input.caps.inverse_edges(current, input.obstacles, teleporters) {
            let prev = edge.source;
            if !prev.is_valid() {
                continue;
            }
            if input.eager_exit && linked && prev == start {
                let mut path = vec![edge];
                path.extend(frontier.path_forward_from(current));
                return SearchRun::success(expansions, path);
            }

            let tentative = current_g + action_cost(input.caps, &edge);
            if !frontier.improves(prev, tentative) {
                continue;
            }
            frontier.came_from.insert(prev, edge);
            frontier.open(prev, tentative, tentative + estimate(prev));
        }
    }
}
