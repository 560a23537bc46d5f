//! Unit tests for vn-planner.
//!
//! The planner is exercised through a minimal six-neighbour mover over
//! hand-drawn single-layer maps, so these tests do not depend on the
//! standard walker in `vn-movement`.

#[cfg(test)]
mod helpers {
    use vn_core::{BodyId, Bounds, Cell, MoveAction, MoveState, MoveType};
    use vn_world::{ObstacleIndex, Teleporter, Voxel, VoxelGrid, VoxelGridBuilder, VoxelWorld};

    use crate::MovementCapabilities;

    /// Moves one cell along any axis into a passable, unoccupied cell.
    /// Every move is a `Walk` costing `2` (distance 1, intrinsic 1).
    pub struct GridMover<'w> {
        pub world:    &'w VoxelGrid,
        pub immobile: bool,
        pub body:     Option<BodyId>,
    }

    impl<'w> GridMover<'w> {
        pub fn new(world: &'w VoxelGrid) -> Self {
            Self { world, immobile: false, body: None }
        }
    }

    impl MovementCapabilities for GridMover<'_> {
        fn forward_edges<'a>(
            &'a self,
            state:        MoveState,
            obstacles:    &'a ObstacleIndex,
            _teleporters: &'a [Teleporter],
        ) -> impl Iterator<Item = MoveAction> + 'a {
            state
                .cell
                .neighbors6()
                .into_iter()
                .filter(move |&n| self.world.is_passable(n) && !obstacles.is_occupied(n))
                .map(move |n| MoveAction::new(state, MoveState::standing(n), MoveType::Walk))
        }

        fn inverse_edges<'a>(
            &'a self,
            state:       MoveState,
            obstacles:   &'a ObstacleIndex,
            teleporters: &'a [Teleporter],
        ) -> impl Iterator<Item = MoveAction> + 'a {
            state
                .cell
                .neighbors6()
                .into_iter()
                .filter(move |&p| self.world.is_passable(p))
                .flat_map(move |p| {
                    self.forward_edges(MoveState::standing(p), obstacles, teleporters)
                        .filter(move |e| e.destination == state)
                })
        }

        fn intrinsic_cost(&self, _move_type: MoveType) -> f32 {
            1.0
        }

        fn is_immobile(&self) -> bool {
            self.immobile
        }

        fn body(&self) -> Option<BodyId> {
            self.body
        }
    }

    /// Parsed single-layer map: `#` solid, `.` empty, `S` start, `G` goal.
    /// Rows run along z, characters along x; the layer sits at y = 0.
    pub struct Map {
        pub world: VoxelGrid,
        pub start: Cell,
        pub goal:  Cell,
    }

    pub fn map(rows: &[&str]) -> Map {
        let depth = rows.len() as i32;
        let width = rows[0].len() as i32;
        let mut b = VoxelGridBuilder::new(Bounds::from_size(width, 1, depth)).unwrap();
        let mut start = Cell::INVALID;
        let mut goal = Cell::INVALID;
        for (z, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, 0, z as i32);
                match ch {
                    '#' => {
                        b.set(cell, Voxel::Solid).unwrap();
                    }
                    'S' => start = cell,
                    'G' => goal = cell,
                    _ => {}
                }
            }
        }
        Map { world: b.build().unwrap(), start, goal }
    }

    /// Start on the left, goal at the end of a long corridor, and a
    /// dead-end room right between them as the crow flies.  Forward search
    /// floods the room; inverse search only walks the corridor.
    ///
    /// Shortest path: 21 moves, cost 42.
    pub fn room_and_corridor() -> Map {
        map(&[
            "............",
            "#.#########.",
            "#.........#.",
            "#.........#.",
            "#.........#.",
            "S.........#G",
            "##........##",
            "##........##",
            "##........##",
            "##........##",
            "############",
        ])
    }
}

// ── Goal regions ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod goal {
    use vn_core::{Bounds, Cell};
    use vn_world::{Voxel, VoxelGridBuilder, VoxelWorld};

    use crate::GoalRegion;

    #[test]
    fn exact_cell() {
        let g = GoalRegion::exact(Cell::new(5, 0, 0));
        assert!(g.contains(Cell::new(5, 0, 0)));
        assert!(!g.contains(Cell::new(5, 1, 0)));
        assert_eq!(g.heuristic(Cell::new(2, 0, 4)), 5.0);
        assert_eq!(g.representative_cell(), Some(Cell::new(5, 0, 0)));
        assert!(g.is_reversible());
    }

    #[test]
    fn adjacent_accepts_sides_and_one_above() {
        let t = Cell::new(4, 4, 4);
        let g = GoalRegion::adjacent(t);
        assert!(g.contains(t));
        assert!(g.contains(Cell::new(5, 4, 4)));
        assert!(g.contains(Cell::new(4, 5, 3)));
        assert!(!g.contains(Cell::new(4, 3, 4)), "below is not adjacent");
        assert!(!g.contains(Cell::new(5, 4, 5)), "diagonals are not adjacent");
        assert!(!g.contains(Cell::new(4, 6, 4)));
    }

    #[test]
    fn adjacent_to_block() {
        let g = GoalRegion::adjacent(Cell::new(2, 0, 2));
        assert!(g.contains(Cell::new(3, 0, 2)));
        assert!(g.contains(Cell::new(2, 1, 2)));
        assert!(!g.contains(Cell::new(3, 0, 3)));
    }

    #[test]
    fn adjacent_heuristic_is_a_lower_bound() {
        let t = Cell::new(0, 0, 0);
        let g = GoalRegion::adjacent(t);
        assert_eq!(g.heuristic(Cell::new(1, 1, 0)), 0.0);
        let far = Cell::new(10, 0, 0);
        let nearest = Cell::new(1, 0, 0);
        assert!(g.heuristic(far) <= far.distance(nearest));
    }

    #[test]
    fn sphere_membership_uses_cell_origin() {
        let g = GoalRegion::sphere([0.0, 0.0, -0.37], 2.0);
        // 1 + 1 + 1.8769 = 3.8769 ≤ 4
        assert!(g.contains(Cell::new(1, 1, 1)));

        let g = GoalRegion::sphere([0.0, 0.0, 0.3], 2.0);
        // 4 + 0 + 0.09 = 4.09 > 4
        assert!(!g.contains(Cell::new(2, 0, 0)));
        assert!(g.heuristic(Cell::new(2, 0, 0)) > 0.0);
        assert_eq!(g.heuristic(Cell::new(0, 0, 0)), 0.0);
    }

    #[test]
    fn world_edge_is_horizontal_only() {
        let bounds = Bounds::from_size(9, 9, 9);
        let g = GoalRegion::world_edge(bounds);
        assert!(g.contains(Cell::new(0, 4, 4)));
        assert!(g.contains(Cell::new(4, 4, 7)));
        assert!(!g.contains(Cell::new(4, 0, 4)), "top and bottom are not edges");
        assert!(!g.contains(Cell::new(-1, 4, 4)), "outside the map");
        assert_eq!(g.heuristic(Cell::new(4, 4, 4)), 3.0);
        assert!(!g.is_reversible());
        assert_eq!(g.representative_cell(), None);
    }

    #[test]
    fn feasibility() {
        let mut b = VoxelGridBuilder::new(Bounds::from_size(5, 5, 5)).unwrap();
        b.fill(Cell::new(0, 0, 0), Cell::new(4, 4, 4), Voxel::Solid).unwrap();
        b.set(Cell::new(2, 2, 2), Voxel::Empty).unwrap();
        b.set(Cell::new(0, 4, 0), Voxel::Empty).unwrap();
        b.set(Cell::new(1, 4, 0), Voxel::Empty).unwrap();
        let world = b.build().unwrap();

        // Sealed on all six faces.
        assert!(!GoalRegion::exact(Cell::new(2, 2, 2)).is_possible(&world));
        assert!(!GoalRegion::exact(Cell::new(3, 3, 3)).is_possible(&world), "solid");
        assert!(GoalRegion::exact(Cell::new(0, 4, 0)).is_possible(&world));
        assert!(GoalRegion::adjacent(Cell::new(1, 3, 0)).is_possible(&world));
        assert!(!GoalRegion::adjacent(Cell::new(3, 1, 3)).is_possible(&world));
        assert!(GoalRegion::sphere([2.5, 2.5, 2.5], 1.0).is_possible(&world));
        assert!(!GoalRegion::sphere([20.0, 2.5, 2.5], 1.0).is_possible(&world));
        assert!(GoalRegion::world_edge(world.bounds()).is_possible(&world));
    }
}

// ── Results & requests ────────────────────────────────────────────────────────

#[cfg(test)]
mod result {
    use std::time::Duration;

    use vn_core::{Cell, MoveState};

    use crate::{GoalRegion, PlanOutcome, PlanRequest, ResultCode};

    #[test]
    fn only_budget_exhaustion_is_recoverable() {
        assert!(ResultCode::MaxExpansionsReached.is_recoverable());
        for code in [
            ResultCode::Cancelled,
            ResultCode::Invalid,
            ResultCode::NoSolution,
            ResultCode::Success,
        ] {
            assert!(!code.is_recoverable(), "{code}");
        }
    }

    #[test]
    fn failed_outcome_has_no_path() {
        let o = PlanOutcome::failed(ResultCode::NoSolution, 7, Duration::ZERO);
        assert!(o.path.is_none());
        assert!(o.moves().is_empty());
        assert!(!o.is_success());
        assert_eq!(o.result.expansions, 7);
    }

    #[test]
    fn request_overrides() {
        let r = PlanRequest::new(MoveState::standing(Cell::ORIGIN), GoalRegion::exact(Cell::ORIGIN))
            .max_expansions(5)
            .weight(2.0);
        assert_eq!(r.max_expansions, Some(5));
        assert_eq!(r.weight, Some(2.0));
    }
}

// ── Short-circuits ────────────────────────────────────────────────────────────

#[cfg(test)]
mod short_circuit {
    use vn_core::{Cell, MoveState, PlannerConfig};

    use super::helpers::{GridMover, map};
    use crate::{GoalRegion, PlanError, PlanRequest, Planner, ResultCode};

    fn corridor() -> super::helpers::Map {
        map(&["S....G"])
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlannerConfig { cancel_check_interval: 0, ..PlannerConfig::default() };
        assert!(matches!(Planner::new(config), Err(PlanError::Config(_))));
    }

    #[test]
    fn start_in_goal_is_trivial_success() {
        let m = corridor();
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::adjacent(m.start));
        let out = planner.find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.path, Some(Vec::new()));
        assert_eq!(out.result.expansions, 0);
    }

    #[test]
    fn immobile_agent_is_invalid() {
        let m = corridor();
        let caps = GridMover { immobile: true, ..GridMover::new(&m.world) };
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Invalid);
        assert_eq!(out.result.expansions, 0);
        assert!(out.path.is_none());
    }

    #[test]
    fn invalid_start_is_invalid() {
        let m = corridor();
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        for start in [MoveState::INVALID, MoveState::standing(Cell::new(-3, 0, 0))] {
            let req = PlanRequest::new(start, GoalRegion::exact(m.goal));
            let out = planner.find_path(&m.world, &caps, &req, || true);
            assert_eq!(out.code(), ResultCode::Invalid, "start {start}");
            assert_eq!(out.result.expansions, 0);
        }
    }

    #[test]
    fn bad_request_weight_is_invalid() {
        let m = corridor();
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        for weight in [-5.0, f32::NAN, f32::INFINITY] {
            let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))
                .weight(weight);
            let out = planner.find_path(&m.world, &caps, &req, || true);
            assert_eq!(out.code(), ResultCode::Invalid, "weight {weight}");
            assert_eq!(out.result.expansions, 0);
        }
        // zero is allowed: plain uniform-cost search
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))
            .weight(0.0);
        assert_eq!(planner.find_path(&m.world, &caps, &req, || true).code(), ResultCode::Success);
    }

    #[test]
    fn impossible_goal_is_invalid() {
        let m = map(&["S..#G#"]);
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        // G is boxed in: solid on both sides and the layer has no neighbours
        // above or below.
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = planner.find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Invalid);
        assert_eq!(out.result.expansions, 0);
    }
}

// ── Search behaviour ──────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use std::cell::Cell as Counter;

    use vn_core::{BodyId, Cell, DirectionPolicy, MoveState, MoveType, PlannerConfig};
    use vn_world::{Body, VoxelWorld};

    use super::helpers::{GridMover, map, room_and_corridor};
    use crate::{GoalRegion, PlanRequest, Planner, ResultCode, SearchDirection, inverse_seeds, openness};

    #[test]
    fn straight_corridor() {
        let m = map(&["S....G"]);
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);

        assert_eq!(out.code(), ResultCode::Success);
        let moves = out.moves();
        assert_eq!(moves.len(), 5);
        assert_eq!(out.total_cost(&caps), 10.0);
        assert_eq!(moves[0].source, MoveState::standing(m.start));
        assert_eq!(moves[4].destination, MoveState::standing(m.goal));
        for pair in moves.windows(2) {
            assert_eq!(pair[0].destination, pair[1].source);
        }
        assert!(moves.iter().all(|a| a.move_type == MoveType::Walk));
    }

    #[test]
    fn wall_means_no_solution() {
        let m = map(&[
            "..#..",
            "..#..",
            "S.#.G",
            "..#..",
            "..#..",
        ]);
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::NoSolution);
        // The whole reachable side, and nothing else.
        assert_eq!(out.result.expansions, 10);
        assert!(out.path.is_none());
    }

    #[test]
    fn detour_around_a_wall() {
        let m = map(&[
            ".....",
            "..#..",
            "S.#.G",
            "..#..",
            "..#..",
        ]);
        let caps = GridMover::new(&m.world);
        let config = PlannerConfig { eager_goal_exit: false, ..PlannerConfig::default() };
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::new(config).unwrap().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.moves().len(), 8);
    }

    #[test]
    fn cancellation_is_sampled_on_the_check_interval() {
        let m = map(&["S..................G"]);
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let calls = Counter::new(0);
        let out = Planner::default().find_path(&m.world, &caps, &req, || {
            calls.set(calls.get() + 1);
            calls.get() < 2
        });
        assert_eq!(out.code(), ResultCode::Cancelled);
        assert_eq!(out.result.expansions, 10);
        assert_eq!(calls.get(), 2, "cancelled searches do not fall back");
    }

    #[test]
    fn cancelled_before_the_first_expansion() {
        let m = map(&["S....G"]);
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::default().find_path(&m.world, &caps, &req, || false);
        assert_eq!(out.code(), ResultCode::Cancelled);
        assert_eq!(out.result.expansions, 0);
    }

    #[test]
    fn forward_alone_with_enough_budget() {
        let m = room_and_corridor();
        let caps = GridMover::new(&m.world);
        let config = PlannerConfig { eager_goal_exit: false, ..PlannerConfig::default() };
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::new(config).unwrap().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.moves().len(), 21);
        assert_eq!(out.total_cost(&caps), 42.0);
        assert!(out.result.expansions > 60, "forward floods the room");
    }

    #[test]
    fn budget_exhaustion_falls_back_to_inverse() {
        let m = room_and_corridor();
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))
            .max_expansions(40);
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);

        assert_eq!(out.code(), ResultCode::Success);
        let moves = out.moves();
        assert_eq!(moves.len(), 21);
        assert_eq!(moves[0].source, MoveState::standing(m.start));
        assert_eq!(moves[20].destination, MoveState::standing(m.goal));
        for pair in moves.windows(2) {
            assert_eq!(pair[0].destination, pair[1].source);
        }
        // Both directions' work is reported.
        assert!(out.result.expansions > 40);
        assert!(out.result.expansions <= 80);
    }

    #[test]
    fn both_directions_out_of_budget() {
        let m = room_and_corridor();
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))
            .max_expansions(5);
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);

        assert_eq!(out.code(), ResultCode::MaxExpansionsReached);
        assert!(out.path.is_none());
        assert_eq!(out.result.expansions, 10);
    }

    #[test]
    fn openness_policy_searches_inverse_first() {
        let m = room_and_corridor();
        assert_eq!(openness(&m.world, m.start), 2);
        assert_eq!(openness(&m.world, m.goal), 1);

        let caps = GridMover::new(&m.world);
        let config = PlannerConfig { direction: DirectionPolicy::Openness, ..PlannerConfig::default() };
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))
            .max_expansions(40);
        let out = Planner::new(config).unwrap().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.moves().len(), 21);
        assert!(out.result.expansions < 40, "one inverse run is enough");
    }

    #[test]
    fn world_edge_never_falls_back() {
        let m = map(&[
            ".........",
            ".........",
            ".........",
            ".........",
            "....S....",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let caps = GridMover::new(&m.world);
        let goal = GoalRegion::world_edge(m.world.bounds());
        assert_eq!(SearchDirection::Forward.opposite(), SearchDirection::Inverse);

        let req = PlanRequest::new(MoveState::standing(m.start), goal).max_expansions(1);
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::MaxExpansionsReached);
        assert_eq!(out.result.expansions, 1);

        let req = PlanRequest::new(MoveState::standing(m.start), goal);
        let out = Planner::default().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.moves().len(), 3);
        let end = out.moves()[2].destination.cell;
        assert!(goal.contains(end));
    }

    #[test]
    fn time_budget_reports_max_expansions() {
        let m = map(&["S....G"]);
        let caps = GridMover::new(&m.world);
        let config = PlannerConfig { time_budget_ms: Some(0), ..PlannerConfig::default() };
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let out = Planner::new(config).unwrap().find_path(&m.world, &caps, &req, || true);
        assert_eq!(out.code(), ResultCode::MaxExpansionsReached);
        assert_eq!(out.result.expansions, 0);
    }

    #[test]
    fn other_bodies_block_but_our_own_does_not() {
        let mut m = map(&["S.....G"]);
        m.world.add_body(Body::mover(BodyId(1), Cell::new(3, 0, 0))).unwrap();
        m.world.add_body(Body::mover(BodyId(2), m.start)).unwrap();
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let planner = Planner::default();

        let blocked = GridMover { body: Some(BodyId(2)), ..GridMover::new(&m.world) };
        let out = planner.find_path(&m.world, &blocked, &req, || true);
        assert_eq!(out.code(), ResultCode::NoSolution);

        // Planning for body 1 ignores body 1 itself.
        let mut m2 = map(&["S.....G"]);
        m2.world.add_body(Body::mover(BodyId(1), Cell::new(3, 0, 0))).unwrap();
        let own = GridMover { body: Some(BodyId(1)), ..GridMover::new(&m2.world) };
        let out = planner.find_path(&m2.world, &own, &req, || true);
        assert_eq!(out.code(), ResultCode::Success);
        assert_eq!(out.moves().len(), 6);
    }

    #[test]
    fn inverse_seeds_are_goal_cells_around_the_target() {
        let m = map(&[
            "#...#",
            ".....",
            "..G..",
            ".....",
        ]);
        let seeds = inverse_seeds(&m.world, &GoalRegion::adjacent(m.goal));
        // Target plus its four horizontal neighbours; nothing above this layer.
        assert_eq!(seeds.len(), 5);
        assert!(seeds.iter().all(|s| !s.riding_vehicle));

        let sphere = GoalRegion::sphere([2.0, 0.0, 2.0], 1.5);
        let seeds = inverse_seeds(&m.world, &sphere);
        assert_eq!(seeds.len(), 9);

        let edge = GoalRegion::world_edge(m.world.bounds());
        assert!(inverse_seeds(&m.world, &edge).is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let m = room_and_corridor();
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::sphere([6.0, 0.0, 8.0], 1.0));
        let a = planner.find_path(&m.world, &caps, &req, || true);
        let b = planner.find_path(&m.world, &caps, &req, || true);
        assert_eq!(a.code(), ResultCode::Success);
        assert_eq!(a.path, b.path);
        assert_eq!(a.result.expansions, b.result.expansions);
    }
}

// ── Batches ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch {
    use std::sync::atomic::AtomicBool;

    use vn_core::MoveState;

    use super::helpers::{GridMover, map};
    use crate::{GoalRegion, PlanRequest, Planner, ResultCode};

    #[test]
    fn outcomes_follow_input_order() {
        let m = map(&[
            "S....G",
            "......",
            "###.##",
        ]);
        let caps = GridMover::new(&m.world);
        let planner = Planner::default();
        let jobs = vec![
            (&caps, PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal))),
            (&caps, PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.start))),
            (&caps, PlanRequest::new(MoveState::INVALID, GoalRegion::exact(m.goal))),
        ];
        let out = planner.plan_batch(&m.world, &jobs, &AtomicBool::new(false));
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].moves().len(), 5);
        assert_eq!(out[1].code(), ResultCode::Success);
        assert!(out[1].moves().is_empty());
        assert_eq!(out[2].code(), ResultCode::Invalid);
    }

    #[test]
    fn shared_cancel_flag() {
        let m = map(&["S....G"]);
        let caps = GridMover::new(&m.world);
        let req = PlanRequest::new(MoveState::standing(m.start), GoalRegion::exact(m.goal));
        let jobs = vec![(&caps, req), (&caps, req)];
        let out = Planner::default().plan_batch(&m.world, &jobs, &AtomicBool::new(true));
        assert!(out.iter().all(|o| o.code() == ResultCode::Cancelled));
    }
}

// ── Optimality ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod optimality {
    use std::collections::{HashMap, VecDeque};

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use vn_core::{Bounds, Cell, MoveState, PlannerConfig};
    use vn_world::{ObstacleIndex, Voxel, VoxelGrid, VoxelGridBuilder, VoxelWorld};

    use super::helpers::GridMover;
    use crate::search::{self, SearchInput};
    use crate::{
        GoalRegion, MovementCapabilities, PlanRequest, Planner, ResultCode, inverse_seeds,
    };

    fn random_world(rng: &mut SmallRng) -> VoxelGrid {
        let bounds = Bounds::from_size(7, 3, 7);
        let mut b = VoxelGridBuilder::new(bounds).unwrap();
        for y in 0..3 {
            for z in 0..7 {
                for x in 0..7 {
                    if rng.gen_bool(0.3) {
                        b.set(Cell::new(x, y, z), Voxel::Solid).unwrap();
                    }
                }
            }
        }
        b.build().unwrap()
    }

    fn random_open_cell(world: &VoxelGrid, rng: &mut SmallRng) -> Option<Cell> {
        (0..50)
            .map(|_| Cell::new(rng.gen_range(0..7), rng.gen_range(0..3), rng.gen_range(0..7)))
            .find(|&c| world.is_passable(c))
    }

    /// Breadth-first step counts over the mover's own edges.
    fn oracle_steps(world: &VoxelGrid, caps: &GridMover<'_>, from: Cell) -> HashMap<Cell, usize> {
        let obstacles = ObstacleIndex::build(world, None);
        let mut dist = HashMap::from([(from, 0usize)]);
        let mut queue = VecDeque::from([from]);
        while let Some(c) = queue.pop_front() {
            let d = dist[&c];
            for e in caps.forward_edges(MoveState::standing(c), &obstacles, &[]) {
                let n = e.destination.cell;
                if !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    #[test]
    fn matches_breadth_first_oracle_in_both_directions() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let exhaustive = PlannerConfig { eager_goal_exit: false, ..PlannerConfig::default() };
        let forward = Planner::new(exhaustive.clone()).unwrap();

        let mut checked = 0;
        for _ in 0..200 {
            let world = random_world(&mut rng);
            let (Some(start), Some(goal)) =
                (random_open_cell(&world, &mut rng), random_open_cell(&world, &mut rng))
            else {
                continue;
            };
            let caps = GridMover::new(&world);
            let region = GoalRegion::exact(goal);
            let req = PlanRequest::new(MoveState::standing(start), region);
            let out = forward.find_path(&world, &caps, &req, || true);

            if !region.is_possible(&world) {
                assert_eq!(out.code(), ResultCode::Invalid);
                continue;
            }
            match oracle_steps(&world, &caps, start).get(&goal) {
                None => assert_eq!(out.code(), ResultCode::NoSolution, "{start} -> {goal}"),
                Some(&steps) => {
                    assert_eq!(out.code(), ResultCode::Success, "{start} -> {goal}");
                    assert_eq!(out.moves().len(), steps, "{start} -> {goal}");
                    assert_eq!(out.total_cost(&caps), 2.0 * steps as f32);
                    checked += 1;
                }
            }
        }
        assert!(checked > 20, "too few solvable instances: {checked}");
    }

    /// Run the inverse direction on its own, bypassing the planner.
    fn inverse_only(world: &VoxelGrid, caps: &GridMover<'_>, start: Cell, goal: Cell) -> (ResultCode, usize) {
        let obstacles = ObstacleIndex::build(world, None);
        let region = GoalRegion::exact(goal);
        let input = SearchInput {
            caps,
            obstacles:      &obstacles,
            goal:           &region,
            start:          MoveState::standing(start),
            max_expansions: 10_000,
            weight:         1.0,
            ride_penalty:   0.0,
            eager_exit:     false,
            check_interval: 10,
            deadline:       None,
        };
        let seeds = inverse_seeds(world, &region);
        let run = search::inverse(&input, &seeds, &mut || true);
        (run.code, run.path.map_or(0, |p| p.len()))
    }

    #[test]
    fn inverse_search_is_optimal_too() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut checked = 0;

        for _ in 0..200 {
            let world = random_world(&mut rng);
            let (Some(start), Some(goal)) =
                (random_open_cell(&world, &mut rng), random_open_cell(&world, &mut rng))
            else {
                continue;
            };
            if start == goal || !GoalRegion::exact(goal).is_possible(&world) {
                continue;
            }
            let caps = GridMover::new(&world);
            let (code, len) = inverse_only(&world, &caps, start, goal);
            match oracle_steps(&world, &caps, start).get(&goal) {
                None => assert_eq!(code, ResultCode::NoSolution, "{start} -> {goal}"),
                Some(&steps) => {
                    assert_eq!(code, ResultCode::Success, "{start} -> {goal}");
                    assert_eq!(len, steps, "{start} -> {goal}");
                    checked += 1;
                }
            }
        }
        assert!(checked > 20, "too few solvable instances: {checked}");
    }
}
