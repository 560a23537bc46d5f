//! corridor — plan across a small voxel level with the standard walker.
//!
//! The built-in level is a floor split by a two-high wall.  A ladder leads
//! onto the wall, a rail runs along the south edge, and a pair of teleporter
//! pads links the two halves.  Body 1 plans the same trip twice, once as a
//! plain walker and once allowed to use the pads.
//!
//! ```text
//! corridor [--world FILE.csv] [--config FILE.json] [--from X,Y,Z] [--to X,Y,Z]
//! ```
//!
//! Set `RUST_LOG=debug` to see every move and each search direction.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vn_core::{AgentId, Cell, PlannerConfig};
use vn_movement::{MovementProfile, WalkerCapabilities};
use vn_planner::{GoalRegion, PlanRequest, Planner};
use vn_world::{VoxelGrid, VoxelWorld, load_world_csv, load_world_reader};

// ── Built-in level ────────────────────────────────────────────────────────────

const LEVEL_CSV: &str = "\
kind,x,y,z,x2,y2,z2,id\n\
bounds,0,0,0,16,5,5,\n\
solid,0,0,0,15,0,4,\n\
rail,0,1,0,15,1,0,\n\
solid,7,1,0,7,2,4,\n\
ladder,6,1,2,6,2,2,\n\
teleporter,2,1,4,,,,100\n\
teleporter,13,1,4,,,,101\n\
body,1,1,2,,,,1\n\
body,10,1,2,,,,7\n\
";

const DEFAULT_FROM: Cell = Cell::new(1, 1, 2);
const DEFAULT_TO:   Cell = Cell::new(14, 1, 2);
const AGENT:        AgentId = AgentId(1);

// ── Command line ──────────────────────────────────────────────────────────────

struct Args {
    world:  Option<PathBuf>,
    config: Option<PathBuf>,
    from:   Cell,
    to:     Cell,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { world: None, config: None, from: DEFAULT_FROM, to: DEFAULT_TO };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let value = it.next().with_context(|| format!("{flag} needs a value"))?;
        match flag.as_str() {
            "--world"  => args.world = Some(value.into()),
            "--config" => args.config = Some(value.into()),
            "--from"   => args.from = parse_cell(&value)?,
            "--to"     => args.to = parse_cell(&value)?,
            other      => bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

fn parse_cell(s: &str) -> Result<Cell> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("bad cell {s:?}, expected X,Y,Z"))?;
    match parts[..] {
        [x, y, z] => Ok(Cell::new(x, y, z)),
        _ => bail!("bad cell {s:?}, expected X,Y,Z"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn load_world(path: Option<&PathBuf>) -> Result<VoxelGrid> {
    let world = match path {
        Some(path) => load_world_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => load_world_reader(Cursor::new(LEVEL_CSV))?,
    };
    Ok(world)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;
    let world = load_world(args.world.as_ref())?;
    let [unloaded, empty, solid, ladder, rail] = world.census();
    info!(
        bounds = %world.bounds(),
        unloaded, empty, solid, ladder, rail,
        bodies = world.bodies().len(),
        "world loaded"
    );

    let planner = Planner::new(config)?;
    let walker = WalkerCapabilities::new(&world, MovementProfile::walker().with_riding())?
        .with_body(AGENT);
    let jumper = WalkerCapabilities::new(&world, MovementProfile::walker().with_teleport())?
        .with_body(AGENT);

    let start = world.state_at(args.from, false);
    let goal = GoalRegion::adjacent(args.to);
    let request = PlanRequest::new(start, goal);
    let jobs = [("walker", &walker, request), ("teleporter", &jumper, request)];

    let batch: Vec<_> = jobs.iter().map(|&(_, caps, req)| (caps, req)).collect();
    let outcomes = planner.plan_batch(&world, &batch, &AtomicBool::new(false));

    for ((name, caps, _), outcome) in jobs.iter().zip(&outcomes) {
        let result = outcome.result;
        if !outcome.is_success() {
            warn!(agent = name, code = %result.code, expansions = result.expansions, "no path");
            continue;
        }
        info!(
            agent = name,
            moves = outcome.moves().len(),
            cost = outcome.total_cost(*caps),
            expansions = result.expansions,
            elapsed_us = result.elapsed.as_micros() as u64,
            "path found"
        );
        for (i, action) in outcome.moves().iter().enumerate() {
            debug!(agent = name, step = i, "{action}");
        }
    }
    Ok(())
}
