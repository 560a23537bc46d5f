//! CSV world loader.
//!
//! # CSV format
//!
//! One row per world feature.  The first data row must be `bounds`.
//!
//! ```csv
//! kind,x,y,z,x2,y2,z2,id
//! bounds,0,0,0,8,4,3,
//! solid,0,0,0,7,0,2,
//! ladder,3,1,1,3,3,1,
//! rail,4,1,0,,,,
//! body,2,1,1,,,,7
//! teleporter,6,1,2,,,,
//! ```
//!
//! | `kind`                                   | Meaning                                      |
//! |------------------------------------------|----------------------------------------------|
//! | `bounds`                                 | map box: `x,y,z` inclusive, `x2,y2,z2` exclusive |
//! | `solid`/`ladder`/`rail`/`empty`/`unloaded` | set `x,y,z`, or fill through `x2,y2,z2` (inclusive) |
//! | `body`                                   | mover filling cell `x,y,z`                    |
//! | `teleporter`                             | teleporter pad in cell `x,y,z`                |
//!
//! Bodies without an `id` get sequential ids after the largest explicit id
//! seen so far.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use vn_core::{BodyId, Bounds, Cell};

use crate::{Body, Voxel, VoxelGrid, VoxelGridBuilder, WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WorldRecord {
    kind: String,
    x:    i32,
    y:    i32,
    z:    i32,
    x2:   Option<i32>,
    y2:   Option<i32>,
    z2:   Option<i32>,
    id:   Option<u32>,
}

impl WorldRecord {
    fn first(&self) -> Cell {
        Cell::new(self.x, self.y, self.z)
    }

    /// Second corner, when all three coordinates are present.
    fn second(&self) -> WorldResult<Option<Cell>> {
        match (self.x2, self.y2, self.z2) {
            (Some(x), Some(y), Some(z)) => Ok(Some(Cell::new(x, y, z))),
            (None, None, None) => Ok(None),
            _ => Err(WorldError::Parse(format!(
                "{} row at {} has a partial second corner",
                self.kind,
                self.first()
            ))),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`VoxelGrid`] from a CSV file.
pub fn load_world_csv(path: &Path) -> WorldResult<VoxelGrid> {
    let file = std::fs::File::open(path)?;
    load_world_reader(file)
}

/// Like [`load_world_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding maps in
/// binaries.
pub fn load_world_reader<R: Read>(reader: R) -> WorldResult<VoxelGrid> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder: Option<VoxelGridBuilder> = None;
    let mut next_id: u32 = 0;

    for result in csv_reader.deserialize::<WorldRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let kind = row.kind.trim().to_ascii_lowercase();

        if kind == "bounds" {
            if builder.is_some() {
                return Err(WorldError::Parse("bounds given more than once".into()));
            }
            let max = row
                .second()?
                .ok_or_else(|| WorldError::Parse("bounds row needs x2,y2,z2".into()))?;
            builder = Some(VoxelGridBuilder::new(Bounds::new(row.first(), max))?);
            continue;
        }

        let b = builder
            .as_mut()
            .ok_or_else(|| WorldError::Parse(format!("{kind} row before bounds row")))?;

        match kind.as_str() {
            "body" | "teleporter" => {
                let id = match row.id {
                    Some(id) => id,
                    None => next_id,
                };
                next_id = next_id.max(id.saturating_add(1));
                let body = if kind == "body" {
                    Body::mover(BodyId(id), row.first())
                } else {
                    Body::teleporter(BodyId(id), row.first())
                };
                b.add_body(body)?;
            }
            other => {
                let voxel = parse_voxel(other)?;
                match row.second()? {
                    Some(corner) => b.fill(row.first(), corner, voxel)?,
                    None => b.set(row.first(), voxel)?,
                };
            }
        }
    }

    builder
        .ok_or_else(|| WorldError::Parse("missing bounds row".into()))?
        .build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_voxel(s: &str) -> WorldResult<Voxel> {
    match s {
        "empty"    => Ok(Voxel::Empty),
        "solid"    => Ok(Voxel::Solid),
        "ladder"   => Ok(Voxel::Ladder),
        "rail"     => Ok(Voxel::Rail),
        "unloaded" => Ok(Voxel::Unloaded),
        other => Err(WorldError::Parse(format!(
            "invalid kind {other:?}: expected bounds, empty, solid, ladder, rail, unloaded, body or teleporter"
        ))),
    }
}
