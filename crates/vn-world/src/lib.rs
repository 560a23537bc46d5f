//! `vn-world` — the world surface the movement planner reads from.
//!
//! The planner never mutates the world.  It reads voxel validity and
//! occupancy through the [`VoxelWorld`] trait and snapshots dynamic bodies
//! into an [`ObstacleIndex`] once per search.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`voxel`]     | `Voxel` kinds                                            |
//! | [`body`]      | `Body` — dynamic movers and teleporter pads              |
//! | [`grid`]      | `VoxelWorld` trait, `VoxelGrid`, `VoxelGridBuilder`      |
//! | [`obstacles`] | `ObstacleIndex` (R-tree of body boxes), `Teleporter`     |
//! | [`loader`]    | `load_world_csv`, `load_world_reader`                    |
//! | [`error`]     | `WorldError`, `WorldResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod body;
pub mod error;
pub mod grid;
pub mod loader;
pub mod obstacles;
pub mod voxel;


pub use body::Body;
pub use error::{WorldError, WorldResult};
pub use grid::{VoxelGrid, VoxelGridBuilder, VoxelWorld, MAX_GRID_CELLS};
pub use loader::{load_world_csv, load_world_reader};
pub use obstacles::{ObstacleIndex, Teleporter};
pub use voxel::Voxel;
