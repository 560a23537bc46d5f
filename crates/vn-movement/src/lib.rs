//! `vn-movement` — what a voxel agent can do, and the edges that follow.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`profile`] | `MovementProfile`: ability flags, fall limit, per-move costs    |
//! | [`walker`]  | `WalkerCapabilities`: `MovementCapabilities` over a voxel world |
//! | [`error`]   | `MovementError`, `MovementResult<T>`                            |
//!
//! # Move model
//!
//! A standing agent walks to any of the four horizontal neighbours (and
//! diagonally when both corner cells are open), jumps one cell up, walks off
//! ledges and falls to the first cell it can stand on, climbs ladders, flies
//! through open air, boards vehicles on rail cells and teleports between
//! pads.  A riding agent follows the rails or dismounts.  Which of these are
//! available, and what each costs, is the agent's [`MovementProfile`].

pub mod error;
pub mod profile;
pub mod walker;


pub use error::{MovementError, MovementResult};
pub use profile::MovementProfile;
pub use walker::WalkerCapabilities;
