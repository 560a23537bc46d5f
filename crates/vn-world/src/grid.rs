//! The world query surface and the dense voxel grid implementation.
//!
//! # Data layout
//!
//! `VoxelGrid` stores one `Voxel` per cell in a flat `Vec`, indexed by
//! [`Bounds::linear_index`] (x fastest, then z, then y).  Lookups outside the
//! map return [`Voxel::Unloaded`] instead of panicking, so callers can probe
//! neighbours freely at the map edge.

use vn_core::{Bounds, Cell, MoveState};

use crate::{Body, Voxel, WorldError, WorldResult};

// ── VoxelWorld trait ──────────────────────────────────────────────────────────

/// Read-only world access used by the planner and capability providers.
///
/// Implement this trait to plan over a different voxel storage (chunked,
/// streamed, …) without touching the planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so that independent planning
/// requests can share one world across worker threads.
pub trait VoxelWorld: Send + Sync {
    /// The map box.  Every valid cell lies inside it.
    fn bounds(&self) -> Bounds;

    /// Content of `cell`; [`Voxel::Unloaded`] outside the map.
    fn voxel(&self, cell: Cell) -> Voxel;

    /// Every body currently in the world.
    fn bodies(&self) -> &[Body];

    /// `true` for in-bounds, loaded cells.
    #[inline]
    fn is_valid_cell(&self, cell: Cell) -> bool {
        self.voxel(cell).is_loaded()
    }

    #[inline]
    fn is_solid(&self, cell: Cell) -> bool {
        self.voxel(cell).is_solid()
    }

    #[inline]
    fn is_passable(&self, cell: Cell) -> bool {
        self.voxel(cell).is_passable()
    }

    /// `true` if an agent can stand in `cell` without falling: the cell is
    /// passable and is either a ladder or rests on a solid or ladder cell.
    fn is_standable(&self, cell: Cell) -> bool {
        let here = self.voxel(cell);
        if !here.is_passable() {
            return false;
        }
        let below = self.voxel(cell.down());
        here == Voxel::Ladder || below.is_solid() || below == Voxel::Ladder
    }

    /// The move state for `cell`, or [`MoveState::INVALID`] when the cell is
    /// out of bounds or unloaded.
    fn state_at(&self, cell: Cell, riding_vehicle: bool) -> MoveState {
        if self.is_valid_cell(cell) {
            MoveState::new(cell, riding_vehicle)
        } else {
            MoveState::INVALID
        }
    }
}

// ── VoxelGrid ─────────────────────────────────────────────────────────────────

/// Dense voxel storage plus the list of bodies in the world.
///
/// Do not construct directly; use [`VoxelGridBuilder`].
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    bounds: Bounds,
    voxels: Vec<Voxel>,
    bodies: Vec<Body>,
}

impl VoxelGrid {
    /// Overwrite one cell.  Searches already running keep their own
    /// snapshot of bodies but read voxels live.
    pub fn set_voxel(&mut self, cell: Cell, voxel: Voxel) -> WorldResult<()> {
        let i = self
            .bounds
            .linear_index(cell)
            .ok_or(WorldError::OutOfBounds { cell, bounds: self.bounds })?;
        self.voxels[i] = voxel;
        Ok(())
    }

    /// Add a body.  Fails on duplicate ids or malformed boxes.
    pub fn add_body(&mut self, body: Body) -> WorldResult<()> {
        validate_body(&self.bodies, &body)?;
        self.bodies.push(body);
        Ok(())
    }

    /// Remove a body by id, returning it if present.
    pub fn remove_body(&mut self, id: vn_core::BodyId) -> Option<Body> {
        let pos = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(pos))
    }

    /// Number of cells of each voxel kind, in `[unloaded, empty, solid,
    /// ladder, rail]` order.
    pub fn census(&self) -> [usize; 5] {
        let mut counts = [0usize; 5];
        for v in &self.voxels {
            let slot = match v {
                Voxel::Unloaded => 0,
                Voxel::Empty    => 1,
                Voxel::Solid    => 2,
                Voxel::Ladder   => 3,
                Voxel::Rail     => 4,
            };
            counts[slot] += 1;
        }
        counts
    }
}

impl VoxelWorld for VoxelGrid {
    #[inline]
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    fn voxel(&self, cell: Cell) -> Voxel {
        match self.bounds.linear_index(cell) {
            Some(i) => self.voxels[i],
            None => Voxel::Unloaded,
        }
    }

    #[inline]
    fn bodies(&self) -> &[Body] {
        &self.bodies
    }
}

// ── VoxelGridBuilder ──────────────────────────────────────────────────────────

/// Upper limit on the number of cells a dense grid may hold.
pub const MAX_GRID_CELLS: usize = 1 << 30;

/// Construct a [`VoxelGrid`] incrementally, then call [`build`](Self::build).
///
/// Every cell starts as [`Voxel::Empty`].
///
/// # Example
///
/// ```
/// use vn_core::{Bounds, Cell};
/// use vn_world::{Voxel, VoxelGridBuilder, VoxelWorld};
///
/// let mut b = VoxelGridBuilder::new(Bounds::from_size(6, 3, 1)).unwrap();
/// b.fill(Cell::new(0, 0, 0), Cell::new(5, 0, 0), Voxel::Solid).unwrap(); // floor
/// let grid = b.build().unwrap();
/// assert!(grid.is_standable(Cell::new(2, 1, 0)));
/// ```
#[derive(Debug)]
pub struct VoxelGridBuilder {
    bounds: Bounds,
    voxels: Vec<Voxel>,
    bodies: Vec<Body>,
}

impl VoxelGridBuilder {
    /// Fails with [`WorldError::TooLarge`] when the box holds more than
    /// [`MAX_GRID_CELLS`] cells.
    pub fn new(bounds: Bounds) -> WorldResult<Self> {
        let volume = bounds
            .checked_volume()
            .filter(|&v| v <= MAX_GRID_CELLS)
            .ok_or(WorldError::TooLarge(bounds))?;
        Ok(Self {
            bounds,
            voxels: vec![Voxel::Empty; volume],
            bodies: Vec::new(),
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Set a single cell.
    pub fn set(&mut self, cell: Cell, voxel: Voxel) -> WorldResult<&mut Self> {
        let i = self
            .bounds
            .linear_index(cell)
            .ok_or(WorldError::OutOfBounds { cell, bounds: self.bounds })?;
        self.voxels[i] = voxel;
        Ok(self)
    }

    /// Set every cell in the box spanned by `a` and `b` (both inclusive, in
    /// any order).
    pub fn fill(&mut self, a: Cell, b: Cell, voxel: Voxel) -> WorldResult<&mut Self> {
        let lo = Cell::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let hi = Cell::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        for corner in [lo, hi] {
            if !self.bounds.contains(corner) {
                return Err(WorldError::OutOfBounds { cell: corner, bounds: self.bounds });
            }
        }
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                for x in lo.x..=hi.x {
                    self.set(Cell::new(x, y, z), voxel)?;
                }
            }
        }
        Ok(self)
    }

    /// Register a body.
    pub fn add_body(&mut self, body: Body) -> WorldResult<&mut Self> {
        validate_body(&self.bodies, &body)?;
        self.bodies.push(body);
        Ok(self)
    }

    /// Consume the builder and produce a [`VoxelGrid`].
    pub fn build(self) -> WorldResult<VoxelGrid> {
        if self.bounds.volume() == 0 {
            return Err(WorldError::EmptyBounds(self.bounds));
        }
        Ok(VoxelGrid {
            bounds: self.bounds,
            voxels: self.voxels,
            bodies: self.bodies,
        })
    }
}

fn validate_body(existing: &[Body], body: &Body) -> WorldResult<()> {
    if !body.is_well_formed() {
        return Err(WorldError::DegenerateBody(body.id));
    }
    if existing.iter().any(|b| b.id == body.id) {
        return Err(WorldError::DuplicateBody(body.id));
    }
    Ok(())
}
