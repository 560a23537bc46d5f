//! Integer voxel coordinates and the map bounding box.
//!
//! `y` is the vertical axis; `x` and `z` span the horizontal plane.  All
//! planner distances are measured between cell origins, so a cell behaves
//! like a lattice point for heuristic and cost purposes.

use std::fmt;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A voxel coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Horizontal unit steps, in the order the walker enumerates them.
pub const HORIZONTAL_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Horizontal diagonal steps.
pub const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Cell {
    /// Sentinel for "no cell".  Never inside any [`Bounds`].
    pub const INVALID: Cell = Cell { x: i32::MIN, y: i32::MIN, z: i32::MIN };

    pub const ORIGIN: Cell = Cell { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// The cell displaced by `(dx, dy, dz)`.  Saturates instead of wrapping
    /// so that offsets from the sentinel stay far outside any map.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Cell {
        Cell {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }

    #[inline]
    pub fn up(self) -> Cell {
        self.offset(0, 1, 0)
    }

    #[inline]
    pub fn down(self) -> Cell {
        self.offset(0, -1, 0)
    }

    /// The cell containing the world-space point `p`.
    #[inline]
    pub fn containing(p: [f32; 3]) -> Cell {
        Cell::new(p[0].floor() as i32, p[1].floor() as i32, p[2].floor() as i32)
    }

    /// Cell origin as a float point.
    #[inline]
    pub fn to_point(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    /// Squared Euclidean distance between cell origins.
    #[inline]
    pub fn distance_sq(self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        let dz = (self.z - other.z) as f32;
        dx * dx + dy * dy + dz * dz
    }

    /// Squared Euclidean distance from the cell origin to `p`.
    #[inline]
    pub fn distance_sq_to_point(self, p: [f32; 3]) -> f32 {
        let dx = self.x as f32 - p[0];
        let dy = self.y as f32 - p[1];
        let dz = self.z as f32 - p[2];
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance(self, other: Cell) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Largest per-axis offset (L∞ distance).
    #[inline]
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// The six face-adjacent cells.
    pub fn neighbors6(self) -> [Cell; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }

    /// The 26-neighbourhood (faces, edges and corners), excluding `self`.
    pub fn neighbors26(self) -> impl Iterator<Item = Cell> {
        self.neighborhood27().filter(move |&c| c != self)
    }

    /// The 3×3×3 block centred on `self`, including `self`.  Iteration order
    /// is fixed (x, then y, then z ascending) so callers stay deterministic.
    pub fn neighborhood27(self) -> impl Iterator<Item = Cell> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| self.offset(dx, dy, dz)))
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        } else {
            f.write_str("(invalid)")
        }
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Half-open box of cells: `min` inclusive, `max` exclusive on every axis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Bounds starting at the origin with the given extent.
    #[inline]
    pub const fn from_size(sx: i32, sy: i32, sz: i32) -> Self {
        Self { min: Cell::ORIGIN, max: Cell::new(sx, sy, sz) }
    }

    #[inline]
    pub fn size(&self) -> (usize, usize, usize) {
        (
            (self.max.x - self.min.x).max(0) as usize,
            (self.max.y - self.min.y).max(0) as usize,
            (self.max.z - self.min.z).max(0) as usize,
        )
    }

    /// Number of cells in the box.  Saturates at `usize::MAX`.
    #[inline]
    pub fn volume(&self) -> usize {
        self.checked_volume().unwrap_or(usize::MAX)
    }

    /// Number of cells in the box, or `None` if it overflows `usize`.
    #[inline]
    pub fn checked_volume(&self) -> Option<usize> {
        let (sx, sy, sz) = self.size();
        sx.checked_mul(sy)?.checked_mul(sz)
    }

    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        c.x >= self.min.x
            && c.x < self.max.x
            && c.y >= self.min.y
            && c.y < self.max.y
            && c.z >= self.min.z
            && c.z < self.max.z
    }

    /// Row-major index of `c` (x fastest, then z, then y), or `None` when
    /// `c` lies outside.
    #[inline]
    pub fn linear_index(&self, c: Cell) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        let (sx, _, sz) = self.size();
        let x = (c.x - self.min.x) as usize;
        let y = (c.y - self.min.y) as usize;
        let z = (c.z - self.min.z) as usize;
        Some((y * sz + z) * sx + x)
    }

    /// Distance (in cells) from `c` to the nearest vertical boundary plane of
    /// the map, i.e. how far an agent must walk horizontally to leave it.
    /// The last cell on an axis has distance 0.
    pub fn distance_to_horizontal_edge(&self, c: Cell) -> f32 {
        let dx = (c.x - self.min.x).min(self.max.x - 1 - c.x);
        let dz = (c.z - self.min.z).min(self.max.z - 1 - c.z);
        dx.min(dz).max(0) as f32
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {})", self.min, self.max)
    }
}
