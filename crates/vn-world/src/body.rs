//! Dynamic bodies: other movers and teleporter pads.

use vn_core::{BodyId, Cell};

/// Inset applied to the box of a body that fills one cell, so that touching
/// faces of adjacent cells never count as overlap.
const CELL_INSET: f32 = 0.1;

/// A body living in the world, described by its axis-aligned bounding box.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub id: BodyId,
    /// Lower corner of the bounding box, world units.
    pub min: [f32; 3],
    /// Upper corner of the bounding box, world units.
    pub max: [f32; 3],
    /// Moves around on its own (creatures, carts).
    pub dynamic: bool,
    /// Belongs to an active owner.  Unowned bodies (debris, corpses) never
    /// block movement.
    pub owned: bool,
    /// Teleporter pad: enables teleport edges to every other pad.
    pub teleporter: bool,
}

impl Body {
    /// A creature filling `cell`.
    pub fn mover(id: BodyId, cell: Cell) -> Self {
        let (min, max) = cell_box(cell);
        Self { id, min, max, dynamic: true, owned: true, teleporter: false }
    }

    /// A static teleporter pad standing in `cell`.
    pub fn teleporter(id: BodyId, cell: Cell) -> Self {
        let (min, max) = cell_box(cell);
        Self { id, min, max, dynamic: false, owned: true, teleporter: true }
    }

    /// Centre of the bounding box.
    #[inline]
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// The cell containing the body's centre.
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::containing(self.center())
    }

    /// `true` when every max corner is strictly above its min corner.
    pub fn is_well_formed(&self) -> bool {
        (0..3).all(|i| self.min[i].is_finite() && self.max[i].is_finite() && self.min[i] < self.max[i])
    }

    /// `true` if this body blocks other movers.
    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.dynamic && self.owned
    }
}

fn cell_box(cell: Cell) -> ([f32; 3], [f32; 3]) {
    let p = cell.to_point();
    (
        [p[0] + CELL_INSET, p[1], p[2] + CELL_INSET],
        [p[0] + 1.0 - CELL_INSET, p[1] + 1.0 - CELL_INSET, p[2] + 1.0 - CELL_INSET],
    )
}
