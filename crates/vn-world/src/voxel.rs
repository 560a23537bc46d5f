//! Voxel kinds.

/// Content of one grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Voxel {
    /// Not streamed in.  Also what the grid reports for out-of-bounds cells.
    Unloaded,
    /// Open air.
    #[default]
    Empty,
    /// Impassable, but supports anything standing on top of it.
    Solid,
    /// Passable; can be climbed vertically and supports a standing agent.
    Ladder,
    /// Passable track cell that vehicles ride along.
    Rail,
}

impl Voxel {
    /// `true` if an agent may occupy this cell.
    #[inline]
    pub fn is_passable(self) -> bool {
        matches!(self, Voxel::Empty | Voxel::Ladder | Voxel::Rail)
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Voxel::Solid)
    }

    #[inline]
    pub fn is_loaded(self) -> bool {
        !matches!(self, Voxel::Unloaded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Voxel::Unloaded => "unloaded",
            Voxel::Empty    => "empty",
            Voxel::Solid    => "solid",
            Voxel::Ladder   => "ladder",
            Voxel::Rail     => "rail",
        }
    }
}
