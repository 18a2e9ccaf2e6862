//! Shared identifier types.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Index of a voxel shape definition inside a chunk's definition table.
///
/// ID 0 is reserved for air (no geometry, no collision).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct ShapeDefId(pub u16);

impl ShapeDefId {
    /// Air (empty space)
    pub const AIR: Self = Self(0);

    /// Returns true if this is the air definition
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Table index of this definition
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for ShapeDefId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}
