//! Voxel face orientation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One of the six axis-aligned faces of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoxelFacing3D {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl VoxelFacing3D {
    /// Outward unit normal of the face
    #[inline]
    pub const fn normal(self) -> DVec3 {
        match self {
            Self::PositiveX => DVec3::X,
            Self::NegativeX => DVec3::NEG_X,
            Self::PositiveY => DVec3::Y,
            Self::NegativeY => DVec3::NEG_Y,
            Self::PositiveZ => DVec3::Z,
            Self::NegativeZ => DVec3::NEG_Z,
        }
    }

    /// Face on the opposite side of the voxel
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::PositiveX => Self::NegativeX,
            Self::NegativeX => Self::PositiveX,
            Self::PositiveY => Self::NegativeY,
            Self::NegativeY => Self::PositiveY,
            Self::PositiveZ => Self::NegativeZ,
            Self::NegativeZ => Self::PositiveZ,
        }
    }

    /// Face a ray enters through when it steps along X.
    ///
    /// Stepping toward +X crosses into the next voxel's -X face.
    #[inline]
    pub const fn entered_on_x(positive_step: bool) -> Self {
        if positive_step {
            Self::NegativeX
        } else {
            Self::PositiveX
        }
    }

    /// Face a ray enters through when it steps along Y
    #[inline]
    pub const fn entered_on_y(positive_step: bool) -> Self {
        if positive_step {
            Self::NegativeY
        } else {
            Self::PositiveY
        }
    }

    /// Face a ray enters through when it steps along Z
    #[inline]
    pub const fn entered_on_z(positive_step: bool) -> Self {
        if positive_step {
            Self::NegativeZ
        } else {
            Self::PositiveZ
        }
    }
}
