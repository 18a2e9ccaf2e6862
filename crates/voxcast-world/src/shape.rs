//! Voxel shape definitions.
//!
//! The only collidable voxel shape is a box rotated about Y. It is centered in
//! the voxel's XZ cell and described in "unit voxel" height; the scale type
//! decides how those heights stretch with the world's ceiling scale.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use voxcast_core::math::ray_box_intersection;
use voxcast_core::VoxelCoord;

/// How a shape's vertical coordinates respond to the ceiling scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoxelShapeScaleType {
    /// Heights are multiplied by the ceiling scale.
    #[default]
    ScaledFromMin,
    /// Heights are absolute, measured up from the voxel's floor.
    UnscaledFromMin,
    /// Heights are absolute, measured down from the voxel's ceiling.
    UnscaledFromMax,
}

impl VoxelShapeScaleType {
    /// World height above the voxel floor for a unit-voxel height `y`.
    #[inline]
    pub fn scaled_y(self, y: f64, ceiling_scale: f64) -> f64 {
        match self {
            Self::ScaledFromMin => y * ceiling_scale,
            Self::UnscaledFromMin => y,
            Self::UnscaledFromMax => ceiling_scale - (1.0 - y),
        }
    }
}

/// Box collision shape of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelBoxShape {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Elevation of the box bottom above the voxel floor.
    pub y_offset: f64,
    /// Rotation about +Y in radians.
    pub yaw: f64,
}

impl VoxelBoxShape {
    /// Zero-sized shape used by air.
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0);

    /// Box filling the whole voxel.
    pub const FULL: Self = Self::new(1.0, 1.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(width: f64, height: f64, depth: f64, y_offset: f64, yaw: f64) -> Self {
        Self {
            width,
            height,
            depth,
            y_offset,
            yaw,
        }
    }

    /// World-space box for this shape placed in `coord`.
    pub fn world_box(
        &self,
        coord: VoxelCoord,
        scale_type: VoxelShapeScaleType,
        ceiling_scale: f64,
    ) -> OrientedBox {
        let voxel = coord.to_world_voxel();
        let floor_y = f64::from(voxel.y) * ceiling_scale;
        let min_y = floor_y + scale_type.scaled_y(self.y_offset, ceiling_scale);
        let max_y = floor_y + scale_type.scaled_y(self.y_offset + self.height, ceiling_scale);

        OrientedBox {
            center: DVec3::new(
                f64::from(voxel.x) + 0.5,
                (min_y + max_y) * 0.5,
                f64::from(voxel.z) + 0.5,
            ),
            size: DVec3::new(self.width, max_y - min_y, self.depth),
            yaw: self.yaw,
        }
    }
}

/// A world-space box rotated about its vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    /// Geometric center
    pub center: DVec3,
    /// Width, height, depth
    pub size: DVec3,
    /// Rotation about +Y in radians
    pub yaw: f64,
}

impl OrientedBox {
    /// Nearest non-negative ray hit distance.
    #[inline]
    pub fn intersect_ray(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        ray_box_intersection(origin, direction, self.center, self.size, self.yaw)
    }
}

/// A voxel shape entry in a chunk's definition table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelShapeDefinition {
    pub shape: VoxelBoxShape,
    pub scale_type: VoxelShapeScaleType,
    /// Whether voxels with this shape get an enabled collider.
    pub allows_collision: bool,
}

impl VoxelShapeDefinition {
    /// Empty space.
    pub const AIR: Self = Self {
        shape: VoxelBoxShape::EMPTY,
        scale_type: VoxelShapeScaleType::ScaledFromMin,
        allows_collision: false,
    };

    /// Collidable box scaled with the ceiling.
    #[inline]
    pub const fn solid(shape: VoxelBoxShape) -> Self {
        Self {
            shape,
            scale_type: VoxelShapeScaleType::ScaledFromMin,
            allows_collision: true,
        }
    }

    #[inline]
    pub const fn with_scale_type(mut self, scale_type: VoxelShapeScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }
}

impl Default for VoxelShapeDefinition {
    fn default() -> Self {
        Self::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxcast_core::{ChunkPos, VoxelPos};

    #[test]
    fn scale_types() {
        assert_relative_eq!(VoxelShapeScaleType::ScaledFromMin.scaled_y(0.5, 2.0), 1.0);
        assert_relative_eq!(VoxelShapeScaleType::UnscaledFromMin.scaled_y(0.5, 2.0), 0.5);
        assert_relative_eq!(VoxelShapeScaleType::UnscaledFromMax.scaled_y(0.8, 2.0), 1.8);
    }

    #[test]
    fn full_box_fills_tall_voxel() {
        let coord = VoxelCoord::new(ChunkPos::new(1, 0), VoxelPos::new(2, 1, 3));
        let b = VoxelBoxShape::FULL.world_box(coord, VoxelShapeScaleType::ScaledFromMin, 2.0);
        assert_eq!(b.center, DVec3::new(66.5, 3.0, 3.5));
        assert_eq!(b.size, DVec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn raised_platform_hugs_ceiling() {
        let platform = VoxelBoxShape::new(1.0, 0.2, 1.0, 0.8, 0.0);
        let coord = VoxelCoord::new(ChunkPos::new(0, 0), VoxelPos::new(0, 0, 0));
        let b = platform.world_box(coord, VoxelShapeScaleType::UnscaledFromMax, 2.0);
        assert_relative_eq!(b.center.y, 1.9);
        assert_relative_eq!(b.size.y, 0.2);
    }

    #[test]
    fn oriented_box_ray() {
        let coord = VoxelCoord::new(ChunkPos::new(0, 0), VoxelPos::new(0, 0, 0));
        let b = VoxelBoxShape::FULL.world_box(coord, VoxelShapeScaleType::ScaledFromMin, 1.0);
        let t = b.intersect_ray(DVec3::new(0.5, 5.0, 0.5), DVec3::NEG_Y);
        assert_relative_eq!(t.unwrap(), 4.0);
    }
}
