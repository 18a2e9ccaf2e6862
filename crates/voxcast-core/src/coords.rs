//! Coordinate systems for the voxel world.
//!
//! The world is tiled into columns of `CHUNK_DIM` x `CHUNK_DIM` voxels in the
//! XZ plane. Chunks do not tile vertically, so a chunk-local voxel's Y is its
//! world voxel Y. Every voxel is one unit wide and deep and `ceiling_scale`
//! units tall.

use crate::constants::CHUNK_DIM;
use bytemuck::{Pod, Zeroable};
use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Chunk position in chunk coordinates (XZ plane).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk whose footprint contains a world point
    #[inline]
    pub fn containing(point: DVec3) -> Self {
        Self::new(
            (point.x.floor() as i32).div_euclid(CHUNK_DIM),
            (point.z.floor() as i32).div_euclid(CHUNK_DIM),
        )
    }

    /// Chunk offset by the given number of chunks
    #[inline]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// World point of the chunk's minimum corner (at Y = 0)
    #[inline]
    pub fn origin(self) -> DVec3 {
        DVec3::new(
            f64::from(self.x) * f64::from(CHUNK_DIM),
            0.0,
            f64::from(self.z) * f64::from(CHUNK_DIM),
        )
    }

    /// Chebyshev distance in chunks
    #[inline]
    pub fn distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// All chunks within `distance` of this one, including itself, z-major.
    pub fn neighborhood(self, distance: i32) -> impl Iterator<Item = ChunkPos> {
        (-distance..=distance)
            .flat_map(move |dz| (-distance..=distance).map(move |dx| self.offset(dx, dz)))
    }
}

/// Voxel position local to a chunk.
///
/// X and Z are in `0..CHUNK_DIM` for a voxel inside the chunk; Y is bounded
/// only by the chunk's height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    /// Create a new local voxel position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Whether X and Z fall inside a chunk's footprint
    #[inline]
    pub const fn is_in_chunk_footprint(self) -> bool {
        self.x >= 0 && self.x < CHUNK_DIM && self.z >= 0 && self.z < CHUNK_DIM
    }

    /// Convert to glam IVec3
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for VoxelPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A voxel addressed by its chunk and its chunk-local position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct VoxelCoord {
    pub chunk: ChunkPos,
    pub voxel: VoxelPos,
}

impl VoxelCoord {
    /// Create a new voxel coordinate
    #[inline]
    pub const fn new(chunk: ChunkPos, voxel: VoxelPos) -> Self {
        Self { chunk, voxel }
    }

    /// Split a world voxel into chunk and local position
    #[inline]
    pub const fn from_world_voxel(v: IVec3) -> Self {
        Self::new(
            ChunkPos::new(v.x.div_euclid(CHUNK_DIM), v.z.div_euclid(CHUNK_DIM)),
            VoxelPos::new(v.x.rem_euclid(CHUNK_DIM), v.y, v.z.rem_euclid(CHUNK_DIM)),
        )
    }

    /// Voxel containing a world point
    #[inline]
    pub fn from_point(point: DVec3, ceiling_scale: f64) -> Self {
        Self::from_world_voxel(point_to_voxel(point, ceiling_scale))
    }

    /// Recombine into a world voxel
    #[inline]
    pub const fn to_world_voxel(self) -> IVec3 {
        IVec3::new(
            self.chunk.x * CHUNK_DIM + self.voxel.x,
            self.voxel.y,
            self.chunk.z * CHUNK_DIM + self.voxel.z,
        )
    }

    /// Same voxel with its local X/Z wrapped back into the chunk footprint
    #[inline]
    pub const fn normalized(self) -> Self {
        Self::from_world_voxel(self.to_world_voxel())
    }
}

/// World voxel containing a world point.
#[inline]
pub fn point_to_voxel(point: DVec3, ceiling_scale: f64) -> IVec3 {
    IVec3::new(
        point.x.floor() as i32,
        (point.y / ceiling_scale).floor() as i32,
        point.z.floor() as i32,
    )
}

/// World point at the center of a voxel.
#[inline]
pub fn voxel_center(coord: VoxelCoord, ceiling_scale: f64) -> DVec3 {
    let v = coord.to_world_voxel();
    DVec3::new(
        f64::from(v.x) + 0.5,
        (f64::from(v.y) + 0.5) * ceiling_scale,
        f64::from(v.z) + 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_voxel_chunk_local_roundtrip() {
        let world = IVec3::new(100, -50, 200);
        let coord = VoxelCoord::from_world_voxel(world);
        assert_eq!(coord.chunk, ChunkPos::new(1, 3));
        assert_eq!(coord.voxel, VoxelPos::new(36, -50, 8));
        assert_eq!(coord.to_world_voxel(), world);
    }

    #[test]
    fn negative_world_voxel_chunk() {
        let coord = VoxelCoord::from_world_voxel(IVec3::new(-1, 0, -65));
        assert_eq!(coord.chunk, ChunkPos::new(-1, -2));
        assert_eq!(coord.voxel, VoxelPos::new(63, 0, 63));
    }

    #[test]
    fn chunk_seam_wraps_to_local_zero() {
        let before = VoxelCoord::from_point(DVec3::new(63.9, 0.5, 10.0), 1.0);
        let after = VoxelCoord::from_point(DVec3::new(64.0, 0.5, 10.0), 1.0);
        assert_eq!(before.chunk, ChunkPos::new(0, 0));
        assert_eq!(before.voxel.x, 63);
        assert_eq!(after.chunk, ChunkPos::new(1, 0));
        assert_eq!(after.voxel.x, 0);
    }

    #[test]
    fn point_to_voxel_applies_ceiling_scale() {
        let v = point_to_voxel(DVec3::new(0.5, 2.9, -0.5), 1.5);
        assert_eq!(v, IVec3::new(0, 1, -1));
        let v = point_to_voxel(DVec3::new(0.0, 3.0, 0.0), 1.5);
        assert_eq!(v.y, 2);
    }

    #[test]
    fn voxel_center_scales_height() {
        let coord = VoxelCoord::new(ChunkPos::new(1, 0), VoxelPos::new(2, 1, 3));
        let center = voxel_center(coord, 2.0);
        assert_eq!(center, DVec3::new(66.5, 3.0, 3.5));
    }

    #[test]
    fn normalized_moves_overflow_into_neighbor() {
        let coord = VoxelCoord::new(ChunkPos::new(0, 0), VoxelPos::new(CHUNK_DIM, 4, -1));
        let wrapped = coord.normalized();
        assert_eq!(wrapped.chunk, ChunkPos::new(1, -1));
        assert_eq!(wrapped.voxel, VoxelPos::new(0, 4, CHUNK_DIM - 1));
    }

    #[test]
    fn neighborhood_covers_three_by_three() {
        let center = ChunkPos::new(5, -2);
        let chunks: Vec<_> = center.neighborhood(1).collect();
        assert_eq!(chunks.len(), 9);
        assert!(chunks.contains(&center));
        assert!(chunks.iter().all(|c| c.distance(center) <= 1));
        assert_eq!(chunks[0], ChunkPos::new(4, -3));
    }

    #[test]
    fn chunk_containing_point() {
        assert_eq!(ChunkPos::containing(DVec3::new(-0.5, 9.0, 64.0)), ChunkPos::new(-1, 1));
        assert_eq!(ChunkPos::containing(DVec3::new(63.99, 0.0, 0.0)), ChunkPos::new(0, 0));
    }

    #[test]
    fn chunk_origin() {
        assert_eq!(ChunkPos::new(-1, 2).origin(), DVec3::new(-64.0, 0.0, 128.0));
    }
}
