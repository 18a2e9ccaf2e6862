//! Core types and math for voxcast.
//!
//! This crate provides the foundational types shared by the world, entity
//! and physics crates:
//! - Coordinate systems (chunk, chunk-local voxel, world voxel, world point)
//! - Voxel face orientation
//! - f64 ray and intersection math
//! - Common error type

pub mod coords;
pub mod error;
pub mod facing;
pub mod math;
pub mod types;

pub use coords::{point_to_voxel, voxel_center, ChunkPos, VoxelCoord, VoxelPos};
pub use error::{Error, Result};
pub use facing::VoxelFacing3D;
pub use types::ShapeDefId;

/// Engine-wide constants
pub mod constants {
    /// Width and depth of a chunk in voxels
    pub const CHUNK_DIM: i32 = 64;
    /// Voxels in one horizontal layer of a chunk (64^2)
    pub const CHUNK_AREA: usize = (CHUNK_DIM * CHUNK_DIM) as usize;
    /// Tolerance for near-parallel and degenerate geometry tests
    pub const EPSILON: f64 = 1e-9;
}
