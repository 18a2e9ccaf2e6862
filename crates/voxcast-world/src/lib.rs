//! Chunked voxel world storage for voxcast.
//!
//! A loaded chunk has two halves: a [`VoxelChunk`] with shape definitions per
//! voxel, and a [`CollisionChunk`] with per-voxel collider flags and collision
//! boxes derived from those definitions. Both live in a [`ChunkManager`], and
//! queries go through the [`VoxelChunkStore`] / [`CollisionChunkStore`] traits.

pub mod chunk;
pub mod chunk_manager;
pub mod collision_chunk;
pub mod generation;
pub mod shape;
pub mod store;

pub use chunk::{Chunk, VoxelChunk};
pub use chunk_manager::ChunkManager;
pub use collision_chunk::{CollisionChunk, CollisionShapeId};
pub use generation::{TerrainConfig, TerrainGenerator};
pub use shape::{OrientedBox, VoxelBoxShape, VoxelShapeDefinition, VoxelShapeScaleType};
pub use store::{CollisionChunkStore, VoxelChunkStore};

/// World seed for procedural generation.
pub type WorldSeed = u64;
