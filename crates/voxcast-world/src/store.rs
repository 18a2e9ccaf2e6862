//! Read-only query traits the spatial queries run against.
//!
//! Lookups are cheap, non-blocking, in-memory reads. An unloaded chunk shows
//! up as `None`/`false` so callers never proceed on a missing chunk.

use voxcast_core::{ChunkPos, VoxelPos};

use crate::chunk::{Chunk, VoxelChunk};
use crate::chunk_manager::ChunkManager;
use crate::collision_chunk::CollisionChunk;
use crate::shape::{VoxelBoxShape, VoxelShapeScaleType};

/// Voxel shape data by chunk.
pub trait VoxelChunkStore {
    /// Height of a loaded chunk, `None` when it is not loaded.
    fn chunk_height(&self, chunk: ChunkPos) -> Option<i32>;

    /// Scale type of the voxel's shape definition.
    fn shape_scale_type(&self, chunk: ChunkPos, voxel: VoxelPos) -> Option<VoxelShapeScaleType>;

    /// Whether the chunk is loaded.
    #[inline]
    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        self.chunk_height(chunk).is_some()
    }

    /// Whether the local voxel lies inside a loaded chunk.
    #[inline]
    fn is_valid_voxel(&self, chunk: ChunkPos, voxel: VoxelPos) -> bool {
        self.chunk_height(chunk).is_some_and(|height| {
            voxel.is_in_chunk_footprint() && voxel.y >= 0 && voxel.y < height
        })
    }
}

/// Collider state by chunk.
pub trait CollisionChunkStore {
    /// Whether the voxel's collider is on. False for unloaded chunks.
    fn is_collider_enabled(&self, chunk: ChunkPos, voxel: VoxelPos) -> bool;

    /// Collision box of a voxel whose collider is on.
    fn collision_box(&self, chunk: ChunkPos, voxel: VoxelPos) -> Option<VoxelBoxShape>;
}

impl VoxelChunkStore for ChunkManager<VoxelChunk> {
    fn chunk_height(&self, chunk: ChunkPos) -> Option<i32> {
        self.with_chunk(chunk, Chunk::height)
    }

    fn shape_scale_type(&self, chunk: ChunkPos, voxel: VoxelPos) -> Option<VoxelShapeScaleType> {
        self.with_chunk(chunk, |c| c.shape_def_at(voxel).map(|def| def.scale_type))
            .flatten()
    }
}

impl CollisionChunkStore for ChunkManager<CollisionChunk> {
    fn is_collider_enabled(&self, chunk: ChunkPos, voxel: VoxelPos) -> bool {
        self.with_chunk(chunk, |c| c.is_collider_enabled(voxel))
            .unwrap_or(false)
    }

    fn collision_box(&self, chunk: ChunkPos, voxel: VoxelPos) -> Option<VoxelBoxShape> {
        self.with_chunk(chunk, |c| c.collision_box(voxel)).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::VoxelShapeDefinition;

    fn stores() -> (ChunkManager<VoxelChunk>, ChunkManager<CollisionChunk>) {
        let mut chunk = VoxelChunk::new(ChunkPos::new(0, 0), 2);
        let raised = chunk
            .add_shape_def(
                VoxelShapeDefinition::solid(VoxelBoxShape::FULL)
                    .with_scale_type(VoxelShapeScaleType::UnscaledFromMax),
            )
            .unwrap();
        chunk.set_shape_def_id(VoxelPos::new(4, 1, 4), raised).unwrap();
        let collision = CollisionChunk::from_voxel_chunk(&chunk).unwrap();

        let voxels = ChunkManager::new();
        voxels.insert(chunk);
        let colliders = ChunkManager::new();
        colliders.insert(collision);
        (voxels, colliders)
    }

    #[test]
    fn voxel_store_queries() {
        let (voxels, _) = stores();
        let origin = ChunkPos::new(0, 0);
        assert_eq!(voxels.chunk_height(origin), Some(2));
        assert!(voxels.is_chunk_loaded(origin));
        assert!(!voxels.is_chunk_loaded(ChunkPos::new(1, 0)));
        assert!(voxels.is_valid_voxel(origin, VoxelPos::new(4, 1, 4)));
        assert!(!voxels.is_valid_voxel(origin, VoxelPos::new(4, 2, 4)));
        assert!(!voxels.is_valid_voxel(ChunkPos::new(1, 0), VoxelPos::new(0, 0, 0)));
        assert_eq!(
            voxels.shape_scale_type(origin, VoxelPos::new(4, 1, 4)),
            Some(VoxelShapeScaleType::UnscaledFromMax)
        );
    }

    #[test]
    fn collision_store_queries() {
        let (_, colliders) = stores();
        let origin = ChunkPos::new(0, 0);
        assert!(colliders.is_collider_enabled(origin, VoxelPos::new(4, 1, 4)));
        assert!(!colliders.is_collider_enabled(origin, VoxelPos::new(4, 0, 4)));
        assert!(!colliders.is_collider_enabled(ChunkPos::new(5, 5), VoxelPos::new(4, 1, 4)));
        assert_eq!(
            colliders.collision_box(origin, VoxelPos::new(4, 1, 4)),
            Some(VoxelBoxShape::FULL)
        );
    }
}
