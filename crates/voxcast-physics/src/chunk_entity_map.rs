//! Per-chunk index of which voxels each entity overlaps.
//!
//! Entities are filed by the chunk their feet stand in, but a wide entity
//! near a seam also covers voxels of the neighboring chunk. Building a map
//! therefore scans the 3x3 block of chunks around the target and keeps only
//! the voxels that fall inside the target.

use glam::{DVec3, IVec3};
use hashbrown::HashMap;
use voxcast_core::constants::CHUNK_DIM;
use voxcast_core::{point_to_voxel, ChunkPos, VoxelCoord, VoxelPos};
use voxcast_entity::{EntityId, EntityStore, ObservedBillboard};

/// One entity touching a voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkEntityEntry {
    pub id: EntityId,
    /// World position of the entity's feet.
    pub position: DVec3,
    /// Billboard shown to the viewer the map was built for.
    pub billboard: ObservedBillboard,
}

/// Voxel to entity lookup for a single chunk.
#[derive(Clone, Debug)]
pub struct ChunkEntityMap {
    chunk: ChunkPos,
    entries: HashMap<VoxelPos, Vec<ChunkEntityEntry>>,
}

impl ChunkEntityMap {
    /// Index every entity whose bounding box reaches into `chunk`, which is
    /// `height` voxels tall.
    ///
    /// `viewer` decides which billboard frame each entity shows.
    #[cfg_attr(
        feature = "profiling-tracy",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn build<E>(
        chunk: ChunkPos,
        height: i32,
        viewer: DVec3,
        ceiling_scale: f64,
        entities: &E,
    ) -> Self
    where
        E: EntityStore + ?Sized,
    {
        let _span = tracing::trace_span!("chunk_entity_map", x = chunk.x, z = chunk.z).entered();

        let chunk_min = IVec3::new(chunk.x * CHUNK_DIM, 0, chunk.z * CHUNK_DIM);
        let chunk_max = chunk_min + IVec3::new(CHUNK_DIM - 1, height - 1, CHUNK_DIM - 1);
        let mut entries: HashMap<VoxelPos, Vec<ChunkEntityEntry>> = HashMap::new();

        for neighbor in chunk.neighborhood(1) {
            for id in entities.entities_in_chunk(neighbor) {
                let (Some(position), Some(bounds), Some(billboard)) = (
                    entities.entity_position(id),
                    entities.entity_bounds(id),
                    entities.observed_billboard(id, viewer),
                ) else {
                    continue;
                };
                if bounds.is_empty() {
                    continue;
                }

                let aabb = bounds.world_aabb(position);
                let min = point_to_voxel(aabb.min, ceiling_scale);
                let max = point_to_voxel(aabb.max, ceiling_scale);
                let min = min.max(chunk_min);
                let max = max.min(chunk_max);

                let entry = ChunkEntityEntry {
                    id,
                    position,
                    billboard,
                };
                for y in min.y..=max.y {
                    for z in min.z..=max.z {
                        for x in min.x..=max.x {
                            let coord = VoxelCoord::from_world_voxel(IVec3::new(x, y, z));
                            debug_assert_eq!(coord.chunk, chunk);
                            entries.entry(coord.voxel).or_default().push(entry);
                        }
                    }
                }
            }
        }

        tracing::trace!(voxels = entries.len(), "chunk entity map built");
        Self { chunk, entries }
    }

    #[inline]
    pub const fn chunk(&self) -> ChunkPos {
        self.chunk
    }

    /// Entities touching a voxel.
    pub fn entries(&self, voxel: VoxelPos) -> &[ChunkEntityEntry] {
        self.entries.get(&voxel).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of voxels with at least one entity.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps built during one ray cast.
///
/// A cast touches few chunks, so a linear scan beats hashing here.
#[derive(Clone, Debug, Default)]
pub struct ChunkEntityMapCache {
    maps: Vec<ChunkEntityMap>,
}

impl ChunkEntityMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The map for `chunk`, building it on first use.
    pub fn get_or_build<E>(
        &mut self,
        chunk: ChunkPos,
        height: i32,
        viewer: DVec3,
        ceiling_scale: f64,
        entities: &E,
    ) -> &ChunkEntityMap
    where
        E: EntityStore + ?Sized,
    {
        let index = match self.maps.iter().position(|map| map.chunk == chunk) {
            Some(index) => index,
            None => {
                self.maps.push(ChunkEntityMap::build(
                    chunk,
                    height,
                    viewer,
                    ceiling_scale,
                    entities,
                ));
                self.maps.len() - 1
            }
        };
        &self.maps[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }
}
