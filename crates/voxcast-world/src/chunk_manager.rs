//! Concurrent chunk storage keyed by position.

use hashbrown::HashMap;
use parking_lot::RwLock;
use voxcast_core::ChunkPos;

use crate::chunk::Chunk;

/// Loaded chunks of one kind (voxel or collision).
///
/// Readers share the lock, so any number of ray casts can query the same
/// manager while nothing is being loaded.
pub struct ChunkManager<C> {
    chunks: RwLock<HashMap<ChunkPos, C>>,
}

impl<C: Chunk> ChunkManager<C> {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.read().contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Load `chunk` at its own position, handing back whatever was there.
    pub fn insert(&self, chunk: C) -> Option<C> {
        let pos = chunk.pos();
        tracing::debug!(x = pos.x, z = pos.z, height = chunk.height(), "chunk loaded");
        self.chunks.write().insert(pos, chunk)
    }

    /// Unload the chunk at `pos`.
    pub fn remove(&self, pos: ChunkPos) -> Option<C> {
        let removed = self.chunks.write().remove(&pos);
        if removed.is_some() {
            tracing::debug!(x = pos.x, z = pos.z, "chunk unloaded");
        }
        removed
    }

    /// Positions of every loaded chunk, in no particular order.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.read().keys().copied().collect()
    }

    /// Run `f` on the chunk at `pos` under the read lock.
    pub fn with_chunk<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&C) -> R,
    {
        self.chunks.read().get(&pos).map(f)
    }

    /// Run `f` on the chunk at `pos` under the write lock.
    pub fn with_chunk_mut<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&mut C) -> R,
    {
        self.chunks.write().get_mut(&pos).map(f)
    }

    /// Loaded positions at most `radius` chunks from `center` on both axes.
    pub fn chunks_in_radius(&self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        self.chunks
            .read()
            .keys()
            .filter(|pos| pos.distance(center) <= radius)
            .copied()
            .collect()
    }
}

impl<C: Chunk> Default for ChunkManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
