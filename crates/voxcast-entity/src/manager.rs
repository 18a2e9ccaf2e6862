//! In-memory entity store.

use glam::{DVec2, DVec3};
use hashbrown::HashMap;
use hecs::World;
use voxcast_core::{ChunkPos, Error, Result};

use crate::billboard::{BillboardAnimation, ObservedBillboard};
use crate::store::{EntityBounds, EntityStore};
use crate::{EntityId, Transform};

/// Everything needed to spawn an entity.
#[derive(Debug, Clone)]
pub struct EntityDesc {
    pub position: DVec3,
    pub facing: DVec2,
    pub bounds: EntityBounds,
    pub animation: BillboardAnimation,
}

/// ECS world plus a per-chunk index of entity positions.
#[derive(Default)]
pub struct EntityManager {
    world: World,
    chunk_index: HashMap<ChunkPos, Vec<EntityId>>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn spawn(&mut self, desc: EntityDesc) -> EntityId {
        let transform = Transform {
            position: desc.position,
            facing: desc.facing.try_normalize().unwrap_or(DVec2::Y),
        };
        let id = self.world.spawn((transform, desc.bounds, desc.animation));
        self.chunk_index
            .entry(ChunkPos::containing(desc.position))
            .or_default()
            .push(id);
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        let position = self.transform(id)?.position;
        self.world
            .despawn(id)
            .map_err(|_| Error::NotFound(format!("entity {id:?}")))?;
        self.unindex(id, ChunkPos::containing(position));
        Ok(())
    }

    /// Move an entity, re-filing it under its new chunk when it crosses a seam.
    pub fn set_position(&mut self, id: EntityId, position: DVec3) -> Result<()> {
        let old_chunk = {
            let mut transform = self
                .world
                .get::<&mut Transform>(id)
                .map_err(|_| Error::NotFound(format!("entity {id:?}")))?;
            let old_chunk = ChunkPos::containing(transform.position);
            transform.position = position;
            old_chunk
        };

        let new_chunk = ChunkPos::containing(position);
        if old_chunk != new_chunk {
            tracing::trace!(?id, ?old_chunk, ?new_chunk, "entity changed chunk");
            self.unindex(id, old_chunk);
            self.chunk_index.entry(new_chunk).or_default().push(id);
        }
        Ok(())
    }

    fn transform(&self, id: EntityId) -> Result<Transform> {
        self.world
            .get::<&Transform>(id)
            .map(|t| *t)
            .map_err(|_| Error::NotFound(format!("entity {id:?}")))
    }

    fn unindex(&mut self, id: EntityId, chunk: ChunkPos) {
        if let Some(ids) = self.chunk_index.get_mut(&chunk) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.chunk_index.remove(&chunk);
            }
        }
    }
}

impl EntityStore for EntityManager {
    fn entities_in_chunk(&self, chunk: ChunkPos) -> Vec<EntityId> {
        self.chunk_index.get(&chunk).cloned().unwrap_or_default()
    }

    fn entity_position(&self, id: EntityId) -> Option<DVec3> {
        self.transform(id).ok().map(|t| t.position)
    }

    fn entity_bounds(&self, id: EntityId) -> Option<EntityBounds> {
        self.world.get::<&EntityBounds>(id).ok().map(|b| *b)
    }

    fn observed_billboard(&self, id: EntityId, viewer: DVec3) -> Option<ObservedBillboard> {
        let transform = self.transform(id).ok()?;
        let animation = self.world.get::<&BillboardAnimation>(id).ok()?;
        Some(animation.observe(transform.position, transform.facing, viewer))
    }
}
