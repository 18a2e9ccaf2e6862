//! Entity query trait used by ray casting.

use glam::DVec3;
use voxcast_core::math::Aabb;
use voxcast_core::ChunkPos;

use crate::billboard::ObservedBillboard;
use crate::EntityId;

/// Bounding box dimensions of an entity standing at its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBounds {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl EntityBounds {
    #[inline]
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// True when any dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0 || self.depth <= 0.0
    }

    /// World box for an entity whose feet are at `position`.
    pub fn world_aabb(&self, position: DVec3) -> Aabb {
        let half_width = self.width * 0.5;
        let half_depth = self.depth * 0.5;
        Aabb::new(
            position - DVec3::new(half_width, 0.0, half_depth),
            position + DVec3::new(half_width, self.height, half_depth),
        )
    }
}

/// Entity lookups by chunk.
pub trait EntityStore {
    /// Entities whose position lies in the chunk's footprint.
    fn entities_in_chunk(&self, chunk: ChunkPos) -> Vec<EntityId>;

    /// World position of the entity's feet.
    fn entity_position(&self, id: EntityId) -> Option<DVec3>;

    /// Bounding box dimensions.
    fn entity_bounds(&self, id: EntityId) -> Option<EntityBounds>;

    /// Billboard the entity shows to a viewer at `viewer`.
    fn observed_billboard(&self, id: EntityId, viewer: DVec3) -> Option<ObservedBillboard>;
}
