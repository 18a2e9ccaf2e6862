//! Per-voxel collider state derived from a voxel chunk.

use hashbrown::HashMap;
use voxcast_core::constants::CHUNK_AREA;
use voxcast_core::{ChunkPos, Error, Result, ShapeDefId, VoxelPos};

use crate::chunk::{voxel_index, Chunk, VoxelChunk};
use crate::shape::VoxelBoxShape;

/// Index into a collision chunk's box table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionShapeId(pub u16);

impl CollisionShapeId {
    /// Air's collision shape, always present.
    pub const AIR: Self = Self(0);
}

/// Collider flags and collision boxes for one chunk.
#[derive(Debug, Clone)]
pub struct CollisionChunk {
    pos: ChunkPos,
    height: i32,
    box_defs: Vec<VoxelBoxShape>,
    box_def_ids: Vec<CollisionShapeId>,
    enabled: Vec<bool>,
    /// Voxel shape definition -> collision box, filled lazily.
    mappings: HashMap<ShapeDefId, CollisionShapeId>,
}

impl CollisionChunk {
    /// Create a chunk with every collider off.
    pub fn new(pos: ChunkPos, height: i32) -> Self {
        let height = height.max(0);
        let count = CHUNK_AREA * height as usize;
        let mut mappings = HashMap::new();
        mappings.insert(ShapeDefId::AIR, CollisionShapeId::AIR);

        Self {
            pos,
            height,
            box_defs: vec![VoxelBoxShape::EMPTY],
            box_def_ids: vec![CollisionShapeId::AIR; count],
            enabled: vec![false; count],
            mappings,
        }
    }

    /// Build colliders for every voxel of a voxel chunk.
    pub fn from_voxel_chunk(voxel_chunk: &VoxelChunk) -> Result<Self> {
        let mut chunk = Self::new(voxel_chunk.pos(), voxel_chunk.height());
        for voxel in voxel_chunk.voxels() {
            chunk.update_voxel(voxel_chunk, voxel)?;
        }
        Ok(chunk)
    }

    /// Number of distinct collision boxes, air included.
    pub fn box_def_count(&self) -> usize {
        self.box_defs.len()
    }

    fn get_or_add_mapping(
        &mut self,
        voxel_chunk: &VoxelChunk,
        shape_def_id: ShapeDefId,
    ) -> Result<CollisionShapeId> {
        if let Some(&id) = self.mappings.get(&shape_def_id) {
            return Ok(id);
        }

        let def = voxel_chunk.shape_def(shape_def_id).ok_or_else(|| {
            Error::NotFound(format!(
                "shape definition {} in chunk {:?}",
                shape_def_id.0, self.pos
            ))
        })?;
        let id = u16::try_from(self.box_defs.len())
            .map(CollisionShapeId)
            .map_err(|_| {
                Error::InvalidData(format!("chunk {:?} has too many collision boxes", self.pos))
            })?;
        self.box_defs.push(def.shape);
        self.mappings.insert(shape_def_id, id);
        Ok(id)
    }

    /// Refresh one voxel's collider from the voxel chunk.
    pub fn update_voxel(&mut self, voxel_chunk: &VoxelChunk, voxel: VoxelPos) -> Result<()> {
        if voxel_chunk.pos() != self.pos {
            return Err(Error::InvalidData(format!(
                "voxel chunk {:?} does not match collision chunk {:?}",
                voxel_chunk.pos(),
                self.pos
            )));
        }
        let shape_def_id = voxel_chunk.shape_def_id(voxel).ok_or_else(|| {
            Error::OutOfBounds(format!("voxel {voxel:?} outside chunk {:?}", self.pos))
        })?;
        if !self.is_valid_voxel(voxel) {
            return Err(Error::OutOfBounds(format!(
                "voxel {voxel:?} outside collision chunk {:?}",
                self.pos
            )));
        }

        let allows_collision = voxel_chunk
            .shape_def(shape_def_id)
            .is_some_and(|def| def.allows_collision);
        let box_id = self.get_or_add_mapping(voxel_chunk, shape_def_id)?;

        let index = voxel_index(voxel);
        self.box_def_ids[index] = box_id;
        self.enabled[index] = allows_collision;
        Ok(())
    }

    /// Turn a voxel's collider on or off without changing its shape.
    pub fn set_collider_enabled(&mut self, voxel: VoxelPos, enabled: bool) -> Result<()> {
        if !self.is_valid_voxel(voxel) {
            return Err(Error::OutOfBounds(format!(
                "voxel {voxel:?} outside collision chunk {:?}",
                self.pos
            )));
        }
        self.enabled[voxel_index(voxel)] = enabled;
        Ok(())
    }

    /// Whether the voxel's collider is on. False outside the chunk.
    pub fn is_collider_enabled(&self, voxel: VoxelPos) -> bool {
        self.is_valid_voxel(voxel) && self.enabled[voxel_index(voxel)]
    }

    /// Collision box of an enabled voxel.
    pub fn collision_box(&self, voxel: VoxelPos) -> Option<VoxelBoxShape> {
        if !self.is_collider_enabled(voxel) {
            return None;
        }
        let id = self.box_def_ids[voxel_index(voxel)];
        self.box_defs.get(id.0 as usize).copied()
    }
}

impl Chunk for CollisionChunk {
    fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn height(&self) -> i32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::VoxelShapeDefinition;

    fn voxel_chunk_with_pillar() -> (VoxelChunk, ShapeDefId) {
        let mut chunk = VoxelChunk::new(ChunkPos::new(2, -1), 4);
        let pillar = chunk
            .add_shape_def(VoxelShapeDefinition::solid(VoxelBoxShape::new(
                0.5, 1.0, 0.5, 0.0, 0.0,
            )))
            .unwrap();
        chunk.set_shape_def_id(VoxelPos::new(3, 0, 3), pillar).unwrap();
        chunk.set_shape_def_id(VoxelPos::new(3, 1, 3), pillar).unwrap();
        (chunk, pillar)
    }

    #[test]
    fn built_from_voxel_chunk() {
        let (voxels, _) = voxel_chunk_with_pillar();
        let collision = CollisionChunk::from_voxel_chunk(&voxels).unwrap();

        assert!(collision.is_collider_enabled(VoxelPos::new(3, 0, 3)));
        assert!(collision.is_collider_enabled(VoxelPos::new(3, 1, 3)));
        assert!(!collision.is_collider_enabled(VoxelPos::new(3, 2, 3)));
        assert_eq!(
            collision.collision_box(VoxelPos::new(3, 1, 3)).unwrap().width,
            0.5
        );
        // Air plus one shared pillar box.
        assert_eq!(collision.box_def_count(), 2);
    }

    #[test]
    fn disabled_collider_has_no_box() {
        let (voxels, _) = voxel_chunk_with_pillar();
        let mut collision = CollisionChunk::from_voxel_chunk(&voxels).unwrap();
        collision
            .set_collider_enabled(VoxelPos::new(3, 0, 3), false)
            .unwrap();
        assert!(collision.collision_box(VoxelPos::new(3, 0, 3)).is_none());
    }

    #[test]
    fn non_colliding_shape_stays_disabled() {
        let (mut voxels, _) = voxel_chunk_with_pillar();
        let decoration = voxels
            .add_shape_def(VoxelShapeDefinition {
                allows_collision: false,
                ..VoxelShapeDefinition::solid(VoxelBoxShape::FULL)
            })
            .unwrap();
        voxels.set_shape_def_id(VoxelPos::new(0, 0, 0), decoration).unwrap();

        let mut collision = CollisionChunk::new(voxels.pos(), voxels.height());
        collision.update_voxel(&voxels, VoxelPos::new(0, 0, 0)).unwrap();
        assert!(!collision.is_collider_enabled(VoxelPos::new(0, 0, 0)));
    }

    #[test]
    fn mismatched_chunk_is_rejected() {
        let (voxels, _) = voxel_chunk_with_pillar();
        let mut collision = CollisionChunk::new(ChunkPos::new(0, 0), 4);
        let err = collision.update_voxel(&voxels, VoxelPos::new(0, 0, 0));
        assert!(matches!(err, Err(Error::InvalidData(_))));
    }
}
