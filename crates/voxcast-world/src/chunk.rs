//! Voxel chunk storage.

use voxcast_core::constants::{CHUNK_AREA, CHUNK_DIM};
use voxcast_core::{ChunkPos, Error, Result, ShapeDefId, VoxelPos};

use crate::shape::VoxelShapeDefinition;

/// Common chunk geometry.
pub trait Chunk {
    /// Position in chunk coordinates.
    fn pos(&self) -> ChunkPos;

    /// Number of voxel layers in this chunk.
    fn height(&self) -> i32;

    /// Whether a local voxel lies inside this chunk.
    #[inline]
    fn is_valid_voxel(&self, voxel: VoxelPos) -> bool {
        voxel.is_in_chunk_footprint() && voxel.y >= 0 && voxel.y < self.height()
    }
}

/// Flat array index of an in-chunk voxel (x fastest, then z, then y).
#[inline]
pub(crate) fn voxel_index(voxel: VoxelPos) -> usize {
    voxel.x as usize + voxel.z as usize * CHUNK_DIM as usize + voxel.y as usize * CHUNK_AREA
}

/// Shape data of a `CHUNK_DIM` x height x `CHUNK_DIM` column of voxels.
#[derive(Debug, Clone)]
pub struct VoxelChunk {
    pos: ChunkPos,
    height: i32,
    /// Definition table; entry 0 is air.
    shape_defs: Vec<VoxelShapeDefinition>,
    /// Per-voxel index into `shape_defs`.
    shape_def_ids: Vec<ShapeDefId>,
}

impl VoxelChunk {
    /// Create an all-air chunk.
    pub fn new(pos: ChunkPos, height: i32) -> Self {
        let height = height.max(0);
        Self {
            pos,
            height,
            shape_defs: vec![VoxelShapeDefinition::AIR],
            shape_def_ids: vec![ShapeDefId::AIR; CHUNK_AREA * height as usize],
        }
    }

    /// Register a shape definition and return its ID.
    pub fn add_shape_def(&mut self, def: VoxelShapeDefinition) -> Result<ShapeDefId> {
        let id = u16::try_from(self.shape_defs.len()).map_err(|_| {
            Error::InvalidData(format!("chunk {:?} has too many shape definitions", self.pos))
        })?;
        self.shape_defs.push(def);
        Ok(ShapeDefId(id))
    }

    /// Number of registered shape definitions, air included.
    pub fn shape_def_count(&self) -> usize {
        self.shape_defs.len()
    }

    /// Look up a shape definition by ID.
    pub fn shape_def(&self, id: ShapeDefId) -> Option<&VoxelShapeDefinition> {
        self.shape_defs.get(id.index())
    }

    /// Shape definition ID of a voxel, or `None` outside the chunk.
    pub fn shape_def_id(&self, voxel: VoxelPos) -> Option<ShapeDefId> {
        self.is_valid_voxel(voxel)
            .then(|| self.shape_def_ids[voxel_index(voxel)])
    }

    /// Shape definition of a voxel, or `None` outside the chunk.
    pub fn shape_def_at(&self, voxel: VoxelPos) -> Option<&VoxelShapeDefinition> {
        self.shape_def_id(voxel).and_then(|id| self.shape_def(id))
    }

    /// Assign a shape definition to a voxel.
    pub fn set_shape_def_id(&mut self, voxel: VoxelPos, id: ShapeDefId) -> Result<()> {
        if !self.is_valid_voxel(voxel) {
            return Err(Error::OutOfBounds(format!(
                "voxel {voxel:?} outside chunk {:?} of height {}",
                self.pos, self.height
            )));
        }
        if id.index() >= self.shape_defs.len() {
            return Err(Error::NotFound(format!(
                "shape definition {} in chunk {:?}",
                id.0, self.pos
            )));
        }

        self.shape_def_ids[voxel_index(voxel)] = id;
        Ok(())
    }

    /// Fill whole layers `y_min..y_max` with one shape definition.
    pub fn fill_layers(&mut self, y_min: i32, y_max: i32, id: ShapeDefId) -> Result<()> {
        for y in y_min..y_max {
            for z in 0..CHUNK_DIM {
                for x in 0..CHUNK_DIM {
                    self.set_shape_def_id(VoxelPos::new(x, y, z), id)?;
                }
            }
        }
        Ok(())
    }

    /// Iterate all in-chunk voxel positions.
    pub fn voxels(&self) -> impl Iterator<Item = VoxelPos> {
        let height = self.height;
        (0..height).flat_map(|y| {
            (0..CHUNK_DIM).flat_map(move |z| (0..CHUNK_DIM).map(move |x| VoxelPos::new(x, y, z)))
        })
    }
}

impl Chunk for VoxelChunk {
    fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn height(&self) -> i32 {
        self.height
    }
}
