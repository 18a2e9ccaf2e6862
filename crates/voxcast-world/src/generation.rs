//! Heightmap terrain for probe and test worlds.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use voxcast_core::constants::CHUNK_DIM;
use voxcast_core::{ChunkPos, Result, VoxelPos};

use crate::chunk::VoxelChunk;
use crate::collision_chunk::CollisionChunk;
use crate::shape::{VoxelBoxShape, VoxelShapeDefinition};
use crate::WorldSeed;

/// Heightmap parameters, in voxel units.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Noise seed.
    pub seed: WorldSeed,
    /// Voxel layers per chunk.
    pub chunk_height: i32,
    /// Lowest surface layer.
    pub base_height: i32,
    /// Voxels per noise unit horizontally.
    pub terrain_scale: f64,
    /// Height swing added on top of `base_height`.
    pub terrain_height: f64,
    /// Fbm octaves.
    pub octaves: usize,
    pub lacunarity: f64,
    pub persistence: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_height: 16,
            base_height: 1,
            terrain_scale: 32.0,
            terrain_height: 6.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Fills chunk columns up to a fractal Perlin height.
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        let height_noise = Fbm::<Perlin>::new(config.seed as u32)
            .set_octaves(config.octaves)
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.persistence);

        Self {
            config,
            height_noise,
        }
    }

    /// Default parameters with a custom seed.
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(TerrainConfig {
            seed,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Number of solid layers in the column at world XZ.
    ///
    /// Always at least one and below the chunk height.
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let nx = f64::from(world_x) / self.config.terrain_scale;
        let nz = f64::from(world_z) / self.config.terrain_scale;

        // [-1, 1] onto [0, terrain_height].
        let noise_value = self.height_noise.get([nx, nz]);
        let height = ((noise_value + 1.0) * 0.5 * self.config.terrain_height) as i32
            + self.config.base_height;
        height.clamp(1, (self.config.chunk_height - 1).max(1))
    }

    /// Voxel chunk at `pos` with every column filled to its height.
    pub fn generate_chunk(&self, pos: ChunkPos) -> Result<VoxelChunk> {
        let mut chunk = VoxelChunk::new(pos, self.config.chunk_height);
        let solid = chunk.add_shape_def(VoxelShapeDefinition::solid(VoxelBoxShape::FULL))?;

        for z in 0..CHUNK_DIM {
            for x in 0..CHUNK_DIM {
                let surface = self.height_at(pos.x * CHUNK_DIM + x, pos.z * CHUNK_DIM + z);
                for y in 0..surface {
                    chunk.set_shape_def_id(VoxelPos::new(x, y, z), solid)?;
                }
            }
        }

        Ok(chunk)
    }

    /// Voxel and collision halves for many chunks, built on the rayon pool.
    pub fn generate_chunks_parallel(
        &self,
        positions: &[ChunkPos],
    ) -> Result<Vec<(VoxelChunk, CollisionChunk)>> {
        positions
            .par_iter()
            .map(|&pos| {
                let voxels = self.generate_chunk(pos)?;
                let collision = CollisionChunk::from_voxel_chunk(&voxels)?;
                Ok((voxels, collision))
            })
            .collect()
    }
}
