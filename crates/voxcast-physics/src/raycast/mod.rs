//! Ray casting through the voxel world and its entity billboards.
//!
//! A cast walks the grid voxel by voxel ([`TraversalState`]). Each visited
//! voxel is tested against its collision box and against every billboard
//! standing in it; the first voxel that yields a hit ends the walk.

mod hit;
mod tester;
mod traversal;

pub use hit::{RayCastHit, RayCastHitKind};
pub use tester::{test_entities_in_voxel, test_voxel, BillboardBasis};
pub use traversal::TraversalState;

use glam::DVec3;
use rayon::prelude::*;
use voxcast_core::{VoxelCoord, VoxelFacing3D};
use voxcast_entity::EntityStore;
use voxcast_world::{CollisionChunkStore, VoxelChunkStore};

use crate::chunk_entity_map::ChunkEntityMapCache;
use crate::config::RayCastConfig;

/// Casts rays against one world snapshot.
pub struct RayCaster<'a, V: ?Sized, C: ?Sized, E: ?Sized> {
    voxels: &'a V,
    collision: &'a C,
    entities: &'a E,
    config: RayCastConfig,
}

impl<'a, V, C, E> RayCaster<'a, V, C, E>
where
    V: VoxelChunkStore + ?Sized,
    C: CollisionChunkStore + ?Sized,
    E: EntityStore + ?Sized,
{
    pub const fn new(
        voxels: &'a V,
        collision: &'a C,
        entities: &'a E,
        config: RayCastConfig,
    ) -> Self {
        Self {
            voxels,
            collision,
            entities,
            config,
        }
    }

    #[inline]
    pub const fn config(&self) -> &RayCastConfig {
        &self.config
    }

    /// Nearest voxel or billboard hit along a ray.
    ///
    /// `camera_forward` orients the billboards. Zero or non-finite
    /// directions hit nothing, as does every ray under a config that fails
    /// [`RayCastConfig::is_valid`].
    pub fn cast(
        &self,
        origin: DVec3,
        direction: DVec3,
        camera_forward: DVec3,
    ) -> Option<RayCastHit> {
        let mut cache = ChunkEntityMapCache::new();
        self.cast_with_cache(origin, direction, camera_forward, &mut cache)
    }

    /// Like [`cast`](Self::cast), reusing entity maps from `cache`.
    ///
    /// Maps store the billboard frame seen from the ray origin, so a cache
    /// may only be shared between casts from the same origin.
    #[cfg_attr(
        feature = "profiling-tracy",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn cast_with_cache(
        &self,
        origin: DVec3,
        direction: DVec3,
        camera_forward: DVec3,
        cache: &mut ChunkEntityMapCache,
    ) -> Option<RayCastHit> {
        let _span = tracing::trace_span!("ray_cast").entered();

        if !self.config.is_valid() {
            tracing::debug!(
                ceiling_scale = self.config.ceiling_scale,
                "ray cast config is invalid"
            );
            return None;
        }
        let Some(direction) = direction.try_normalize() else {
            tracing::debug!(?direction, "ray direction is degenerate");
            return None;
        };
        let basis = if self.config.include_entities {
            BillboardBasis::from_camera_forward(camera_forward)
        } else {
            None
        };
        let ceiling_scale = self.config.ceiling_scale;

        let mut state = TraversalState::new(origin, direction, ceiling_scale);
        if !self.voxels.is_chunk_loaded(state.coord.chunk) {
            return None;
        }

        let ctx = CellTest {
            caster: self,
            origin,
            direction,
            basis: basis.as_ref(),
        };

        if let Some(hit) = ctx.test(state.coord, state.facing, cache) {
            tracing::trace!(t = hit.t, "ray hit starting voxel");
            return Some(hit);
        }

        state.step();
        let mut steps = 0;
        while let Some(height) = self.voxels.chunk_height(state.coord.chunk) {
            if !state.can_step_y(height) {
                break;
            }
            if steps >= self.config.max_steps {
                tracing::debug!(
                    max_steps = self.config.max_steps,
                    "ray cast hit the step limit"
                );
                break;
            }
            steps += 1;

            let (coord, facing) = (state.coord, state.facing);
            state.step();
            if let Some(hit) = ctx.test(coord, facing, cache) {
                tracing::trace!(t = hit.t, steps, "ray hit");
                return Some(hit);
            }
        }

        None
    }
}

impl<V, C, E> RayCaster<'_, V, C, E>
where
    V: VoxelChunkStore + Sync + ?Sized,
    C: CollisionChunkStore + Sync + ?Sized,
    E: EntityStore + Sync + ?Sized,
{
    /// Cast `(origin, direction)` pairs in parallel, one entity map cache
    /// per ray. Results come back in input order.
    pub fn cast_many(
        &self,
        rays: &[(DVec3, DVec3)],
        camera_forward: DVec3,
    ) -> Vec<Option<RayCastHit>> {
        let _span = tracing::debug_span!("cast_many", rays = rays.len()).entered();
        rays.par_iter()
            .map(|&(origin, direction)| self.cast(origin, direction, camera_forward))
            .collect()
    }
}

/// Per-cast inputs for testing one voxel.
struct CellTest<'c, 'a, V: ?Sized, C: ?Sized, E: ?Sized> {
    caster: &'c RayCaster<'a, V, C, E>,
    origin: DVec3,
    direction: DVec3,
    basis: Option<&'c BillboardBasis>,
}

impl<V, C, E> CellTest<'_, '_, V, C, E>
where
    V: VoxelChunkStore + ?Sized,
    C: CollisionChunkStore + ?Sized,
    E: EntityStore + ?Sized,
{
    /// Voxel box and billboards in one voxel. A billboard only wins when
    /// strictly nearer than the box.
    fn test(
        &self,
        coord: VoxelCoord,
        facing: VoxelFacing3D,
        cache: &mut ChunkEntityMapCache,
    ) -> Option<RayCastHit> {
        let caster = self.caster;
        let ceiling_scale = caster.config.ceiling_scale;
        let voxel_hit = test_voxel(
            self.origin,
            self.direction,
            coord,
            facing,
            ceiling_scale,
            caster.voxels,
            caster.collision,
        );

        let height = caster.voxels.chunk_height(coord.chunk);
        let entity_hit = self.basis.zip(height).and_then(|(basis, height)| {
            let map = cache.get_or_build(
                coord.chunk,
                height,
                self.origin,
                ceiling_scale,
                caster.entities,
            );
            test_entities_in_voxel(self.origin, self.direction, basis, coord.voxel, map)
        });

        RayCastHit::nearest(voxel_hit, entity_hit)
    }
}

/// One-shot cast without building a [`RayCaster`].
pub fn ray_cast<V, C, E>(
    origin: DVec3,
    direction: DVec3,
    camera_forward: DVec3,
    config: &RayCastConfig,
    voxels: &V,
    collision: &C,
    entities: &E,
) -> Option<RayCastHit>
where
    V: VoxelChunkStore + ?Sized,
    C: CollisionChunkStore + ?Sized,
    E: EntityStore + ?Sized,
{
    RayCaster::new(voxels, collision, entities, *config).cast(origin, direction, camera_forward)
}
