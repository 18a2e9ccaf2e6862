//! Single-voxel ray tests.

use glam::DVec3;
use voxcast_core::math::ray_plane_intersection;
use voxcast_core::{VoxelCoord, VoxelFacing3D, VoxelPos};
use voxcast_world::{CollisionChunkStore, VoxelChunkStore};

use super::RayCastHit;
use crate::chunk_entity_map::ChunkEntityMap;

/// Orientation shared by every billboard during one cast.
///
/// Billboards only turn about Y, so they all face back along the camera's
/// horizontal forward direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillboardBasis {
    /// Billboard plane normal, pointing toward the camera.
    pub forward: DVec3,
    pub right: DVec3,
    pub up: DVec3,
}

impl BillboardBasis {
    /// Basis for a camera looking along `camera_forward`.
    ///
    /// `None` when the camera looks straight up or down, since the
    /// horizontal facing is then undefined.
    pub fn from_camera_forward(camera_forward: DVec3) -> Option<Self> {
        let forward = DVec3::new(-camera_forward.x, 0.0, -camera_forward.z).try_normalize()?;
        let up = DVec3::Y;
        let right = forward.cross(up).try_normalize()?;
        Some(Self { forward, right, up })
    }
}

/// Ray against the collision box of one voxel.
///
/// Unloaded chunks, voxels outside the chunk and disabled colliders never
/// hit. `facing` is reported as-is; the box test cannot tell which face
/// the traversal entered through.
pub fn test_voxel<V, C>(
    origin: DVec3,
    direction: DVec3,
    coord: VoxelCoord,
    facing: VoxelFacing3D,
    ceiling_scale: f64,
    voxels: &V,
    collision: &C,
) -> Option<RayCastHit>
where
    V: VoxelChunkStore + ?Sized,
    C: CollisionChunkStore + ?Sized,
{
    if !voxels.is_valid_voxel(coord.chunk, coord.voxel) {
        return None;
    }
    if !collision.is_collider_enabled(coord.chunk, coord.voxel) {
        return None;
    }

    let shape = collision.collision_box(coord.chunk, coord.voxel)?;
    let scale_type = voxels
        .shape_scale_type(coord.chunk, coord.voxel)
        .unwrap_or_default();
    let t = shape
        .world_box(coord, scale_type, ceiling_scale)
        .intersect_ray(origin, direction)?;

    Some(RayCastHit::voxel(t, origin + direction * t, coord, facing))
}

/// Ray against every billboard standing in one voxel of `map`'s chunk.
///
/// Returns the nearest billboard hit, if any.
pub fn test_entities_in_voxel(
    origin: DVec3,
    direction: DVec3,
    basis: &BillboardBasis,
    voxel: VoxelPos,
    map: &ChunkEntityMap,
) -> Option<RayCastHit> {
    let mut nearest: Option<RayCastHit> = None;

    for entry in map.entries(voxel) {
        let Some(point) = ray_plane_intersection(origin, direction, entry.position, basis.forward)
        else {
            continue;
        };

        // Anchor is the bottom center of the billboard.
        let offset = point - entry.position;
        let u = 0.5 - offset.dot(basis.right) / entry.billboard.width;
        let v = 1.0 - offset.dot(basis.up) / entry.billboard.height;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            continue;
        }

        let hit = RayCastHit::entity(origin.distance(point), point, entry.id);
        nearest = RayCastHit::nearest(nearest, Some(hit));
    }

    nearest
}
