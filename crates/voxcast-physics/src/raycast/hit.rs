use glam::DVec3;
use voxcast_core::{VoxelCoord, VoxelFacing3D};
use voxcast_entity::EntityId;

/// What a ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayCastHitKind {
    Voxel {
        coord: VoxelCoord,
        /// Face the ray entered the voxel through.
        facing: VoxelFacing3D,
    },
    Entity {
        id: EntityId,
    },
}

/// Result of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCastHit {
    /// Distance along the ray.
    pub t: f64,
    /// World point of the hit.
    pub point: DVec3,
    pub kind: RayCastHitKind,
}

impl RayCastHit {
    /// Distance used for "nothing hit yet".
    pub const MAX_T: f64 = f64::INFINITY;

    #[inline]
    pub const fn voxel(t: f64, point: DVec3, coord: VoxelCoord, facing: VoxelFacing3D) -> Self {
        Self {
            t,
            point,
            kind: RayCastHitKind::Voxel { coord, facing },
        }
    }

    #[inline]
    pub const fn entity(t: f64, point: DVec3, id: EntityId) -> Self {
        Self {
            t,
            point,
            kind: RayCastHitKind::Entity { id },
        }
    }

    #[inline]
    pub const fn is_voxel(&self) -> bool {
        matches!(self.kind, RayCastHitKind::Voxel { .. })
    }

    #[inline]
    pub const fn is_entity(&self) -> bool {
        matches!(self.kind, RayCastHitKind::Entity { .. })
    }

    pub const fn voxel_coord(&self) -> Option<VoxelCoord> {
        match self.kind {
            RayCastHitKind::Voxel { coord, .. } => Some(coord),
            RayCastHitKind::Entity { .. } => None,
        }
    }

    pub const fn facing(&self) -> Option<VoxelFacing3D> {
        match self.kind {
            RayCastHitKind::Voxel { facing, .. } => Some(facing),
            RayCastHitKind::Entity { .. } => None,
        }
    }

    pub const fn entity_id(&self) -> Option<EntityId> {
        match self.kind {
            RayCastHitKind::Entity { id } => Some(id),
            RayCastHitKind::Voxel { .. } => None,
        }
    }

    /// Keep whichever hit is nearer; `other` wins only when strictly nearer.
    #[inline]
    pub(crate) fn nearest(current: Option<Self>, other: Option<Self>) -> Option<Self> {
        match (current, other) {
            (Some(current), Some(other)) if other.t < current.t => Some(other),
            (Some(current), _) => Some(current),
            (None, other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxcast_core::{ChunkPos, VoxelPos};

    fn voxel_hit(t: f64) -> RayCastHit {
        let coord = VoxelCoord::new(ChunkPos::new(0, 0), VoxelPos::new(1, 2, 3));
        RayCastHit::voxel(t, DVec3::ZERO, coord, VoxelFacing3D::PositiveY)
    }

    #[test]
    fn voxel_payload() {
        let hit = voxel_hit(2.0);
        assert!(hit.is_voxel());
        assert!(!hit.is_entity());
        assert_eq!(hit.voxel_coord().unwrap().voxel, VoxelPos::new(1, 2, 3));
        assert_eq!(hit.facing(), Some(VoxelFacing3D::PositiveY));
        assert!(hit.entity_id().is_none());
    }

    #[test]
    fn nearest_prefers_existing_on_tie() {
        let first = voxel_hit(2.0);
        let tie = RayCastHit { point: DVec3::ONE, ..voxel_hit(2.0) };
        assert_eq!(RayCastHit::nearest(Some(first), Some(tie)), Some(first));
        assert_eq!(
            RayCastHit::nearest(Some(first), Some(voxel_hit(1.0))),
            Some(voxel_hit(1.0))
        );
        assert_eq!(RayCastHit::nearest(None, Some(first)), Some(first));
        assert_eq!(RayCastHit::nearest(Some(first), None), Some(first));
        assert!(RayCastHit::MAX_T > 1e300);
    }
}
