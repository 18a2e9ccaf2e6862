//! Voxel grid traversal (DDA).

use glam::{DVec3, IVec3};
use voxcast_core::{point_to_voxel, VoxelCoord, VoxelFacing3D};

/// Stepping state of a ray through the voxel grid.
///
/// Cells are one unit wide and deep and `ceiling_scale` tall. X and Z wrap
/// into neighboring chunks; Y never leaves the chunk column.
#[derive(Clone, Copy, Debug)]
pub struct TraversalState {
    origin: DVec3,
    direction: DVec3,
    ceiling_scale: f64,
    /// Per-axis step sign, true for +1.
    positive: [bool; 3],
    /// Ray distance to cross one whole cell on each axis.
    delta_dist: DVec3,
    /// Ray distance to the next grid line on each axis.
    side_dist: DVec3,
    /// Current voxel.
    pub coord: VoxelCoord,
    /// Face crossed by the last step. Before the first step, the face the
    /// ray leaves the starting voxel through.
    pub facing: VoxelFacing3D,
    /// Ray distance of that crossing.
    pub distance: f64,
}

impl TraversalState {
    /// Start at the voxel containing `origin`.
    pub fn new(origin: DVec3, direction: DVec3, ceiling_scale: f64) -> Self {
        let cell = DVec3::new(1.0, ceiling_scale, 1.0);
        let start = point_to_voxel(origin, ceiling_scale);
        let fraction = origin / cell - start.as_dvec3();
        let positive = [direction.x >= 0.0, direction.y >= 0.0, direction.z >= 0.0];

        let mut delta_dist = DVec3::splat(f64::INFINITY);
        let mut side_dist = DVec3::splat(f64::INFINITY);
        for axis in 0..3 {
            if direction[axis] == 0.0 {
                continue;
            }
            delta_dist[axis] = (cell[axis] / direction[axis]).abs();
            let remaining = if positive[axis] {
                1.0 - fraction[axis]
            } else {
                fraction[axis]
            };
            side_dist[axis] = delta_dist[axis] * remaining;
        }

        let axis = next_axis(side_dist);
        Self {
            origin,
            direction,
            ceiling_scale,
            positive,
            delta_dist,
            side_dist,
            coord: VoxelCoord::from_world_voxel(start),
            facing: entered_facing(axis, positive[axis]),
            distance: side_dist[axis],
        }
    }

    /// Advance to the next voxel along the ray.
    ///
    /// The axis with the nearest grid line wins. Ties go to the later axis
    /// of the chain X, Y, Z: X only when strictly nearest, then Y when
    /// strictly nearer than Z.
    pub fn step(&mut self) {
        let axis = next_axis(self.side_dist);
        let positive = self.positive[axis];
        self.side_dist[axis] += self.delta_dist[axis];

        let mut world = self.coord.to_world_voxel();
        world[axis] += if positive { 1 } else { -1 };
        self.coord = VoxelCoord::from_world_voxel(world);
        self.facing = entered_facing(axis, positive);
        self.distance = self.crossing_distance(world, axis);
    }

    /// Whether the current voxel's Y still lies on the ray's side of a
    /// chunk `height` voxels tall.
    #[inline]
    pub const fn can_step_y(&self, height: i32) -> bool {
        let y = self.coord.voxel.y;
        if self.positive[1] {
            y < height
        } else {
            y >= 0
        }
    }

    /// Ray distance to the near face of world voxel `world` on `axis`.
    fn crossing_distance(&self, world: IVec3, axis: usize) -> f64 {
        let cell = if axis == 1 { self.ceiling_scale } else { 1.0 };
        let near_side = if self.positive[axis] { 0.0 } else { 1.0 };
        let boundary = (f64::from(world[axis]) + near_side) * cell;
        (boundary - self.origin[axis]) / self.direction[axis]
    }
}

/// Axis of the nearest grid line, with the strict X/Y/Z comparison chain.
#[inline]
fn next_axis(side_dist: DVec3) -> usize {
    if side_dist.x < side_dist.y && side_dist.x < side_dist.z {
        0
    } else if side_dist.y < side_dist.z {
        1
    } else {
        2
    }
}

#[inline]
const fn entered_facing(axis: usize, positive: bool) -> VoxelFacing3D {
    match axis {
        0 => VoxelFacing3D::entered_on_x(positive),
        1 => VoxelFacing3D::entered_on_y(positive),
        _ => VoxelFacing3D::entered_on_z(positive),
    }
}
