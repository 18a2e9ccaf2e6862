use std::cmp::Ordering;

use glam::DVec3;
use voxcast_core::constants::EPSILON;
use voxcast_core::math::Aabb;

use super::{precedes, Contact};
use crate::shape::{BoxShape, CapsuleShape};

/// Box against box by separating axes.
///
/// Both boxes only rotate about Y, so the candidate axes are Y plus each
/// box's horizontal axes; every edge cross product is parallel to one of
/// them.
pub fn box_box(a: &BoxShape, b: &BoxShape) -> Option<Contact> {
    let [ax, _, az] = a.axes();
    let [bx, _, bz] = b.axes();
    let offset = a.center() - b.center();

    let mut best: Option<(f64, DVec3)> = None;
    for axis in [DVec3::Y, ax, az, bx, bz] {
        let penetration =
            a.projected_radius(axis) + b.projected_radius(axis) - offset.dot(axis).abs();
        if penetration < -EPSILON {
            return None;
        }
        let better = best.map_or(true, |(depth, best_axis)| {
            match penetration.total_cmp(&depth) {
                Ordering::Less => true,
                Ordering::Equal => precedes(unsigned(axis), unsigned(best_axis)),
                Ordering::Greater => false,
            }
        });
        if better {
            best = Some((penetration, axis));
        }
    }

    let (_, axis) = best?;
    let along = offset.dot(axis);
    let normal = if along > 0.0 || (along == 0.0 && precedes(key(a), key(b))) {
        axis
    } else {
        -axis
    };

    // Pick a point inside the overlap, then slide it onto each box's face
    // along the normal.
    let midpoint = (a.center() + b.center()) * 0.5;
    let inside = (a.clamp_point(midpoint) + b.clamp_point(midpoint)) * 0.5;
    let a_face = a.center().dot(normal) - a.projected_radius(normal);
    let b_face = b.center().dot(normal) + b.projected_radius(normal);

    Some(Contact {
        point_on_a: inside + normal * (a_face - inside.dot(normal)),
        point_on_b: inside + normal * (b_face - inside.dot(normal)),
        normal,
    })
}

/// Axis with its sign dropped, so `v` and `-v` name the same candidate.
fn unsigned(axis: DVec3) -> [f64; 3] {
    let flip = axis.x < 0.0 || (axis.x == 0.0 && axis.z < 0.0);
    let axis = if flip { -axis } else { axis };
    [axis.x, axis.y, axis.z]
}

fn key(shape: &BoxShape) -> [f64; 7] {
    let t = shape.translation;
    [shape.width, shape.height, shape.depth, shape.yaw, t.x, t.y, t.z]
}

/// Box against capsule.
pub fn box_capsule(a: &BoxShape, b: &CapsuleShape) -> Option<Contact> {
    let (start, end) = b.segment();
    let start = a.to_local(start);
    let end = a.to_local(end);
    let bounds = a.local_bounds();

    let core = nearest_segment_point(&bounds, start, end);
    let surface = bounds.clamp_point(core);
    let distance = core.distance(surface);
    if distance > b.radius + EPSILON {
        return None;
    }

    let (point_on_a, normal, point_on_b) = if distance > EPSILON {
        let normal = (surface - core) / distance;
        (surface, normal, core + normal * b.radius)
    } else {
        // The core reaches into the box: leave through the shallowest face.
        let face = shallowest_face(&bounds, core);
        let point_on_a = project_onto_face(&bounds, core, face);
        (point_on_a, -face, core - face * b.radius)
    };

    Some(Contact {
        point_on_a: a.to_world(point_on_a),
        point_on_b: a.to_world(point_on_b),
        normal: a.direction_to_world(normal),
    })
}

/// Point of `start..end` closest to the box, in the box frame.
///
/// A segment passing through the box yields the middle of the part inside.
fn nearest_segment_point(bounds: &Aabb, start: DVec3, end: DVec3) -> DVec3 {
    let direction = end - start;
    if let Some((t_near, t_far)) = bounds.intersect_ray(start, direction) {
        if t_near <= 1.0 {
            let t = (t_near.max(0.0) + t_far.min(1.0)) * 0.5;
            return start + direction * t;
        }
    }

    // Squared distance to the box is quadratic in t between the points where
    // the segment crosses a slab boundary.
    let mut breaks = [0.0; 8];
    breaks[1] = 1.0;
    let mut count = 2;
    for axis in 0..3 {
        if direction[axis] == 0.0 {
            continue;
        }
        for bound in [bounds.min[axis], bounds.max[axis]] {
            let t = (bound - start[axis]) / direction[axis];
            if t > 0.0 && t < 1.0 {
                breaks[count] = t;
                count += 1;
            }
        }
    }
    let breaks = &mut breaks[..count];
    breaks.sort_unstable_by(f64::total_cmp);

    let distance_at = |t: f64| {
        let p = start + direction * t;
        p.distance_squared(bounds.clamp_point(p))
    };
    let mut best = (distance_at(0.0), 0.0);
    for piece in breaks.windows(2) {
        let (t0, t1) = (piece[0], piece[1]);
        let t = piece_minimum(bounds, start, direction, t0, t1);
        let distance = distance_at(t);
        if distance < best.0 {
            best = (distance, t);
        }
    }
    start + direction * best.1
}

/// Minimum of the squared box distance over `t0..t1`, where every axis stays
/// on one side of its slab.
fn piece_minimum(bounds: &Aabb, start: DVec3, direction: DVec3, t0: f64, t1: f64) -> f64 {
    let middle = start + direction * ((t0 + t1) * 0.5);
    let (mut linear, mut quadratic) = (0.0, 0.0);
    for axis in 0..3 {
        let target = if middle[axis] < bounds.min[axis] {
            bounds.min[axis]
        } else if middle[axis] > bounds.max[axis] {
            bounds.max[axis]
        } else {
            continue;
        };
        let offset = start[axis] - target;
        linear += offset * direction[axis];
        quadratic += direction[axis] * direction[axis];
    }
    if quadratic <= 0.0 {
        return t0;
    }
    (-linear / quadratic).clamp(t0, t1)
}

/// Outward face normal of the face nearest an interior point.
fn shallowest_face(bounds: &Aabb, point: DVec3) -> DVec3 {
    let faces = [
        (bounds.max.x - point.x, DVec3::X),
        (point.x - bounds.min.x, -DVec3::X),
        (bounds.max.y - point.y, DVec3::Y),
        (point.y - bounds.min.y, -DVec3::Y),
        (bounds.max.z - point.z, DVec3::Z),
        (point.z - bounds.min.z, -DVec3::Z),
    ];
    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0 < best.0 {
            best = *face;
        }
    }
    best.1
}

fn project_onto_face(bounds: &Aabb, point: DVec3, face: DVec3) -> DVec3 {
    let mut projected = point;
    for axis in 0..3 {
        if face[axis] > 0.0 {
            projected[axis] = bounds.max[axis];
        } else if face[axis] < 0.0 {
            projected[axis] = bounds.min[axis];
        }
    }
    projected
}
