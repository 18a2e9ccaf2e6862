use glam::DVec3;
use voxcast_core::constants::EPSILON;
use voxcast_core::math::closest_points_on_segments;

use super::{precedes, Contact};
use crate::shape::{perpendicular, CapsuleShape};

/// Capsule against capsule.
pub fn capsule_capsule(a: &CapsuleShape, b: &CapsuleShape) -> Option<Contact> {
    let (a0, a1) = a.segment();
    let (b0, b1) = b.segment();
    let closest = closest_points_on_segments(a0, a1, b0, b1);

    let delta = closest.on_first - closest.on_second;
    let distance = delta.length();
    if distance > a.radius + b.radius + EPSILON {
        return None;
    }

    let normal = if distance > EPSILON {
        delta / distance
    } else {
        crossing_normal(a, b, a1 - a0, b1 - b0)
    };

    Some(Contact {
        point_on_a: closest.on_first - normal * a.radius,
        point_on_b: closest.on_second + normal * b.radius,
        normal,
    })
}

/// Normal for cores that touch. Each fallback negates when A and B swap.
fn crossing_normal(a: &CapsuleShape, b: &CapsuleShape, a_axis: DVec3, b_axis: DVec3) -> DVec3 {
    let across = a_axis.cross(b_axis);
    if across.length_squared() > EPSILON {
        return across.normalize();
    }

    // Parallel cores: separate along the line between their midpoints.
    let apart = a.translation - b.translation;
    if apart.length_squared() > EPSILON {
        return apart.normalize();
    }

    let side = perpendicular(a_axis);
    if precedes(key(a), key(b)) {
        side
    } else {
        -side
    }
}

fn key(capsule: &CapsuleShape) -> [f64; 9] {
    let t = capsule.translation;
    let r = capsule.rotation;
    [
        capsule.radius,
        capsule.length,
        t.x,
        t.y,
        t.z,
        r.x,
        r.y,
        r.z,
        r.w,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_vec_near;
    use approx::assert_relative_eq;
    use glam::{DQuat, DVec3};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn side_by_side_capsules() {
        let a = CapsuleShape::upright(DVec3::new(0.0, 1.0, 0.0), 0.5, 1.0);
        let b = CapsuleShape::upright(DVec3::new(0.8, 1.2, 0.0), 0.5, 1.0);
        let contact = capsule_capsule(&a, &b).unwrap();

        assert_vec_near(contact.normal, -DVec3::X);
        assert_relative_eq!(contact.point_on_a.x, 0.5);
        assert_relative_eq!(contact.point_on_b.x, 0.3);
        assert_relative_eq!(contact.depth(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn separated_capsules_miss() {
        let a = CapsuleShape::upright(DVec3::ZERO, 0.5, 1.0);
        let b = CapsuleShape::upright(DVec3::new(1.01, 0.0, 0.0), 0.5, 1.0);
        assert!(capsule_capsule(&a, &b).is_none());
    }

    #[test]
    fn touching_capsules_hit() {
        let a = CapsuleShape::upright(DVec3::ZERO, 0.5, 1.0);
        let b = CapsuleShape::upright(DVec3::new(0.0, 2.0, 0.0), 0.5, 1.0);
        let contact = capsule_capsule(&a, &b).unwrap();
        assert_vec_near(contact.normal, -DVec3::Y);
        assert_vec_near(contact.point_on_a, DVec3::new(0.0, 1.0, 0.0));
        assert_vec_near(contact.point_on_b, DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn crossing_cores_push_apart_across_both_axes() {
        let a = CapsuleShape::upright(DVec3::ZERO, 0.25, 2.0);
        let b = CapsuleShape::new(DVec3::ZERO, DQuat::from_rotation_z(FRAC_PI_2), 0.25, 2.0);
        let forward = capsule_capsule(&a, &b).unwrap();
        let reverse = capsule_capsule(&b, &a).unwrap();

        assert_relative_eq!(forward.normal.z.abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(forward.depth(), 0.5, epsilon = 1e-12);
        assert_vec_near(forward.normal, -reverse.normal);
        assert_vec_near(forward.point_on_a, reverse.point_on_b);
        assert_vec_near(forward.point_on_b, reverse.point_on_a);
    }

    #[test]
    fn collinear_cores_separate_along_the_axis() {
        let a = CapsuleShape::upright(DVec3::new(0.0, 0.5, 0.0), 0.2, 2.0);
        let b = CapsuleShape::upright(DVec3::ZERO, 0.3, 2.0);
        let forward = capsule_capsule(&a, &b).unwrap();
        let reverse = capsule_capsule(&b, &a).unwrap();

        assert_vec_near(forward.normal, DVec3::Y);
        assert_vec_near(reverse.normal, -DVec3::Y);
    }

    #[test]
    fn concentric_capsules_still_mirror() {
        let a = CapsuleShape::upright(DVec3::ZERO, 0.2, 1.0);
        let b = CapsuleShape::upright(DVec3::ZERO, 0.4, 1.0);
        let forward = capsule_capsule(&a, &b).unwrap();
        let reverse = capsule_capsule(&b, &a).unwrap();

        assert_relative_eq!(forward.normal.length(), 1.0, epsilon = 1e-12);
        assert_vec_near(forward.normal, -reverse.normal);
    }
}
