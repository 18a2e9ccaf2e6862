use std::cmp::Ordering;

use glam::{DVec2, DVec3};
use voxcast_core::constants::EPSILON;

use super::{precedes, Contact};
use crate::shape::{BoxShape, CylinderShape};

/// Overlap of two vertical ranges.
#[derive(Clone, Copy, Debug)]
struct VerticalOverlap {
    depth: f64,
    /// B sits on top of A rather than under it.
    b_above: bool,
    /// Middle of the shared range.
    mid: f64,
}

impl VerticalOverlap {
    /// `b_above_on_tie` settles ranges sharing a midpoint.
    fn new(
        (a_min, a_max): (f64, f64),
        (b_min, b_max): (f64, f64),
        b_above_on_tie: bool,
    ) -> Option<Self> {
        if a_max < b_min - EPSILON || b_max < a_min - EPSILON {
            return None;
        }
        let down = a_max - b_min;
        let up = b_max - a_min;
        Some(Self {
            depth: down.min(up),
            b_above: match down.total_cmp(&up) {
                Ordering::Less => true,
                Ordering::Equal => b_above_on_tie,
                Ordering::Greater => false,
            },
            mid: (a_min.max(b_min) + a_max.min(b_max)) * 0.5,
        })
    }

    /// Heights of the touching faces of A and B, and the normal from B to A.
    fn faces(&self, (a_min, a_max): (f64, f64), (b_min, b_max): (f64, f64)) -> (f64, f64, DVec3) {
        if self.b_above {
            (a_max, b_min, -DVec3::Y)
        } else {
            (a_min, b_max, DVec3::Y)
        }
    }
}

#[inline]
fn xz(v: DVec2, y: f64) -> DVec3 {
    DVec3::new(v.x, y, v.y)
}

/// Box against upright cylinder.
///
/// Resolves along whichever of the vertical and horizontal overlaps is
/// smaller, preferring vertical on a tie.
pub fn box_cylinder(a: &BoxShape, b: &CylinderShape) -> Option<Contact> {
    let a_range = a.y_range();
    let b_range = b.y_range();
    let vertical = VerticalOverlap::new(a_range, b_range, true)?;

    let local = a.to_local(b.center);
    let center = DVec2::new(local.x, local.z);
    let half = DVec2::new(a.width, a.depth) * 0.5;
    let clamped = center.clamp(-half, half);
    let offset = center - clamped;
    let distance = offset.length();

    // `direction` points from the box toward the cylinder's axis.
    let (horizontal_depth, direction, surface) = if distance > EPSILON {
        if distance > b.radius + EPSILON {
            return None;
        }
        (b.radius - distance, offset / distance, clamped)
    } else {
        let edges = [
            (half.x - center.x, DVec2::X),
            (half.x + center.x, -DVec2::X),
            (half.y - center.y, DVec2::Y),
            (half.y + center.y, -DVec2::Y),
        ];
        let mut nearest = edges[0];
        for edge in &edges[1..] {
            if edge.0 < nearest.0 {
                nearest = *edge;
            }
        }
        let (edge_distance, direction) = nearest;
        let surface = center + direction * edge_distance;
        (edge_distance + b.radius, direction, surface)
    };

    if vertical.depth <= horizontal_depth {
        let (a_y, b_y, normal) = vertical.faces(a_range, b_range);
        return Some(Contact {
            point_on_a: a.local_xz_to_world(clamped, a_y),
            point_on_b: a.local_xz_to_world(clamped, b_y),
            normal,
        });
    }

    let y = vertical.mid;
    Some(Contact {
        point_on_a: a.local_xz_to_world(surface, y),
        point_on_b: a.local_xz_to_world(center - direction * b.radius, y),
        normal: -a.direction_to_world(xz(direction, 0.0)),
    })
}

/// Upright cylinder against upright cylinder.
pub fn cylinder_cylinder(a: &CylinderShape, b: &CylinderShape) -> Option<Contact> {
    let a_range = a.y_range();
    let b_range = b.y_range();
    let vertical = VerticalOverlap::new(a_range, b_range, precedes(key(a), key(b)))?;

    let a_center = a.center_xz();
    let b_center = b.center_xz();
    let delta = b_center - a_center;
    let distance = delta.length();
    let radii = a.radius + b.radius;
    if distance > radii + EPSILON {
        return None;
    }

    // Coaxial cylinders have no horizontal direction of their own.
    if distance <= EPSILON || vertical.depth <= radii - distance {
        let (a_y, b_y, normal) = vertical.faces(a_range, b_range);
        let middle = (a_center + b_center) * 0.5;
        return Some(Contact {
            point_on_a: xz(middle, a_y),
            point_on_b: xz(middle, b_y),
            normal,
        });
    }

    let direction = delta / distance;
    let y = vertical.mid;
    Some(Contact {
        point_on_a: xz(a_center + direction * a.radius, y),
        point_on_b: xz(b_center - direction * b.radius, y),
        normal: -xz(direction, 0.0),
    })
}

fn key(cylinder: &CylinderShape) -> [f64; 5] {
    let c = cylinder.center;
    [cylinder.radius, cylinder.height, c.x, c.y, c.z]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_vec_near;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn step_box(y: f64) -> BoxShape {
        BoxShape::new(DVec3::new(0.5, y, 0.5), 1.0, 0.78, 1.0)
    }

    fn post(x: f64, y: f64, z: f64) -> CylinderShape {
        CylinderShape::new(DVec3::new(x, y, z), 0.1, 0.5)
    }

    #[test]
    fn cylinder_resting_on_box() {
        let contact = box_cylinder(&step_box(-0.78), &post(0.5, 0.0, 0.5)).unwrap();
        assert_vec_near(contact.normal, -DVec3::Y);
        assert_vec_near(contact.point_on_a, DVec3::new(0.5, 0.0, 0.5));
        assert_vec_near(contact.point_on_b, DVec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn cylinder_sunk_into_box_top() {
        let contact = box_cylinder(&step_box(-0.78), &post(0.5, -0.01, 0.5)).unwrap();
        assert_vec_near(contact.normal, -DVec3::Y);
        assert_relative_eq!(contact.point_on_a.y, 0.0);
        assert_relative_eq!(contact.point_on_b.y, -0.01);
    }

    #[test]
    fn cylinder_hovering_over_box() {
        assert!(box_cylinder(&step_box(-0.78), &post(0.5, 0.01, 0.5)).is_none());
        assert!(box_cylinder(&step_box(-0.78), &post(0.5, -2.0, 0.5)).is_none());
    }

    #[test]
    fn cylinder_under_box() {
        let contact = box_cylinder(&step_box(-0.78), &post(0.5, -1.0, 0.5)).unwrap();
        assert_vec_near(contact.normal, DVec3::Y);
        assert_vec_near(contact.point_on_a, DVec3::new(0.5, -0.78, 0.5));
        assert_vec_near(contact.point_on_b, DVec3::new(0.5, -0.5, 0.5));

        let touching = box_cylinder(&step_box(-0.78), &post(0.5, -1.28, 0.5)).unwrap();
        assert_vec_near(touching.normal, DVec3::Y);
        assert_relative_eq!(touching.point_on_a.y, -0.78);
        assert_relative_eq!(touching.point_on_b.y, -0.78, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_against_box_side() {
        let contact = box_cylinder(&step_box(0.0), &post(1.05, 0.0, 0.5)).unwrap();
        assert_vec_near(contact.normal, -DVec3::X);
        assert_vec_near(contact.point_on_a, DVec3::new(1.0, 0.25, 0.5));
        assert_vec_near(contact.point_on_b, DVec3::new(0.95, 0.25, 0.5));

        assert!(box_cylinder(&step_box(0.0), &post(1.1, 0.0, 0.5)).is_some());
        assert!(box_cylinder(&step_box(0.0), &post(1.11, 0.0, 0.5)).is_none());
    }

    #[test]
    fn cylinder_at_box_corner() {
        let contact = box_cylinder(&step_box(0.0), &post(1.05, 0.0, 1.05)).unwrap();
        let diagonal = DVec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2);

        assert_vec_near(contact.normal, -diagonal);
        assert_vec_near(contact.point_on_a, DVec3::new(1.0, 0.25, 1.0));
        assert_vec_near(
            contact.point_on_b,
            DVec3::new(1.05, 0.25, 1.05) - diagonal * 0.1,
        );
    }

    #[test]
    fn cylinder_axis_inside_box() {
        let contact = box_cylinder(&step_box(0.0), &post(0.9, 0.1, 0.5)).unwrap();
        assert_vec_near(contact.normal, -DVec3::X);
        assert_vec_near(contact.point_on_a, DVec3::new(1.0, 0.35, 0.5));
        assert_vec_near(contact.point_on_b, DVec3::new(0.8, 0.35, 0.5));
    }

    #[test]
    fn cylinders_side_by_side() {
        let contact = cylinder_cylinder(&post(0.0, 0.0, 0.0), &post(0.15, 0.0, 0.0)).unwrap();
        assert_vec_near(contact.normal, -DVec3::X);
        assert_vec_near(contact.point_on_a, DVec3::new(0.1, 0.25, 0.0));
        assert_vec_near(contact.point_on_b, DVec3::new(0.05, 0.25, 0.0));
    }

    #[test]
    fn cylinder_on_top_of_cylinder() {
        let contact = cylinder_cylinder(&post(0.0, 0.0, 0.0), &post(0.15, 0.49, 0.0)).unwrap();
        assert_vec_near(contact.normal, -DVec3::Y);
        assert_vec_near(contact.point_on_a, DVec3::new(0.075, 0.5, 0.0));
        assert_vec_near(contact.point_on_b, DVec3::new(0.075, 0.49, 0.0));
    }

    #[test]
    fn cylinder_below_cylinder() {
        let contact = cylinder_cylinder(&post(0.0, 0.0, 0.0), &post(0.15, -0.49, 0.0)).unwrap();
        assert_vec_near(contact.normal, DVec3::Y);
        assert_relative_eq!(contact.point_on_a.y, 0.0);
        assert_relative_eq!(contact.point_on_b.y, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn distant_cylinders_miss() {
        assert!(cylinder_cylinder(&post(0.0, 0.0, 0.0), &post(0.21, 0.0, 0.0)).is_none());
        assert!(cylinder_cylinder(&post(0.0, 0.0, 0.0), &post(0.0, 0.51, 0.0)).is_none());
    }

    #[test]
    fn coaxial_cylinders_resolve_vertically() {
        let wide = CylinderShape::new(DVec3::ZERO, 0.5, 1.0);
        let tall = CylinderShape::new(DVec3::new(0.0, -0.5, 0.0), 0.3, 2.0);
        let forward = cylinder_cylinder(&wide, &tall).unwrap();
        let reverse = cylinder_cylinder(&tall, &wide).unwrap();

        assert_vec_near(forward.normal, DVec3::Y);
        assert_relative_eq!(forward.depth(), 1.5, epsilon = 1e-12);
        assert_vec_near(reverse.normal, -DVec3::Y);
        assert_vec_near(forward.point_on_a, reverse.point_on_b);
        assert_vec_near(forward.point_on_b, reverse.point_on_a);
    }

    #[test]
    fn level_discs_mirror_on_tied_heights() {
        let a = CylinderShape::new(DVec3::ZERO, 1.0, 0.1);
        let b = CylinderShape::new(DVec3::new(0.5, 0.0, 0.0), 1.0, 0.1);
        let forward = cylinder_cylinder(&a, &b).unwrap();
        let reverse = cylinder_cylinder(&b, &a).unwrap();

        assert_relative_eq!(forward.normal.y.abs(), 1.0);
        assert_vec_near(forward.normal, -reverse.normal);
        assert_vec_near(forward.point_on_a, reverse.point_on_b);
    }
}
