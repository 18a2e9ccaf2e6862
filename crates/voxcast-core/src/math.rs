//! Math utilities and helpers.
//!
//! All world-space math is done in f64 so that distances far from the origin
//! keep sub-voxel precision.

use crate::constants::EPSILON;
use glam::DVec3;

/// Ray for ray casting operations.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray origin
    pub origin: DVec3,
    /// Ray direction (normalized)
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray
    #[inline]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at origin with given half-extents
    #[inline]
    pub fn from_half_extents(half_extents: DVec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    /// Get the center of the AABB
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Check if a point is inside the AABB (boundary included)
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if this AABB intersects another (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Closest point inside the AABB to `point`
    #[inline]
    pub fn clamp_point(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    /// Ray-AABB slab test.
    ///
    /// Returns `(t_near, t_far)` along `direction` when the line hits the box
    /// and the box is not entirely behind the origin. `t_near` is negative
    /// when the origin is inside the box.
    pub fn intersect_ray(&self, origin: DVec3, direction: DVec3) -> Option<(f64, f64)> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < EPSILON {
                // Parallel to this slab
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            };
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near, t_far))
        } else {
            None
        }
    }
}

/// Rotate a vector about +Y by `yaw` radians.
///
/// Model `(x, z)` maps to `(x cos - z sin, x sin + z cos)`.
#[inline]
pub fn rotate_y(v: DVec3, yaw: f64) -> DVec3 {
    let (sin, cos) = yaw.sin_cos();
    DVec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Point where a ray meets a plane, if it does so at `t >= 0`.
pub fn ray_plane_intersection(
    origin: DVec3,
    direction: DVec3,
    plane_point: DVec3,
    plane_normal: DVec3,
) -> Option<DVec3> {
    let denom = plane_normal.dot(direction);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = plane_normal.dot(plane_point - origin) / denom;
    (t >= 0.0).then(|| origin + direction * t)
}

/// Möller–Trumbore ray/triangle test returning the hit distance.
pub fn ray_triangle_intersection(
    origin: DVec3,
    direction: DVec3,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Ray against a box rotated about its vertical axis.
///
/// `center` is the geometric center of the box. Returns the nearest
/// non-negative hit distance: the entry face from outside, the exit face when
/// the origin is already inside.
pub fn ray_box_intersection(
    origin: DVec3,
    direction: DVec3,
    center: DVec3,
    size: DVec3,
    yaw: f64,
) -> Option<f64> {
    let local_origin = rotate_y(origin - center, -yaw);
    let local_direction = rotate_y(direction, -yaw);
    let bounds = Aabb::from_half_extents(size * 0.5);

    let (t_near, t_far) = bounds.intersect_ray(local_origin, local_direction)?;
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Closest points between two segments `p0..p1` and `q0..q1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentClosestPoints {
    /// Parameter along the first segment in `[0, 1]`
    pub s: f64,
    /// Parameter along the second segment in `[0, 1]`
    pub t: f64,
    /// Closest point on the first segment
    pub on_first: DVec3,
    /// Closest point on the second segment
    pub on_second: DVec3,
}

impl SegmentClosestPoints {
    /// Distance between the two closest points
    #[inline]
    pub fn distance(&self) -> f64 {
        self.on_first.distance(self.on_second)
    }
}

/// Clamped closed-form closest points between two segments.
///
/// Point-like segments and parallel segments are handled without dividing by
/// zero. Parallel segments meet in the middle of their shared span, so the
/// result does not depend on which segment comes first.
pub fn closest_points_on_segments(
    p0: DVec3,
    p1: DVec3,
    q0: DVec3,
    q1: DVec3,
) -> SegmentClosestPoints {
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let r = p0 - q0;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                // Span of the second segment along the first.
                let (q0_s, q1_s) = (-c / a, (b - c) / a);
                let lo = q0_s.min(q1_s).max(0.0);
                let hi = q0_s.max(q1_s).min(1.0);
                ((lo + hi) * 0.5).clamp(0.0, 1.0)
            };

            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    SegmentClosestPoints {
        s,
        t,
        on_first: p0 + d1 * s,
        on_second: q0 + d2 * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn ray_at() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(0.0), DVec3::ZERO);
        assert_eq!(ray.at(5.0), DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn aabb_contains_point() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::ONE);
        assert!(aabb.contains_point(DVec3::splat(0.5)));
        assert!(aabb.contains_point(DVec3::ONE));
        assert!(!aabb.contains_point(DVec3::new(2.0, 0.5, 0.5)));
    }

    #[test]
    fn aabb_touching_intersects() {
        let a = Aabb::new(DVec3::ZERO, DVec3::ONE);
        let b = Aabb::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(DVec3::new(1.01, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn aabb_ray_intersection() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::ONE);

        let (t_near, t_far) = aabb
            .intersect_ray(DVec3::new(-1.0, 0.5, 0.5), DVec3::X)
            .unwrap();
        assert_relative_eq!(t_near, 1.0);
        assert_relative_eq!(t_far, 2.0);

        assert!(aabb
            .intersect_ray(DVec3::new(-1.0, 2.0, 0.5), DVec3::X)
            .is_none());
        assert!(aabb
            .intersect_ray(DVec3::new(2.0, 0.5, 0.5), DVec3::X)
            .is_none());
    }

    #[test]
    fn ray_box_from_outside_and_inside() {
        let center = DVec3::new(0.5, 0.5, 0.5);
        let size = DVec3::ONE;

        let t = ray_box_intersection(DVec3::new(0.5, 3.0, 0.5), DVec3::NEG_Y, center, size, 0.0);
        assert_relative_eq!(t.unwrap(), 2.0);

        let t = ray_box_intersection(center, DVec3::X, center, size, 0.0);
        assert_relative_eq!(t.unwrap(), 0.5);

        let t = ray_box_intersection(DVec3::new(0.5, 3.0, 0.5), DVec3::Y, center, size, 0.0);
        assert!(t.is_none());
    }

    #[test]
    fn ray_box_respects_yaw() {
        // A unit box turned 45 degrees reaches sqrt(0.5) along X.
        let t = ray_box_intersection(
            DVec3::new(-2.0, 0.0, 0.0),
            DVec3::X,
            DVec3::ZERO,
            DVec3::ONE,
            FRAC_PI_4,
        );
        assert_relative_eq!(t.unwrap(), 2.0 - 0.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn rotate_y_quarter_turn() {
        let v = rotate_y(DVec3::X, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_plane_behind_origin_misses() {
        let hit = ray_plane_intersection(DVec3::ZERO, DVec3::X, DVec3::new(3.0, 0.0, 0.0), DVec3::X);
        assert_eq!(hit, Some(DVec3::new(3.0, 0.0, 0.0)));

        let behind =
            ray_plane_intersection(DVec3::ZERO, DVec3::X, DVec3::new(-3.0, 0.0, 0.0), DVec3::X);
        assert!(behind.is_none());

        let parallel = ray_plane_intersection(DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::X);
        assert!(parallel.is_none());
    }

    #[test]
    fn ray_triangle_hit_and_miss() {
        let v0 = DVec3::new(0.0, 0.0, 1.0);
        let v1 = DVec3::new(1.0, 0.0, 1.0);
        let v2 = DVec3::new(0.0, 1.0, 1.0);
        let t = ray_triangle_intersection(DVec3::new(0.2, 0.2, 0.0), DVec3::Z, v0, v1, v2);
        assert_relative_eq!(t.unwrap(), 1.0);
        assert!(ray_triangle_intersection(DVec3::new(0.8, 0.8, 0.0), DVec3::Z, v0, v1, v2).is_none());
    }

    #[test]
    fn crossing_segments() {
        let c = closest_points_on_segments(
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, -1.0),
            DVec3::new(0.0, 1.0, 1.0),
        );
        assert_relative_eq!(c.s, 0.5);
        assert_relative_eq!(c.t, 0.5);
        assert_relative_eq!(c.distance(), 1.0);
    }

    #[test]
    fn parallel_segments_do_not_divide_by_zero() {
        let c = closest_points_on_segments(
            DVec3::ZERO,
            DVec3::Y,
            DVec3::new(0.3, 0.5, 0.0),
            DVec3::new(0.3, 2.0, 0.0),
        );
        assert!(c.s.is_finite() && c.t.is_finite());
        assert_relative_eq!(c.distance(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn parallel_segments_meet_mid_overlap() {
        let (p0, p1) = (DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0));
        let (q0, q1) = (DVec3::new(0.4, 1.0, 0.0), DVec3::new(0.4, 3.0, 0.0));

        let forward = closest_points_on_segments(p0, p1, q0, q1);
        assert_relative_eq!(forward.on_first.y, 1.5, epsilon = 1e-12);
        assert_relative_eq!(forward.on_second.y, 1.5, epsilon = 1e-12);

        let reverse = closest_points_on_segments(q0, q1, p0, p1);
        assert_relative_eq!(reverse.on_first.y, forward.on_second.y, epsilon = 1e-12);
        assert_relative_eq!(reverse.on_second.y, forward.on_first.y, epsilon = 1e-12);
    }

    #[test]
    fn disjoint_parallel_segments_use_facing_ends() {
        let c = closest_points_on_segments(
            DVec3::ZERO,
            DVec3::Y,
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        );
        assert_eq!(c.on_first, DVec3::Y);
        assert_eq!(c.on_second, DVec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn point_segments() {
        let c = closest_points_on_segments(DVec3::ZERO, DVec3::ZERO, DVec3::X, DVec3::X);
        assert_relative_eq!(c.distance(), 1.0);

        let c = closest_points_on_segments(
            DVec3::new(0.5, 1.0, 0.0),
            DVec3::new(0.5, 1.0, 0.0),
            DVec3::ZERO,
            DVec3::X,
        );
        assert_relative_eq!(c.t, 0.5);
        assert_relative_eq!(c.distance(), 1.0);
    }
}
