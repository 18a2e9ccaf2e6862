//! Collision shape primitives.
//!
//! Boxes only rotate about Y and cylinders stay upright, which keeps every
//! pair routine down to a handful of axes. Boxes and cylinders are anchored
//! at the middle of their bottom face.

use std::fmt;

use glam::{DQuat, DVec2, DVec3};
use voxcast_core::constants::EPSILON;
use voxcast_core::math::{rotate_y, Aabb};

use crate::error::{CollisionError, Result};

/// Tolerance for classifying a quad as vertical or horizontal.
const ORIENTATION_EPSILON: f64 = 1e-6;

/// Box rotated about its vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    /// Center of the bottom face.
    pub translation: DVec3,
    /// Rotation about +Y in radians.
    pub yaw: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl BoxShape {
    #[inline]
    pub const fn new(translation: DVec3, width: f64, height: f64, depth: f64) -> Self {
        Self {
            translation,
            yaw: 0.0,
            width,
            height,
            depth,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = yaw;
        self
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> DVec3 {
        self.translation + DVec3::new(0.0, self.height * 0.5, 0.0)
    }

    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        DVec3::new(self.width, self.height, self.depth) * 0.5
    }

    /// Box in its own frame, centered on the origin.
    #[inline]
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_half_extents(self.half_extents())
    }

    /// World point into the box frame.
    #[inline]
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        rotate_y(point - self.center(), -self.yaw)
    }

    /// Box-frame point back into world space.
    #[inline]
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.center() + rotate_y(local, self.yaw)
    }

    /// Box-frame direction into world space.
    #[inline]
    pub fn direction_to_world(&self, local: DVec3) -> DVec3 {
        rotate_y(local, self.yaw)
    }

    /// World axes of the box's width, height and depth.
    #[inline]
    pub fn axes(&self) -> [DVec3; 3] {
        [
            rotate_y(DVec3::X, self.yaw),
            DVec3::Y,
            rotate_y(DVec3::Z, self.yaw),
        ]
    }

    /// Half the box's extent when projected onto a unit `axis`.
    pub fn projected_radius(&self, axis: DVec3) -> f64 {
        let half = self.half_extents();
        let [x, y, z] = self.axes();
        half.x * axis.dot(x).abs() + half.y * axis.dot(y).abs() + half.z * axis.dot(z).abs()
    }

    /// Closest point of the box to a world point.
    pub fn clamp_point(&self, point: DVec3) -> DVec3 {
        self.to_world(self.local_bounds().clamp_point(self.to_local(point)))
    }

    /// World point from box-frame XZ plus a world height.
    #[inline]
    pub(crate) fn local_xz_to_world(&self, xz: DVec2, y: f64) -> DVec3 {
        let center = self.center();
        let offset = rotate_y(DVec3::new(xz.x, 0.0, xz.y), self.yaw);
        DVec3::new(center.x + offset.x, y, center.z + offset.z)
    }

    /// Vertical extent as `(bottom, top)`.
    #[inline]
    pub fn y_range(&self) -> (f64, f64) {
        (self.translation.y, self.translation.y + self.height)
    }
}

/// Capsule: a segment swept by a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleShape {
    /// Midpoint of the core segment.
    pub translation: DVec3,
    pub rotation: DQuat,
    pub radius: f64,
    /// Length of the core segment, excluding the caps.
    pub length: f64,
}

impl CapsuleShape {
    #[inline]
    pub const fn new(translation: DVec3, rotation: DQuat, radius: f64, length: f64) -> Self {
        Self {
            translation,
            rotation,
            radius,
            length,
        }
    }

    /// Capsule whose segment runs along +Y.
    #[inline]
    pub const fn upright(translation: DVec3, radius: f64, length: f64) -> Self {
        Self::new(translation, DQuat::IDENTITY, radius, length)
    }

    /// Core segment endpoints, bottom first for an upright capsule.
    #[inline]
    pub fn segment(&self) -> (DVec3, DVec3) {
        let half = self.rotation * DVec3::new(0.0, self.length * 0.5, 0.0);
        (self.translation - half, self.translation + half)
    }
}

/// Upright cylinder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderShape {
    /// Center of the bottom disc.
    pub center: DVec3,
    pub radius: f64,
    pub height: f64,
}

impl CylinderShape {
    #[inline]
    pub const fn new(center: DVec3, radius: f64, height: f64) -> Self {
        Self {
            center,
            radius,
            height,
        }
    }

    /// Vertical extent as `(bottom, top)`.
    #[inline]
    pub fn y_range(&self) -> (f64, f64) {
        (self.center.y, self.center.y + self.height)
    }

    #[inline]
    pub(crate) fn center_xz(&self) -> DVec2 {
        DVec2::new(self.center.x, self.center.z)
    }
}

/// One-sided flat rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadShape {
    pub center: DVec3,
    /// Unit normal.
    pub normal: DVec3,
    pub width: f64,
    pub height: f64,
}

impl QuadShape {
    /// Quad with `normal` normalized; a zero normal falls back to +Z.
    pub fn new(center: DVec3, normal: DVec3, width: f64, height: f64) -> Self {
        Self {
            center,
            normal: normal.try_normalize().unwrap_or(DVec3::Z),
            width,
            height,
        }
    }

    /// Width direction.
    pub fn right(&self) -> DVec3 {
        DVec3::Y.cross(self.normal).try_normalize().unwrap_or(DVec3::X)
    }

    /// Zero-thickness box covering the quad.
    ///
    /// Only vertical and horizontal quads can be expressed as a box rotated
    /// about Y; anything tilted is an error.
    pub fn as_box(&self) -> Result<BoxShape> {
        let n = self.normal;
        if n.y.abs() < ORIENTATION_EPSILON {
            // Box X runs along `right`, box Z along the normal.
            let right = self.right();
            let yaw = right.z.atan2(right.x);
            let translation = self.center - DVec3::new(0.0, self.height * 0.5, 0.0);
            Ok(BoxShape::new(translation, self.width, self.height, 0.0).with_yaw(yaw))
        } else if (n.y.abs() - 1.0).abs() < ORIENTATION_EPSILON {
            Ok(BoxShape::new(self.center, self.width, 0.0, self.height))
        } else {
            Err(CollisionError::UnsupportedQuadOrientation { normal: n })
        }
    }
}

/// Tag of a [`Shape`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Capsule,
    Cylinder,
    Quad,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Cylinder => "cylinder",
            Self::Quad => "quad",
        };
        f.write_str(name)
    }
}

/// Any collision shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box(BoxShape),
    Capsule(CapsuleShape),
    Cylinder(CylinderShape),
    Quad(QuadShape),
}

impl Shape {
    #[inline]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Box(_) => ShapeKind::Box,
            Self::Capsule(_) => ShapeKind::Capsule,
            Self::Cylinder(_) => ShapeKind::Cylinder,
            Self::Quad(_) => ShapeKind::Quad,
        }
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Self::Box(shape)
    }
}

impl From<CapsuleShape> for Shape {
    fn from(shape: CapsuleShape) -> Self {
        Self::Capsule(shape)
    }
}

impl From<CylinderShape> for Shape {
    fn from(shape: CylinderShape) -> Self {
        Self::Cylinder(shape)
    }
}

impl From<QuadShape> for Shape {
    fn from(shape: QuadShape) -> Self {
        Self::Quad(shape)
    }
}

/// Caller-chosen collider handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// A shape with an identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub id: ColliderId,
    pub shape: Shape,
}

impl Collider {
    #[inline]
    pub fn new(id: ColliderId, shape: impl Into<Shape>) -> Self {
        Self {
            id,
            shape: shape.into(),
        }
    }
}

/// Unit vector perpendicular to `axis`, or +X when `axis` is degenerate.
pub(crate) fn perpendicular(axis: DVec3) -> DVec3 {
    if axis.length_squared() <= EPSILON {
        DVec3::X
    } else {
        axis.normalize().any_orthonormal_vector()
    }
}
