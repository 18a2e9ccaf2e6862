//! Narrow-phase collision.
//!
//! Every supported pair has one canonical routine taking its shapes in a
//! fixed order. [`collide_shapes`] routes any pair to its routine and mirrors
//! the result when the arguments arrive the other way round, so swapping A
//! and B always swaps the points and negates the normal.
//!
//! Normals point from B toward A. Boundaries are inclusive: shapes that only
//! touch are reported as colliding with zero depth.

mod boxes;
mod capsule;
mod cylinder;
mod quad;

use std::cmp::Ordering;

use glam::DVec3;

pub use boxes::{box_box, box_capsule};
pub use capsule::capsule_capsule;
pub use cylinder::{box_cylinder, cylinder_cylinder};
pub use quad::{capsule_quad, cylinder_quad, quad_box};

use crate::error::{CollisionError, Result};
use crate::shape::{Collider, ColliderId, Shape};

/// Geometric contact between two shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Deepest point of B's influence on A's surface.
    pub point_on_a: DVec3,
    /// Deepest point of A's influence on B's surface.
    pub point_on_b: DVec3,
    /// Unit normal from B toward A.
    pub normal: DVec3,
}

impl Contact {
    /// The same contact seen with A and B exchanged.
    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            point_on_a: self.point_on_b,
            point_on_b: self.point_on_a,
            normal: -self.normal,
        }
    }

    /// Penetration depth along the normal; zero when touching.
    #[inline]
    pub fn depth(&self) -> f64 {
        (self.point_on_b - self.point_on_a).dot(self.normal)
    }
}

/// Contact between two identified colliders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderHit {
    pub a: ColliderId,
    pub b: ColliderId,
    pub point_on_a: DVec3,
    pub point_on_b: DVec3,
    /// Unit normal from B toward A.
    pub normal: DVec3,
}

impl ColliderHit {
    fn new(a: ColliderId, b: ColliderId, contact: Contact) -> Self {
        Self {
            a,
            b,
            point_on_a: contact.point_on_a,
            point_on_b: contact.point_on_b,
            normal: contact.normal,
        }
    }

    #[inline]
    pub fn contact(&self) -> Contact {
        Contact {
            point_on_a: self.point_on_a,
            point_on_b: self.point_on_b,
            normal: self.normal,
        }
    }
}

/// Strict order over shape parameters.
///
/// Orients contacts that geometry leaves undecided, such as two shapes
/// sharing a center. Only identical shapes compare equal, and those have no
/// mirrored contact to preserve.
pub(crate) fn precedes<const N: usize>(a: [f64; N], b: [f64; N]) -> bool {
    a.iter()
        .zip(&b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|order| order.is_ne())
        == Some(Ordering::Less)
}

/// Test two shapes for overlap.
///
/// `Ok(None)` means the pair was tested and does not touch. Pairs without a
/// routine return [`CollisionError::UnsupportedPair`].
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn collide_shapes(a: &Shape, b: &Shape) -> Result<Option<Contact>> {
    let contact = match (a, b) {
        (Shape::Capsule(a), Shape::Capsule(b)) => capsule_capsule(a, b),

        (Shape::Box(a), Shape::Capsule(b)) => box_capsule(a, b),
        (Shape::Capsule(a), Shape::Box(b)) => box_capsule(b, a).map(Contact::flipped),

        (Shape::Box(a), Shape::Box(b)) => box_box(a, b),

        (Shape::Box(a), Shape::Cylinder(b)) => box_cylinder(a, b),
        (Shape::Cylinder(a), Shape::Box(b)) => box_cylinder(b, a).map(Contact::flipped),

        (Shape::Cylinder(a), Shape::Cylinder(b)) => cylinder_cylinder(a, b),

        (Shape::Cylinder(a), Shape::Quad(b)) => cylinder_quad(a, b)?,
        (Shape::Quad(a), Shape::Cylinder(b)) => cylinder_quad(b, a)?.map(Contact::flipped),

        (Shape::Capsule(a), Shape::Quad(b)) => capsule_quad(a, b)?,
        (Shape::Quad(a), Shape::Capsule(b)) => capsule_quad(b, a)?.map(Contact::flipped),

        (Shape::Quad(a), Shape::Box(b)) => quad_box(a, b)?,
        (Shape::Box(a), Shape::Quad(b)) => quad_box(b, a)?.map(Contact::flipped),

        (Shape::Cylinder(_), Shape::Capsule(_))
        | (Shape::Capsule(_), Shape::Cylinder(_))
        | (Shape::Quad(_), Shape::Quad(_)) => {
            tracing::debug!(a = %a.kind(), b = %b.kind(), "unsupported collision pair");
            return Err(CollisionError::UnsupportedPair {
                a: a.kind(),
                b: b.kind(),
            });
        }
    };
    Ok(contact)
}

/// Test two colliders for overlap, tagging the contact with their ids.
pub fn test_collision(a: &Collider, b: &Collider) -> Result<Option<ColliderHit>> {
    Ok(collide_shapes(&a.shape, &b.shape)?.map(|contact| ColliderHit::new(a.id, b.id, contact)))
}
