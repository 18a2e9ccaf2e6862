//! Quad pairs, solved by treating the quad as a box with no thickness.

use super::{box_box, box_capsule, box_cylinder, Contact};
use crate::error::Result;
use crate::shape::{BoxShape, CapsuleShape, CylinderShape, QuadShape};

/// Upright cylinder against quad.
pub fn cylinder_quad(a: &CylinderShape, b: &QuadShape) -> Result<Option<Contact>> {
    let slab = b.as_box()?;
    Ok(box_cylinder(&slab, a).map(Contact::flipped))
}

/// Capsule against quad.
pub fn capsule_quad(a: &CapsuleShape, b: &QuadShape) -> Result<Option<Contact>> {
    let slab = b.as_box()?;
    Ok(box_capsule(&slab, a).map(Contact::flipped))
}

/// Quad against box.
pub fn quad_box(a: &QuadShape, b: &BoxShape) -> Result<Option<Contact>> {
    let slab = a.as_box()?;
    Ok(box_box(&slab, b))
}
