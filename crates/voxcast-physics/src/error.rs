//! Collision error types.

use glam::DVec3;
use thiserror::Error;

use crate::shape::ShapeKind;

/// Reasons a shape pair could not be tested.
///
/// These are distinct from a tested pair that does not overlap, which is
/// `Ok(None)`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CollisionError {
    #[error("No contact routine for {a} vs {b}")]
    UnsupportedPair { a: ShapeKind, b: ShapeKind },

    #[error("Quad normal {normal} is neither vertical nor horizontal")]
    UnsupportedQuadOrientation { normal: DVec3 },
}

pub type Result<T> = std::result::Result<T, CollisionError>;
