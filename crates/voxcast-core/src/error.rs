//! Errors raised when mutating chunks and entities.

use thiserror::Error;

/// Failure of a world or entity mutation.
///
/// Queries never produce these; they answer with `Option` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value the target cannot hold, e.g. a full shape table.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Unknown shape definition, collision box or entity.
    #[error("not found: {0}")]
    NotFound(String),

    /// A voxel outside its chunk.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
