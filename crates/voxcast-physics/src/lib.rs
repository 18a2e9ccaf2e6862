//! Spatial queries for voxcast.
//!
//! Two independent services:
//! - [`raycast`]: the nearest voxel or entity billboard along a ray,
//!   walking the chunked grid with a DDA.
//! - [`collision`]: narrow-phase contacts between boxes, capsules, upright
//!   cylinders and quads.

pub mod chunk_entity_map;
pub mod collision;
pub mod config;
pub mod error;
pub mod raycast;
pub mod shape;

pub use chunk_entity_map::{ChunkEntityEntry, ChunkEntityMap, ChunkEntityMapCache};
pub use collision::{collide_shapes, test_collision, ColliderHit, Contact};
pub use config::{RayCastConfig, DEFAULT_MAX_RAY_STEPS};
pub use error::{CollisionError, Result};
pub use raycast::{ray_cast, RayCastHit, RayCastHitKind, RayCaster};
pub use shape::{
    BoxShape, CapsuleShape, Collider, ColliderId, CylinderShape, QuadShape, Shape, ShapeKind,
};
