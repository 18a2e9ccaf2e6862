//! Entity storage for voxcast.
//!
//! Entities are flat billboards standing at a world position. The spatial
//! queries only see them through the [`EntityStore`] trait; [`EntityManager`]
//! is the in-memory store, using hecs as the ECS backend.

pub mod billboard;
pub mod manager;
pub mod store;

use glam::{DVec2, DVec3};

pub use billboard::{BillboardAnimation, BillboardFrame, ObservedBillboard};
pub use manager::{EntityDesc, EntityManager};
pub use store::{EntityBounds, EntityStore};

/// Opaque entity handle.
pub type EntityId = hecs::Entity;

/// Transform component.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// World position of the entity's feet.
    pub position: DVec3,
    /// Horizontal facing direction (X, Z), unit length.
    pub facing: DVec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            facing: DVec2::Y,
        }
    }
}
