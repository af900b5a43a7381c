//! Core types for rift: geometry, entities, the entity registry, static maps
//! and gameplay effects.
//!
//! This crate holds the data model the per-tick simulation in
//! `rift-simulation` operates on. Geometry is consumed through the
//! [`Region`] trait; [`Shape`] is the stock implementation.

/// Gameplay effects applied to struck entities.
pub mod effect;
/// Entity handles and capability slots.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Vectors, the region contract, and the reference shapes.
pub mod geometry;
/// Static level geometry.
pub mod map;
/// The generational arena owning live and dead entities.
pub mod registry;

/// Re-export effect types.
pub use effect::{Damage, Effect, Kill, Push};
/// Re-export entity types.
pub use entity::{Capability, Entity, EntityId, Lives, Moves, Occupies};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export geometry types.
pub use geometry::{Aabb, CONTACT_EPSILON, Region, Shape, Vec2};
/// Re-export the map type.
pub use map::Map;
/// Re-export the registry type.
pub use registry::EntityRegistry;
