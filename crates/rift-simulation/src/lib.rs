//! Per-tick world simulation for rift.
//!
//! Drives a [`rift_core::EntityRegistry`] forward in time: dead entities are
//! reaped, entities and projectiles move, projectiles strike what they pass
//! through, entities are pushed out of the map's solids, and the effects
//! triggered along the way run at the end of the tick.

/// Simulation clock producing the elapsed time of each tick.
pub mod clock;
/// Push-out resolution against static solids.
pub mod collision;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to each phase of a tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Reaping and self-motion phases.
pub mod lifecycle;
/// Projectiles, their flight and hit bookkeeping.
pub mod projectile;
/// Deferred effect queue.
pub mod timeline;
/// Top-level simulation orchestrator.
pub mod world;

/// Re-exports of [`clock::SimClock`] and [`clock::ClockMode`].
pub use clock::{ClockMode, SimClock};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::TickContext`].
pub use context::TickContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of the projectile types.
pub use projectile::{HitPolicy, Projectile, ProjectileId};
/// Re-exports of [`timeline::Timeline`] and [`timeline::AppliedEffect`].
pub use timeline::{AppliedEffect, Timeline};
/// Re-exports of [`world::World`] and [`world::TickReport`].
pub use world::{TickReport, World};
