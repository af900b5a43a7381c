use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::geometry::{Region, Vec2};

new_key_type! {
    /// Generational handle to an entity in an [`EntityRegistry`](crate::registry::EntityRegistry).
    ///
    /// Once the entity is relocated to the dead set the handle stops resolving,
    /// even if its slot is later reused by a new spawn.
    pub struct EntityId;
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// The capability slots an entity may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Has spatial extent through a region.
    Occupies,
    /// Has an alive/dead state.
    Lives,
    /// Moves itself every tick.
    Moves,
}

/// Spatial extent of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupies<R> {
    /// The space the entity takes up.
    pub region: R,
}

/// Alive/dead state of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lives {
    /// Cleared when the entity dies. Dead entities are reaped at the start of
    /// the next tick.
    pub alive: bool,
    /// Remaining hit points.
    pub health: f64,
}

impl Lives {
    /// A living entity with the given health.
    pub fn new(health: f64) -> Self {
        Self {
            alive: true,
            health,
        }
    }

    /// Lower health by `amount`, dying at or below zero.
    pub fn damage(&mut self, amount: f64) {
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
        }
    }

    /// Die immediately.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Self-driven linear motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moves {
    /// Direction of travel.
    pub velocity: Vec2,
    /// Scalar multiplier applied to `velocity`.
    pub speed: f64,
}

impl Moves {
    /// Offset covered in `elapsed` seconds.
    pub fn displacement(&self, elapsed: f64) -> Vec2 {
        self.velocity * elapsed * self.speed
    }
}

/// A simulation entity: a name plus independently optional capability slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity<R> {
    /// Display name.
    pub name: String,
    /// Present when the entity takes up space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupies: Option<Occupies<R>>,
    /// Present when the entity can die.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lives: Option<Lives>,
    /// Present when the entity moves itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves: Option<Moves>,
}

impl<R> Entity<R> {
    /// A bare entity with no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occupies: None,
            lives: None,
            moves: None,
        }
    }

    /// Give the entity spatial extent.
    pub fn with_region(mut self, region: R) -> Self {
        self.occupies = Some(Occupies { region });
        self
    }

    /// Make the entity mortal with the given health.
    pub fn with_health(mut self, health: f64) -> Self {
        self.lives = Some(Lives::new(health));
        self
    }

    /// Make the entity move by itself.
    pub fn with_motion(mut self, velocity: Vec2, speed: f64) -> Self {
        self.moves = Some(Moves { velocity, speed });
        self
    }

    /// Whether the given capability slot is filled.
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Occupies => self.occupies.is_some(),
            Capability::Lives => self.lives.is_some(),
            Capability::Moves => self.moves.is_some(),
        }
    }

    /// The occupied region, if any.
    pub fn region(&self) -> Option<&R> {
        self.occupies.as_ref().map(|o| &o.region)
    }

    /// False only for entities that can die and have died.
    pub fn is_alive(&self) -> bool {
        self.lives.as_ref().is_none_or(|l| l.alive)
    }
}

impl<R: Region> Entity<R> {
    /// Advance self-motion by `elapsed` seconds. Entities without a region
    /// have nothing to move.
    pub fn step(&mut self, elapsed: f64) {
        if let (Some(moves), Some(occupies)) = (&self.moves, &mut self.occupies) {
            occupies.region.translate(moves.displacement(elapsed));
        }
    }

    /// Whether the occupied region contains `point`.
    pub fn contains(&self, point: Vec2) -> bool {
        self.region().is_some_and(|r| r.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;

    fn disc(x: f64, y: f64) -> Shape {
        Shape::circle(Vec2::new(x, y), 1.0).unwrap()
    }

    #[test]
    fn capabilities_follow_slots() {
        let e: Entity<Shape> = Entity::new("rock").with_region(disc(0.0, 0.0));
        assert!(e.has(Capability::Occupies));
        assert!(!e.has(Capability::Lives));
        assert!(!e.has(Capability::Moves));
        assert!(e.is_alive());
    }

    #[test]
    fn damage_kills_at_zero() {
        let mut lives = Lives::new(10.0);
        lives.damage(4.0);
        assert!(lives.alive);
        lives.damage(6.0);
        assert!(!lives.alive);
        assert_eq!(lives.health, 0.0);
    }

    #[test]
    fn step_translates_region() {
        let mut e = Entity::new("walker")
            .with_region(disc(0.0, 0.0))
            .with_motion(Vec2::new(1.0, 0.0), 4.0);
        e.step(0.5);
        assert_eq!(e.region().unwrap().center(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn step_without_region_is_noop() {
        let mut e: Entity<Shape> = Entity::new("ghost").with_motion(Vec2::new(1.0, 1.0), 1.0);
        e.step(1.0);
        assert!(e.region().is_none());
    }

    #[test]
    fn contains_requires_region() {
        let e: Entity<Shape> = Entity::new("ghost");
        assert!(!e.contains(Vec2::ZERO));
        let e = Entity::new("rock").with_region(disc(0.0, 0.0));
        assert!(e.contains(Vec2::new(0.5, 0.0)));
    }
}
