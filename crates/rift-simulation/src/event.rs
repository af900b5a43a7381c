use rift_core::{EntityId, Vec2};

use crate::projectile::ProjectileId;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Lifecycle
    /// A dead entity was relocated out of the live set.
    EntityReaped {
        /// The entity that was reaped.
        entity: EntityId,
    },

    // Projectiles
    /// A projectile struck an entity it was not already overlapping.
    ProjectileHit {
        /// The projectile that hit.
        projectile: ProjectileId,
        /// The entity that was struck.
        target: EntityId,
    },
    /// A projectile reached its target point.
    ProjectileArrived {
        /// The projectile that arrived.
        projectile: ProjectileId,
        /// Where it came to rest.
        at: Vec2,
    },
    /// A projectile used up its hit budget.
    ProjectileSpent {
        /// The spent projectile.
        projectile: ProjectileId,
    },

    // Collision
    /// An entity was pushed out of a static solid.
    EntityPushed {
        /// The entity that was moved.
        entity: EntityId,
        /// The translation applied.
        offset: Vec2,
    },

    // Effects
    /// A scheduled effect was applied.
    EffectApplied {
        /// The effect's name.
        effect: String,
        /// The entities the effect was aimed at.
        targets: Vec<EntityId>,
        /// How many of those were actually affected.
        affected: usize,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::EntityReaped { entity } | Self::EntityPushed { entity, .. } => *entity == id,
            Self::ProjectileHit { target, .. } => *target == id,
            Self::EffectApplied { targets, .. } => targets.contains(&id),
            Self::ProjectileArrived { .. } | Self::ProjectileSpent { .. } => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Count events matching a predicate on their kind.
    pub fn count(&self, pred: impl Fn(&SimEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_core::{Entity, EntityRegistry, Shape};

    fn two_ids() -> (EntityId, EntityId) {
        let mut reg: EntityRegistry<Shape> = EntityRegistry::new();
        (reg.spawn(Entity::new("a")), reg.spawn(Entity::new("b")))
    }

    fn reaped(tick: u64, entity: EntityId) -> SimEvent {
        SimEvent::new(tick, SimEventKind::EntityReaped { entity }, "test")
    }

    #[test]
    fn event_log_push_and_query() {
        let (id, _) = two_ids();
        let mut log = EventLog::new(0);
        log.push(reaped(1, id));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_for_entity(id).len(), 1);
    }

    #[test]
    fn event_log_max_events_trims() {
        let (id, _) = two_ids();
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(reaped(i, id));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_kind_involves_entity() {
        let (a, b) = two_ids();
        let p = ProjectileId(7);

        let kind = SimEventKind::ProjectileHit {
            projectile: p,
            target: a,
        };
        assert!(kind.involves(a));
        assert!(!kind.involves(b));

        let kind = SimEventKind::EffectApplied {
            effect: "damage".into(),
            targets: vec![a, b],
            affected: 2,
        };
        assert!(kind.involves(a));
        assert!(kind.involves(b));

        let kind = SimEventKind::ProjectileSpent { projectile: p };
        assert!(!kind.involves(a));
    }

    #[test]
    fn event_log_count_by_kind() {
        let (a, b) = two_ids();
        let mut log = EventLog::new(0);
        log.push(reaped(1, a));
        log.push(SimEvent::new(
            1,
            SimEventKind::EntityPushed {
                entity: b,
                offset: Vec2::new(1.0, 0.0),
            },
            "pushed",
        ));
        assert_eq!(
            log.count(|k| matches!(k, SimEventKind::EntityReaped { .. })),
            1
        );
        assert_eq!(
            log.count(|k| matches!(k, SimEventKind::EntityPushed { .. })),
            1
        );
        assert_eq!(
            log.count(|k| matches!(k, SimEventKind::ProjectileSpent { .. })),
            0
        );
    }
}
