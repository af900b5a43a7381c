use rift_core::{EntityId, EntityRegistry, Map, Region};

use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::timeline::Timeline;

/// Mutable context passed to each phase of a tick.
pub struct TickContext<'a, R: Region> {
    /// Live and dead entities.
    pub registry: &'a mut EntityRegistry<R>,
    /// Static solids.
    pub map: &'a Map<R>,
    /// Deferred effects; anything scheduled with zero delay runs at the end
    /// of this tick.
    pub timeline: &'a mut Timeline<R>,
    /// Event sink for [`emit`](Self::emit).
    pub events: &'a mut EventLog,
    /// The player-controlled entity, which decides who projectiles may hit.
    pub player: EntityId,
    /// Number of the tick being run.
    pub tick: u64,
    /// Seconds covered by this tick, shared by every phase.
    pub elapsed: f64,
}

impl<R: Region> TickContext<'_, R> {
    /// Record a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(SimEvent::new(self.tick, kind, description));
    }
}
