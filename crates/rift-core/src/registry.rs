use slotmap::SlotMap;

use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::geometry::Region;

/// Owns every live entity, plus the ones that have been relocated out of
/// the simulation.
///
/// Live entities sit in a generational arena, so an [`EntityId`] held by a
/// projectile or an effect either resolves to the same entity it was issued
/// for or to nothing at all. Buried entities keep their data in the dead set
/// for inspection but are invisible to lookups, spatial queries and collision.
#[derive(Debug, Clone)]
pub struct EntityRegistry<R> {
    live: SlotMap<EntityId, Entity<R>>,
    dead: Vec<(EntityId, Entity<R>)>,
}

impl<R> Default for EntityRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> EntityRegistry<R> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            live: SlotMap::with_key(),
            dead: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Live set
    // -----------------------------------------------------------------------

    /// Add an entity and return its handle.
    pub fn spawn(&mut self, entity: Entity<R>) -> EntityId {
        let name = entity.name.clone();
        let id = self.live.insert(entity);
        tracing::trace!(%id, %name, "spawned entity");
        id
    }

    /// Look up a live entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity<R>> {
        self.live.get(id)
    }

    /// Look up a live entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<R>> {
        self.live.get_mut(id)
    }

    /// Whether the handle still resolves to a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains_key(id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if there are no live entities.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Iterate over live entities.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity<R>)> {
        self.live.iter()
    }

    /// Iterate mutably over live entities.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity<R>)> {
        self.live.iter_mut()
    }

    /// Handles of all live entities.
    pub fn ids(&self) -> Vec<EntityId> {
        self.live.keys().collect()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Live entities that can die and are no longer alive.
    pub fn dead_ids(&self) -> Vec<EntityId> {
        self.live
            .iter()
            .filter(|(_, e)| e.lives.as_ref().is_some_and(|l| !l.alive))
            .map(|(id, _)| id)
            .collect()
    }

    /// Relocate one entity from the live set into the dead set.
    pub fn bury(&mut self, id: EntityId) -> CoreResult<()> {
        let entity = self.live.remove(id).ok_or(CoreError::EntityNotFound(id))?;
        tracing::debug!(%id, name = %entity.name, "entity relocated to dead set");
        self.dead.push((id, entity));
        Ok(())
    }

    /// Relocate every dead entity out of the live set. Returns the handles
    /// that were relocated, in registry order.
    ///
    /// Handles are collected before any removal happens, so relocation never
    /// observes a half-updated live set. The relocated entities are the last
    /// `n` entries of [`graveyard`](Self::graveyard), in the same order as
    /// the returned handles.
    pub fn reap(&mut self) -> Vec<EntityId> {
        let mut reaped = Vec::new();
        for id in self.dead_ids() {
            if let Some(entity) = self.live.remove(id) {
                tracing::debug!(%id, name = %entity.name, "reaped entity");
                self.dead.push((id, entity));
                reaped.push(id);
            }
        }
        reaped
    }

    /// Entities that have been relocated out of the simulation, oldest first.
    pub fn graveyard(&self) -> &[(EntityId, Entity<R>)] {
        &self.dead
    }

    /// Take every entity out of the dead set, oldest first.
    pub fn drain_graveyard(&mut self) -> Vec<(EntityId, Entity<R>)> {
        std::mem::take(&mut self.dead)
    }

    /// Drop the oldest dead entities until at most `max` remain. Returns how
    /// many were dropped.
    pub fn trim_graveyard(&mut self, max: usize) -> usize {
        let excess = self.dead.len().saturating_sub(max);
        if excess > 0 {
            self.dead.drain(..excess);
            tracing::trace!(dropped = excess, kept = max, "trimmed dead set");
        }
        excess
    }
}

impl<R: Region> EntityRegistry<R> {
    /// Live entities whose region might overlap `query` according to the
    /// broad phase. Entities without a region never match.
    pub fn entities_in_region(&self, query: &R) -> Vec<EntityId> {
        self.live
            .iter()
            .filter(|(_, e)| e.region().is_some_and(|r| query.might_collide(r)))
            .map(|(id, _)| id)
            .collect()
    }
}
