use std::fmt;

use crate::entity::{Entity, EntityId};
use crate::geometry::{Region, Vec2};
use crate::registry::EntityRegistry;

/// A gameplay effect that is applied to a set of target entities.
///
/// Projectiles carry effect templates. On each new hit the template is
/// cloned, pointed at the struck entity and handed to the timeline, which
/// applies it after hit detection has finished.
pub trait Effect<R: Region>: fmt::Debug {
    /// Short label used in logs and events.
    fn name(&self) -> &str;

    /// The entities this effect will be applied to.
    fn targets(&self) -> &[EntityId];

    /// Replace the target set.
    fn set_targets(&mut self, targets: Vec<EntityId>);

    /// Apply the effect. Targets that no longer resolve, or that are already
    /// dead, are skipped. Returns how many targets were affected.
    fn apply(&mut self, registry: &mut EntityRegistry<R>) -> usize;

    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn Effect<R>>;
}

impl<R: Region> Clone for Box<dyn Effect<R>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Run `f` on every target that is still live and not yet dead.
fn for_each_live_target<R: Region>(
    registry: &mut EntityRegistry<R>,
    targets: &[EntityId],
    mut f: impl FnMut(&mut Entity<R>),
) -> usize {
    let mut affected = 0;
    for &id in targets {
        match registry.get_mut(id) {
            Some(entity) if entity.is_alive() => {
                f(entity);
                affected += 1;
            }
            Some(_) => tracing::trace!(%id, "effect target already dead"),
            None => tracing::trace!(%id, "effect target no longer live"),
        }
    }
    affected
}

/// Lowers the health of every target.
#[derive(Debug, Clone, PartialEq)]
pub struct Damage {
    /// Health removed per application.
    pub amount: f64,
    targets: Vec<EntityId>,
}

impl Damage {
    /// Subtract `amount` health from each target.
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            targets: Vec::new(),
        }
    }
}

impl<R: Region + 'static> Effect<R> for Damage {
    fn name(&self) -> &str {
        "damage"
    }

    fn targets(&self) -> &[EntityId] {
        &self.targets
    }

    fn set_targets(&mut self, targets: Vec<EntityId>) {
        self.targets = targets;
    }

    fn apply(&mut self, registry: &mut EntityRegistry<R>) -> usize {
        let amount = self.amount;
        for_each_live_target(registry, &self.targets, |e| {
            if let Some(lives) = e.lives.as_mut() {
                lives.damage(amount);
            }
        })
    }

    fn clone_box(&self) -> Box<dyn Effect<R>> {
        Box::new(self.clone())
    }
}

/// Kills every target outright.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kill {
    targets: Vec<EntityId>,
}

impl Kill {
    /// Kill each target outright.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Region + 'static> Effect<R> for Kill {
    fn name(&self) -> &str {
        "kill"
    }

    fn targets(&self) -> &[EntityId] {
        &self.targets
    }

    fn set_targets(&mut self, targets: Vec<EntityId>) {
        self.targets = targets;
    }

    fn apply(&mut self, registry: &mut EntityRegistry<R>) -> usize {
        for_each_live_target(registry, &self.targets, |e| {
            if let Some(lives) = e.lives.as_mut() {
                lives.kill();
            }
        })
    }

    fn clone_box(&self) -> Box<dyn Effect<R>> {
        Box::new(self.clone())
    }
}

/// Displaces the region of every target.
#[derive(Debug, Clone, PartialEq)]
pub struct Push {
    /// Translation applied to each target's region.
    pub offset: Vec2,
    targets: Vec<EntityId>,
}

impl Push {
    /// Translate each target by `offset`.
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            targets: Vec::new(),
        }
    }
}

impl<R: Region + 'static> Effect<R> for Push {
    fn name(&self) -> &str {
        "push"
    }

    fn targets(&self) -> &[EntityId] {
        &self.targets
    }

    fn set_targets(&mut self, targets: Vec<EntityId>) {
        self.targets = targets;
    }

    fn apply(&mut self, registry: &mut EntityRegistry<R>) -> usize {
        let offset = self.offset;
        for_each_live_target(registry, &self.targets, |e| {
            if let Some(occupies) = e.occupies.as_mut() {
                occupies.region.translate(offset);
            }
        })
    }

    fn clone_box(&self) -> Box<dyn Effect<R>> {
        Box::new(self.clone())
    }
}
