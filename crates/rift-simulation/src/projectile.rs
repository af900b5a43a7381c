use std::fmt;

use rift_core::{Effect, EntityId, Region, Vec2};
use serde::{Deserialize, Serialize};

use crate::context::TickContext;
use crate::event::SimEventKind;

/// Identifier assigned to a projectile when it is added to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(pub u64);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which entities a projectile is allowed to strike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Fired by the player: strikes any live entity except the player.
    #[default]
    World,
    /// Fired at the player: strikes only the player.
    PlayerOnly,
}

/// A moving point that triggers effects on the entities it passes through.
#[derive(Debug, Clone)]
pub struct Projectile<R: Region> {
    /// Current position.
    pub position: Vec2,
    /// Direction of travel. Recomputed every tick while a target is set.
    pub velocity: Vec2,
    /// Scalar multiplier applied to `velocity`.
    pub speed: f64,
    /// Point the projectile homes in on. Reaching it destroys the projectile.
    pub target: Option<Vec2>,
    /// The entity that fired it. Never struck by its own projectile.
    pub source: Option<EntityId>,
    /// Effect templates cloned onto every entity struck.
    pub on_hit: Vec<Box<dyn Effect<R>>>,
    /// Hits remaining before the projectile is spent.
    pub max_hit: u32,
    /// Who the projectile may strike.
    pub policy: HitPolicy,
    /// Entities overlapped during the previous tick.
    prev_hit: Vec<EntityId>,
}

/// Outcome of advancing one projectile by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flight {
    pub arrived: bool,
    pub hits: u32,
}

impl<R: Region> Projectile<R> {
    /// A free-flying projectile that strikes one entity.
    pub fn new(position: Vec2, velocity: Vec2, speed: f64) -> Self {
        Self {
            position,
            velocity,
            speed,
            target: None,
            source: None,
            on_hit: Vec::new(),
            max_hit: 1,
            policy: HitPolicy::default(),
            prev_hit: Vec::new(),
        }
    }

    /// Home in on `target` and vanish on arrival.
    pub fn with_target(mut self, target: Vec2) -> Self {
        self.target = Some(target);
        self
    }

    /// Record the firing entity.
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Number of distinct entities the projectile may strike.
    pub fn with_max_hit(mut self, max_hit: u32) -> Self {
        self.max_hit = max_hit;
        self
    }

    /// Add an effect template triggered on each hit.
    pub fn with_effect(mut self, effect: Box<dyn Effect<R>>) -> Self {
        self.on_hit.push(effect);
        self
    }

    /// Choose which entities the projectile may strike.
    pub fn with_policy(mut self, policy: HitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Entities the projectile was overlapping at the end of the last tick.
    pub fn overlapping(&self) -> &[EntityId] {
        &self.prev_hit
    }

    /// Move the projectile by `elapsed` seconds. Returns true if it reached
    /// its target this tick.
    pub fn advance(&mut self, elapsed: f64) -> bool {
        let Some(target) = self.target else {
            self.position = self.position + self.velocity * elapsed * self.speed;
            return false;
        };

        let Some(direction) = (target - self.position).try_normalize() else {
            // Already sitting on the target.
            self.position = target;
            return true;
        };
        self.velocity = direction;

        let l = self.position;
        let r = self.position + self.velocity * elapsed * self.speed;
        let m = target;
        // l, m and r are collinear, so m - l = k * (r - m) for some k. The
        // sign of k says whether m lies between l and r; a dot product gives
        // that sign without dividing, and k == 0 (m on an endpoint) counts.
        if (r - m).dot(m - l) >= 0.0 {
            self.position = m;
            true
        } else {
            self.position = r;
            false
        }
    }

    /// Entities whose region contains the projectile, subject to the policy.
    fn candidates(&self, ctx: &TickContext<'_, R>) -> Vec<EntityId> {
        match self.policy {
            HitPolicy::World => ctx
                .registry
                .iter()
                .filter(|(id, e)| *id != ctx.player && e.contains(self.position))
                .map(|(id, _)| id)
                .collect(),
            HitPolicy::PlayerOnly => ctx
                .registry
                .get(ctx.player)
                .filter(|e| e.contains(self.position))
                .map(|_| ctx.player)
                .into_iter()
                .collect(),
        }
    }

    /// Resolve hits for this tick. Each entity is struck at most once per
    /// continuous overlap; the overlap set is carried into the next tick.
    fn strike(&mut self, id: ProjectileId, ctx: &mut TickContext<'_, R>) -> u32 {
        if self.max_hit == 0 {
            self.prev_hit.clear();
            return 0;
        }
        let mut current: Vec<EntityId> = Vec::new();
        let mut hits = 0;

        for entity in self.candidates(ctx) {
            let seen = self.source == Some(entity)
                || self.prev_hit.contains(&entity)
                || current.contains(&entity);
            current.push(entity);
            if seen {
                continue;
            }

            self.max_hit = self.max_hit.saturating_sub(1);
            hits += 1;
            for template in &self.on_hit {
                let mut effect = template.clone_box();
                effect.set_targets(vec![entity]);
                ctx.timeline.schedule(effect, 0.0);
            }
            tracing::debug!(projectile = %id, target = %entity, remaining = self.max_hit, "projectile hit");
            ctx.emit(
                SimEventKind::ProjectileHit {
                    projectile: id,
                    target: entity,
                },
                format!("projectile {id} hit {entity}"),
            );

            if self.max_hit == 0 {
                break;
            }
        }

        self.prev_hit = current;
        hits
    }

    /// Advance and resolve hits for one tick.
    pub(crate) fn fly(&mut self, id: ProjectileId, ctx: &mut TickContext<'_, R>) -> Flight {
        let arrived = self.advance(ctx.elapsed);
        let hits = self.strike(id, ctx);
        Flight { arrived, hits }
    }
}

/// A projectile owned by the world, tagged with its identifier.
#[derive(Debug, Clone)]
pub struct Tracked<R: Region> {
    /// Identifier assigned at insertion.
    pub id: ProjectileId,
    /// The projectile itself.
    pub projectile: Projectile<R>,
}

/// Move every projectile, resolve its hits, and drop the ones that are spent
/// or have arrived. Returns the number of new hits this tick.
pub fn move_projectiles<R: Region>(
    projectiles: &mut Vec<Tracked<R>>,
    ctx: &mut TickContext<'_, R>,
) -> u32 {
    let mut hits = 0;
    projectiles.retain_mut(|tracked| {
        let id = tracked.id;
        let flight = tracked.projectile.fly(id, ctx);
        hits += flight.hits;

        if tracked.projectile.max_hit == 0 {
            ctx.emit(
                SimEventKind::ProjectileSpent { projectile: id },
                format!("projectile {id} is spent"),
            );
            return false;
        }
        if flight.arrived {
            let at = tracked.projectile.position;
            tracing::trace!(projectile = %id, %at, "projectile arrived");
            ctx.emit(
                SimEventKind::ProjectileArrived { projectile: id, at },
                format!("projectile {id} reached {at}"),
            );
            return false;
        }
        true
    });
    hits
}
