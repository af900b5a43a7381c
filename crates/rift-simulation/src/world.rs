use rift_core::{CoreError, Entity, EntityId, EntityRegistry, Map, Region, Shape};

use crate::clock::SimClock;
use crate::collision::resolve_solids;
use crate::config::SimConfig;
use crate::context::TickContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEventKind};
use crate::lifecycle::{move_entities, reap_dead};
use crate::projectile::{Projectile, ProjectileId, Tracked, move_projectiles};
use crate::timeline::Timeline;

/// Summary of what happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick number.
    pub tick: u64,
    /// Seconds covered by the tick.
    pub elapsed: f64,
    /// Entities relocated to the dead set at the start of the tick.
    pub reaped: Vec<EntityId>,
    /// Entities that moved themselves.
    pub moved: usize,
    /// New projectile hits.
    pub hits: u32,
    /// Pushes out of static solids.
    pub pushes: usize,
    /// Effects applied at the end of the tick.
    pub effects_applied: usize,
}

/// The top-level simulation orchestrator.
///
/// Owns the entity registry, the live projectiles, the deferred effect
/// timeline, the static map and the clock. Each tick runs, in order:
/// reaping, entity motion, projectile motion and hits, solid collision, and
/// finally the effects that have come due.
pub struct World<R: Region = Shape> {
    registry: EntityRegistry<R>,
    map: Map<R>,
    projectiles: Vec<Tracked<R>>,
    timeline: Timeline<R>,
    events: EventLog,
    clock: SimClock,
    player: EntityId,
    next_projectile: u64,
    max_graveyard: usize,
}

impl<R: Region> std::fmt::Debug for World<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.clock.tick())
            .field("entities", &self.registry.len())
            .field("projectiles", &self.projectiles.len())
            .field("pending_effects", &self.timeline.pending())
            .finish()
    }
}

impl<R: Region> World<R> {
    /// Create a world around a player entity and a static map.
    pub fn new(player: Entity<R>, map: Map<R>, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut registry = EntityRegistry::new();
        let player = registry.spawn(player);
        tracing::debug!(%player, solids = map.len(), "world created");
        Ok(Self {
            registry,
            map,
            projectiles: Vec::new(),
            timeline: Timeline::new(),
            events: EventLog::new(config.max_events),
            clock: SimClock::new(config.clock),
            player,
            next_projectile: 0,
            max_graveyard: config.max_graveyard,
        })
    }

    /// Add an entity to the live set.
    pub fn spawn(&mut self, entity: Entity<R>) -> EntityId {
        self.registry.spawn(entity)
    }

    /// Add a projectile. It starts moving on the next tick.
    pub fn add_projectile(&mut self, projectile: Projectile<R>) -> ProjectileId {
        self.next_projectile += 1;
        let id = ProjectileId(self.next_projectile);
        self.projectiles.push(Tracked { id, projectile });
        id
    }

    /// Mark an entity dead. It stays in the live set until the next tick
    /// reaps it.
    pub fn kill(&mut self, id: EntityId) -> SimResult<()> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(CoreError::EntityNotFound(id))?;
        let lives = entity.lives.as_mut().ok_or(SimError::NotMortal(id))?;
        lives.kill();
        Ok(())
    }

    /// Relocate an entity to the dead set immediately, skipping the reaping
    /// phase.
    pub fn bury(&mut self, id: EntityId) -> SimResult<()> {
        self.registry.bury(id)?;
        self.trim_graveyard();
        Ok(())
    }

    /// Take every entity out of the dead set, oldest first.
    pub fn drain_graveyard(&mut self) -> Vec<(EntityId, Entity<R>)> {
        self.registry.drain_graveyard()
    }

    fn trim_graveyard(&mut self) {
        if self.max_graveyard > 0 {
            self.registry.trim_graveyard(self.max_graveyard);
        }
    }

    /// Advance by one tick, taking elapsed time from the clock.
    pub fn tick(&mut self) -> TickReport {
        let elapsed = self.clock.advance();
        self.run_tick(elapsed)
    }

    /// Advance by one tick covering exactly `elapsed` seconds.
    pub fn step(&mut self, elapsed: f64) -> TickReport {
        let elapsed = self.clock.advance_by(elapsed);
        self.run_tick(elapsed)
    }

    /// Advance by `n` ticks.
    pub fn run(&mut self, n: u64) -> Vec<TickReport> {
        (0..n).map(|_| self.tick()).collect()
    }

    fn run_tick(&mut self, elapsed: f64) -> TickReport {
        let tick = self.clock.tick();
        let _span = tracing::debug_span!("tick", tick, elapsed).entered();
        self.timeline.advance(elapsed);
        let max_graveyard = self.max_graveyard;

        let mut ctx = TickContext {
            registry: &mut self.registry,
            map: &self.map,
            timeline: &mut self.timeline,
            events: &mut self.events,
            player: self.player,
            tick,
            elapsed,
        };

        let reaped = reap_dead(&mut ctx);
        if max_graveyard > 0 {
            ctx.registry.trim_graveyard(max_graveyard);
        }
        let moved = move_entities(&mut ctx);
        let hits = move_projectiles(&mut self.projectiles, &mut ctx);
        let pushes = resolve_solids(&mut ctx);

        let applied = ctx.timeline.run_due(ctx.registry);
        for effect in &applied {
            let description = format!(
                "{} affected {} of {} target(s)",
                effect.name,
                effect.affected,
                effect.targets.len()
            );
            ctx.emit(
                SimEventKind::EffectApplied {
                    effect: effect.name.clone(),
                    targets: effect.targets.clone(),
                    affected: effect.affected,
                },
                description,
            );
        }

        let report = TickReport {
            tick,
            elapsed,
            reaped,
            moved,
            hits,
            pushes,
            effects_applied: applied.len(),
        };
        tracing::trace!(?report, "tick finished");
        report
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Live entities and the dead set.
    pub fn registry(&self) -> &EntityRegistry<R> {
        &self.registry
    }

    /// Static solids.
    pub fn map(&self) -> &Map<R> {
        &self.map
    }

    /// Live projectiles in insertion order.
    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile<R>)> {
        self.projectiles.iter().map(|t| (t.id, &t.projectile))
    }

    /// Look up a live projectile.
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile<R>> {
        self.projectiles
            .iter()
            .find(|t| t.id == id)
            .map(|t| &t.projectile)
    }

    /// Number of projectiles still in flight.
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Effects waiting for their due time.
    pub fn timeline(&self) -> &Timeline<R> {
        &self.timeline
    }

    /// Mutable timeline access, for scheduling effects from outside a tick.
    pub fn timeline_mut(&mut self) -> &mut Timeline<R> {
        &mut self.timeline
    }

    /// Everything that has happened so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Simulation time.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Handle of the player-controlled entity. Stops resolving once the
    /// player has been reaped.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::HitPolicy;
    use rift_core::{Damage, Kill, Vec2};

    fn disc(x: f64, y: f64, r: f64) -> Shape {
        Shape::circle(Vec2::new(x, y), r).unwrap()
    }

    fn world() -> World {
        let player = Entity::new("Player").with_region(disc(0.0, 0.0, 1.0)).with_health(100.0);
        World::new(player, Map::default(), SimConfig::default().with_fixed_step(0.1)).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let player = Entity::new("Player").with_region(disc(0.0, 0.0, 1.0));
        let result = World::new(player, Map::default(), SimConfig::default().with_fixed_step(-0.1));
        assert!(result.is_err());
    }

    #[test]
    fn tick_uses_clock_step() {
        let mut w = world();
        let report = w.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(report.elapsed, 0.1);
        assert_eq!(w.current_tick(), 1);
    }

    #[test]
    fn entities_and_projectiles_share_elapsed_time() {
        let mut w = world();
        let walker = w.spawn(
            Entity::new("Walker")
                .with_region(disc(100.0, 0.0, 1.0))
                .with_motion(Vec2::new(1.0, 0.0), 10.0),
        );
        let pid = w.add_projectile(Projectile::new(
            Vec2::new(-100.0, 0.0),
            Vec2::new(1.0, 0.0),
            10.0,
        ));
        w.step(0.5);
        let walker_x = w.registry().get(walker).unwrap().region().unwrap().center().x;
        let shot_x = w.projectile(pid).unwrap().position.x;
        assert_eq!(walker_x - 100.0, shot_x + 100.0);
    }

    #[test]
    fn projectile_ids_are_sequential() {
        let mut w = world();
        let a = w.add_projectile(Projectile::new(Vec2::ZERO, Vec2::ZERO, 0.0));
        let b = w.add_projectile(Projectile::new(Vec2::ZERO, Vec2::ZERO, 0.0));
        assert_eq!(a, ProjectileId(1));
        assert_eq!(b, ProjectileId(2));
        assert_eq!(w.projectile_count(), 2);
    }

    #[test]
    fn effects_run_at_end_of_tick_and_deaths_reaped_next_tick() {
        let mut w = world();
        let grunt = w.spawn(Entity::new("Grunt").with_region(disc(5.0, 0.0, 1.0)).with_health(10.0));
        w.add_projectile(
            Projectile::new(Vec2::new(5.0, 0.0), Vec2::ZERO, 0.0).with_effect(Box::new(Kill::new())),
        );

        let first = w.step(0.1);
        assert_eq!(first.hits, 1);
        assert_eq!(first.effects_applied, 1);
        assert!(first.reaped.is_empty());
        // Dead, but still in the live set until the next tick starts.
        assert!(!w.registry().get(grunt).unwrap().is_alive());

        let second = w.step(0.1);
        assert_eq!(second.reaped, vec![grunt]);
        assert!(w.registry().get(grunt).is_none());
        assert!(w.registry().entities_in_region(&disc(5.0, 0.0, 2.0)).is_empty());
    }

    #[test]
    fn enemy_projectile_damages_player() {
        let mut w = world();
        let enemy = w.spawn(Entity::new("Archer").with_region(disc(10.0, 0.0, 1.0)).with_health(10.0));
        w.add_projectile(
            Projectile::new(Vec2::new(10.0, 0.0), Vec2::new(-1.0, 0.0), 10.0)
                .with_source(enemy)
                .with_policy(HitPolicy::PlayerOnly)
                .with_effect(Box::new(Damage::new(25.0))),
        );
        w.run(12);
        let player = w.registry().get(w.player()).unwrap();
        assert_eq!(player.lives.as_ref().unwrap().health, 75.0);
        assert_eq!(w.projectile_count(), 0);
    }

    #[test]
    fn kill_defers_removal_to_next_tick() {
        let mut w = world();
        let grunt = w.spawn(Entity::new("Grunt").with_region(disc(5.0, 0.0, 1.0)).with_health(10.0));
        w.kill(grunt).unwrap();
        assert!(w.registry().contains(grunt));
        assert_eq!(w.step(0.1).reaped, vec![grunt]);
        assert!(matches!(w.kill(grunt), Err(SimError::Core(CoreError::EntityNotFound(_)))));
    }

    #[test]
    fn kill_requires_lives() {
        let mut w = world();
        let rock = w.spawn(Entity::new("Rock").with_region(disc(5.0, 0.0, 1.0)));
        assert!(matches!(w.kill(rock), Err(SimError::NotMortal(_))));
    }

    #[test]
    fn bury_removes_immediately() {
        let mut w = world();
        let grunt = w.spawn(Entity::new("Grunt").with_region(disc(5.0, 0.0, 1.0)));
        w.bury(grunt).unwrap();
        assert!(!w.registry().contains(grunt));
        assert_eq!(w.registry().graveyard().len(), 1);
        assert!(w.bury(grunt).is_err());
    }

    #[test]
    fn invalid_step_does_not_move_anything() {
        let mut w = world();
        let walker = w.spawn(
            Entity::new("Walker")
                .with_region(disc(20.0, 0.0, 1.0))
                .with_motion(Vec2::new(1.0, 0.0), 5.0),
        );
        let pid = w.add_projectile(
            Projectile::new(Vec2::new(-10.0, 5.0), Vec2::ZERO, 4.0).with_target(Vec2::new(-10.0, 50.0)),
        );

        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let report = w.step(bad);
            assert_eq!(report.elapsed, 0.0);
            let shot = w.projectile(pid).unwrap().position;
            assert!(shot.x.is_finite() && shot.y.is_finite());
            assert_eq!(shot, Vec2::new(-10.0, 5.0));
            let at = w.registry().get(walker).unwrap().region().unwrap().center();
            assert_eq!(at, Vec2::new(20.0, 0.0));
        }
        assert_eq!(w.current_tick(), 3);
        assert_eq!(w.clock().elapsed_total(), 0.0);
        assert_eq!(w.timeline().now(), 0.0);

        // Time still flows normally afterwards.
        w.step(1.0);
        assert_eq!(w.projectile(pid).unwrap().position, Vec2::new(-10.0, 9.0));
    }

    #[test]
    fn graveyard_capped_by_config() {
        let player = Entity::new("Player").with_region(disc(0.0, 0.0, 1.0)).with_health(100.0);
        let config = SimConfig::default().with_fixed_step(0.1).with_max_graveyard(2);
        let mut w = World::new(player, Map::default(), config).unwrap();
        let grunts: Vec<_> = (0..3)
            .map(|i| {
                w.spawn(
                    Entity::new(format!("Grunt {i}"))
                        .with_region(disc(10.0 + i as f64 * 5.0, 0.0, 1.0))
                        .with_health(10.0),
                )
            })
            .collect();
        for &g in &grunts {
            w.kill(g).unwrap();
        }

        let report = w.step(0.1);
        assert_eq!(report.reaped.len(), 3);
        // Every death is reported even though only the newest two are kept.
        assert_eq!(
            w.events()
                .count(|k| matches!(k, SimEventKind::EntityReaped { .. })),
            3
        );
        let kept: Vec<_> = w.registry().graveyard().iter().map(|(id, _)| *id).collect();
        assert_eq!(kept, report.reaped[1..].to_vec());

        let drained = w.drain_graveyard();
        assert_eq!(drained.len(), 2);
        assert!(w.registry().graveyard().is_empty());
    }

    #[test]
    fn debug_output_summarizes() {
        let w = world();
        let debug = format!("{w:?}");
        assert!(debug.contains("entities: 1"));
    }
}
