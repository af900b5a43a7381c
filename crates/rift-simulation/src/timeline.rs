use rift_core::{Effect, EntityId, EntityRegistry, Region};

/// An effect waiting for its due time.
#[derive(Debug)]
struct Scheduled<R: Region> {
    due: f64,
    effect: Box<dyn Effect<R>>,
}

/// Outcome of one applied effect.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEffect {
    /// The effect's name.
    pub name: String,
    /// The entities the effect was aimed at.
    pub targets: Vec<EntityId>,
    /// How many targets were actually affected.
    pub affected: usize,
}

/// Deferred effect queue driven by simulation time.
///
/// Effects are never applied at the moment they are scheduled. A delay of
/// zero means "at the end of the current tick", after every phase of the
/// tick has finished; longer delays are measured in simulated seconds.
#[derive(Debug)]
pub struct Timeline<R: Region> {
    now: f64,
    queue: Vec<Scheduled<R>>,
}

impl<R: Region> Default for Timeline<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Region> Timeline<R> {
    /// An empty queue at time zero.
    pub fn new() -> Self {
        Self {
            now: 0.0,
            queue: Vec::new(),
        }
    }

    /// Move simulated time forward at the start of a tick.
    pub fn advance(&mut self, elapsed: f64) {
        self.now += elapsed;
    }

    /// Current simulated time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queue `effect` to run `delay` seconds from now.
    pub fn schedule(&mut self, effect: Box<dyn Effect<R>>, delay: f64) {
        let due = self.now + delay.max(0.0);
        tracing::trace!(effect = effect.name(), due, "scheduled effect");
        self.queue.push(Scheduled { due, effect });
    }

    /// Number of effects still waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every effect whose due time has been reached, in the order they
    /// were scheduled. Effects not yet due stay queued.
    pub fn run_due(&mut self, registry: &mut EntityRegistry<R>) -> Vec<AppliedEffect> {
        let now = self.now;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|s| s.due <= now);
        self.queue = waiting;

        due.into_iter()
            .map(|mut scheduled| {
                let affected = scheduled.effect.apply(registry);
                AppliedEffect {
                    name: scheduled.effect.name().to_string(),
                    targets: scheduled.effect.targets().to_vec(),
                    affected,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_core::{Damage, Entity, Shape, Vec2};

    fn setup() -> (Timeline<Shape>, EntityRegistry<Shape>, EntityId) {
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(
            Entity::new("Target")
                .with_region(Shape::circle(Vec2::ZERO, 1.0).unwrap())
                .with_health(10.0),
        );
        (Timeline::new(), reg, id)
    }

    fn damage(id: EntityId, amount: f64) -> Box<dyn Effect<Shape>> {
        let mut effect: Box<dyn Effect<Shape>> = Box::new(Damage::new(amount));
        effect.set_targets(vec![id]);
        effect
    }

    fn health(reg: &EntityRegistry<Shape>, id: EntityId) -> f64 {
        reg.get(id).unwrap().lives.as_ref().unwrap().health
    }

    #[test]
    fn zero_delay_waits_for_run_due() {
        let (mut tl, mut reg, id) = setup();
        tl.schedule(damage(id, 2.0), 0.0);
        assert_eq!(health(&reg, id), 10.0);
        assert_eq!(tl.pending(), 1);

        let applied = tl.run_due(&mut reg);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, "damage");
        assert_eq!(applied[0].affected, 1);
        assert_eq!(health(&reg, id), 8.0);
        assert_eq!(tl.pending(), 0);
    }

    #[test]
    fn delayed_effect_runs_once_time_has_passed() {
        let (mut tl, mut reg, id) = setup();
        tl.schedule(damage(id, 1.0), 0.5);

        tl.advance(0.25);
        assert!(tl.run_due(&mut reg).is_empty());
        assert_eq!(tl.pending(), 1);

        tl.advance(0.25);
        assert_eq!(tl.run_due(&mut reg).len(), 1);
        assert_eq!(health(&reg, id), 9.0);
    }

    #[test]
    fn due_effects_run_in_schedule_order() {
        let (mut tl, mut reg, id) = setup();
        tl.schedule(damage(id, 1.0), 0.0);
        tl.schedule(damage(id, 100.0), 0.0);
        tl.schedule(damage(id, 1.0), 0.0);

        let applied = tl.run_due(&mut reg);
        // The second application kills the target, so the third has nothing to do.
        let affected: Vec<_> = applied.iter().map(|a| a.affected).collect();
        assert_eq!(affected, vec![1, 1, 0]);
    }
}
