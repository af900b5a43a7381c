//! JSON scenario files: the world layout a run starts from.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use rift_core::{Damage, Effect, Entity, EntityId, Kill, Map, Push, Shape, Vec2};
use rift_simulation::{HitPolicy, Projectile, SimConfig, World};

use crate::error::{CliError, CliResult};

/// A complete scenario: configuration, entities, static solids, and the
/// projectiles and effects in flight at tick 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: SimConfig,
    pub player: EntitySpec,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub solids: Vec<Shape>,
    #[serde(default)]
    pub projectiles: Vec<ProjectileSpec>,
    #[serde(default)]
    pub scheduled: Vec<ScheduledSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSpec {
    pub velocity: Vec2,
    pub speed: f64,
}

/// Refers to the player or to an entry of `entities` by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    Player,
    Entity(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSpec {
    Damage { amount: f64 },
    Kill,
    Push { offset: Vec2 },
}

impl EffectSpec {
    fn build(&self) -> Box<dyn Effect<Shape>> {
        match self {
            EffectSpec::Damage { amount } => Box::new(Damage::new(*amount)),
            EffectSpec::Kill => Box::new(Kill::new()),
            EffectSpec::Push { offset } => Box::new(Push::new(*offset)),
        }
    }
}

fn default_max_hit() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EntityRef>,
    #[serde(default = "default_max_hit")]
    pub max_hit: u32,
    #[serde(default)]
    pub policy: HitPolicy,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

/// An effect queued on the timeline before the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSpec {
    pub effect: EffectSpec,
    pub targets: Vec<EntityRef>,
    #[serde(default)]
    pub delay: f64,
}

impl EntitySpec {
    fn build(&self) -> CliResult<Entity<Shape>> {
        let mut entity = Entity::new(self.name.clone());
        if let Some(region) = &self.region {
            region.validate()?;
            entity = entity.with_region(region.clone());
        }
        if let Some(health) = self.health {
            entity = entity.with_health(health);
        }
        if let Some(motion) = self.motion {
            entity = entity.with_motion(motion.velocity, motion.speed);
        }
        Ok(entity)
    }
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> CliResult<String> {
        serde_json::to_string_pretty(self).map_err(CliError::Serialize)
    }

    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("untitled")
    }

    /// Build a world from the scenario. Returns the world and the handles of
    /// `entities`, in file order.
    pub fn build(&self) -> CliResult<(World, Vec<EntityId>)> {
        for solid in &self.solids {
            solid.validate()?;
        }
        let map = Map::new(self.solids.clone());
        let mut world = World::new(self.player.build()?, map, self.config.clone())?;
        let ids = self
            .entities
            .iter()
            .map(|spec| spec.build().map(|e| world.spawn(e)))
            .collect::<CliResult<Vec<_>>>()?;

        let resolve = |r: EntityRef, what: &str| -> CliResult<EntityId> {
            match r {
                EntityRef::Player => Ok(world.player()),
                EntityRef::Entity(i) => ids.get(i).copied().ok_or_else(|| {
                    CliError::Scenario(format!(
                        "{what} refers to entity {i}, but only {} exist",
                        ids.len()
                    ))
                }),
            }
        };

        let mut projectiles = Vec::with_capacity(self.projectiles.len());
        for (n, spec) in self.projectiles.iter().enumerate() {
            if !spec.speed.is_finite() || spec.speed < 0.0 {
                return Err(CliError::Scenario(format!(
                    "projectile {n} has speed {}",
                    spec.speed
                )));
            }
            let mut projectile = Projectile::new(spec.position, spec.velocity, spec.speed)
                .with_max_hit(spec.max_hit)
                .with_policy(spec.policy);
            if let Some(target) = spec.target {
                projectile = projectile.with_target(target);
            }
            if let Some(source) = spec.source {
                projectile = projectile.with_source(resolve(source, &format!("projectile {n}"))?);
            }
            for effect in &spec.effects {
                projectile = projectile.with_effect(effect.build());
            }
            projectiles.push(projectile);
        }

        let mut scheduled = Vec::with_capacity(self.scheduled.len());
        for (n, spec) in self.scheduled.iter().enumerate() {
            let targets = spec
                .targets
                .iter()
                .map(|&r| resolve(r, &format!("scheduled effect {n}")))
                .collect::<CliResult<Vec<_>>>()?;
            let mut effect = spec.effect.build();
            effect.set_targets(targets);
            scheduled.push((effect, spec.delay));
        }

        for projectile in projectiles {
            world.add_projectile(projectile);
        }
        for (effect, delay) in scheduled {
            world.timeline_mut().schedule(effect, delay);
        }

        tracing::info!(
            scenario = self.title(),
            entities = ids.len(),
            solids = self.solids.len(),
            projectiles = self.projectiles.len(),
            "scenario loaded"
        );
        Ok((world, ids))
    }

    /// A seeded skirmish: the player at the origin, `enemies` grunts in a ring
    /// around it, a few walls, one homing shot from the player at each grunt
    /// and one return shot from every other grunt.
    pub fn generate(seed: u64, enemies: usize, step: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let player = EntitySpec {
            name: "Player".into(),
            region: Some(Shape::Circle {
                center: Vec2::ZERO,
                radius: 1.0,
            }),
            health: Some(100.0),
            motion: None,
        };

        let mut entities = Vec::with_capacity(enemies);
        let mut projectiles = Vec::new();
        for i in 0..enemies {
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let distance = rng.random_range(6.0..20.0);
            let center = Vec2::new(angle.cos(), angle.sin()) * distance;
            let advancing = rng.random_bool(0.5);
            entities.push(EntitySpec {
                name: format!("Grunt {}", i + 1),
                region: Some(Shape::Circle {
                    center,
                    radius: rng.random_range(0.5..1.5),
                }),
                health: Some(f64::from(rng.random_range(10_u32..=30))),
                motion: advancing.then(|| MotionSpec {
                    velocity: (-center).normalize(),
                    speed: rng.random_range(0.5..2.0),
                }),
            });

            projectiles.push(ProjectileSpec {
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                speed: 20.0,
                target: Some(center),
                source: Some(EntityRef::Player),
                max_hit: 1,
                policy: HitPolicy::World,
                effects: vec![EffectSpec::Damage {
                    amount: f64::from(rng.random_range(5_u32..=20)),
                }],
            });
            if i % 2 == 1 {
                projectiles.push(ProjectileSpec {
                    position: center,
                    velocity: (-center).normalize(),
                    speed: 8.0,
                    target: None,
                    source: Some(EntityRef::Entity(i)),
                    max_hit: 1,
                    policy: HitPolicy::PlayerOnly,
                    effects: vec![EffectSpec::Damage { amount: 10.0 }],
                });
            }
        }

        let walls = rng.random_range(1..=3);
        let solids = (0..walls)
            .map(|_| {
                let x = rng.random_range(-25.0..20.0);
                let y = rng.random_range(-25.0..20.0);
                let w = rng.random_range(1.0..5.0);
                let h = rng.random_range(1.0..5.0);
                Shape::Rect {
                    min: Vec2::new(x, y),
                    max: Vec2::new(x + w, y + h),
                }
            })
            .collect();

        Self {
            name: Some(format!("skirmish-{seed}")),
            config: SimConfig::default().with_fixed_step(step).with_max_events(1000),
            player,
            entities,
            solids,
            projectiles,
            scheduled: Vec::new(),
        }
    }
}
