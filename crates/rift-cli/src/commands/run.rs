use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rift_core::{Entity, Region, Shape};
use rift_simulation::{ClockMode, SimEventKind, TickReport, World};

use crate::error::CliResult;
use crate::scenario::Scenario;

/// Options for a `rift run` invocation.
pub struct RunOptions<'a> {
    pub scenario: Option<&'a Path>,
    pub ticks: u64,
    pub seed: u64,
    pub enemies: usize,
    pub step: Option<f64>,
    pub verbose: bool,
}

pub fn run(opts: &RunOptions<'_>) -> CliResult<()> {
    let mut scenario = match opts.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::generate(opts.seed, opts.enemies, opts.step.unwrap_or(0.1)),
    };
    if let Some(step) = opts.step {
        scenario.config.clock = ClockMode::Fixed { step };
    }

    let (mut world, _) = scenario.build()?;
    let reports = world.run(opts.ticks);

    // Header
    let step_label = match scenario.config.clock {
        ClockMode::Fixed { step } => format!("{step}s/tick"),
        ClockMode::Wall => "wall clock".to_string(),
    };
    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        scenario.title(),
        format!("({} ticks, {step_label})", opts.ticks).dimmed()
    );
    print_totals(&world, &reports);
    println!();

    // Events
    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in world.events().events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if world.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let removed: Vec<_> = world
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::EntityReaped { .. }))
            .collect();
        if !removed.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in removed {
                println!("  {} {}", "REMOVED".red().bold(), event.description);
            }
            println!();
        }
    }

    println!("  {}", "Entities".bold().underline());
    println!();
    println!("{}", entity_table(&world));
    println!();

    Ok(())
}

fn print_totals(world: &World, reports: &[TickReport]) {
    let hits: u32 = reports.iter().map(|r| r.hits).sum();
    let pushes: usize = reports.iter().map(|r| r.pushes).sum();
    let effects: usize = reports.iter().map(|r| r.effects_applied).sum();
    let removed: usize = reports.iter().map(|r| r.reaped.len()).sum();
    println!("  {hits} hits, {effects} effects applied, {pushes} pushes, {removed} removed");
    println!(
        "  {} projectiles in flight, {} effects pending, {:.2}s simulated",
        world.projectile_count(),
        world.timeline().pending(),
        world.clock().elapsed_total()
    );
}

fn entity_table(world: &World) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Entity", "Health", "Position", "Status"]);

    let player = world.player();
    for (id, entity) in world.registry().iter() {
        let status = if entity.is_alive() {
            "alive".green().to_string()
        } else {
            "dead".red().to_string()
        };
        table.add_row(row(id == player, &entity.name, health(entity), entity.region(), status));
    }
    for (id, entity) in world.registry().graveyard() {
        table.add_row(row(
            *id == player,
            &entity.name,
            health(entity),
            entity.region(),
            "removed".dimmed().to_string(),
        ));
    }
    table
}

fn health(entity: &Entity<Shape>) -> String {
    entity
        .lives
        .as_ref()
        .map(|l| format!("{:.1}", l.health))
        .unwrap_or_else(|| "--".to_string())
}

fn row(is_player: bool, name: &str, health: String, region: Option<&Shape>, status: String) -> Vec<String> {
    let name = if is_player {
        format!("{name} (player)")
    } else {
        name.to_string()
    };
    let position = region
        .map(|r| r.center().to_string())
        .unwrap_or_else(|| "--".to_string());
    vec![name, health, position, status]
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::EntityReaped { .. } => description.red().bold(),
        SimEventKind::ProjectileHit { .. } => description.yellow(),
        SimEventKind::ProjectileArrived { .. } | SimEventKind::ProjectileSpent { .. } => {
            description.dimmed()
        }
        SimEventKind::EntityPushed { .. } => description.blue(),
        SimEventKind::EffectApplied { .. } => description.cyan(),
    }
}
