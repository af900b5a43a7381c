//! Headless scenario runner for the rift simulation core.

mod commands;
mod error;
mod logging;
mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rift",
    about = "rift: run projectile and collision scenarios headlessly",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario for a number of ticks and print a summary
    Run {
        /// Scenario JSON file (default: a generated skirmish)
        scenario: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,

        /// RNG seed used when no scenario file is given
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Grunts in the generated skirmish
        #[arg(short, long, default_value = "5")]
        enemies: usize,

        /// Fixed seconds per tick, overriding the scenario's clock
        #[arg(long)]
        step: Option<f64>,

        /// Show every event and debug logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a seeded skirmish scenario as JSON
    Generate {
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of grunts
        #[arg(short, long, default_value = "5")]
        enemies: usize,

        /// Fixed seconds per tick
        #[arg(long, default_value = "0.1")]
        step: f64,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    logging::init(verbose);

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            seed,
            enemies,
            step,
            verbose,
        } => commands::run::run(&commands::run::RunOptions {
            scenario: scenario.as_deref(),
            ticks,
            seed,
            enemies,
            step,
            verbose,
        })?,
        Commands::Generate {
            seed,
            enemies,
            step,
            output,
        } => commands::generate::run(seed, enemies, step, output.as_deref())?,
    }
    Ok(())
}
