use std::fs;
use std::path::Path;

use colored::Colorize;

use crate::error::{CliError, CliResult};
use crate::scenario::Scenario;

pub fn run(seed: u64, enemies: usize, step: f64, output: Option<&Path>) -> CliResult<()> {
    let scenario = Scenario::generate(seed, enemies, step);
    let json = scenario.to_json()?;

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n")).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            println!(
                "  {} '{}' -> {}",
                "Generated".green().bold(),
                scenario.title(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
