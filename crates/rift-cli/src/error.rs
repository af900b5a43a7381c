use std::path::PathBuf;

use miette::Diagnostic;
use rift_core::CoreError;
use rift_simulation::SimError;

pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the user by the `rift` binary.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CliError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(rift::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    #[diagnostic(code(rift::io))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid scenario", path.display())]
    #[diagnostic(
        code(rift::scenario::parse),
        help("scenarios are JSON; run `rift generate` for a starting point")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    #[diagnostic(code(rift::scenario::invalid))]
    Scenario(String),

    #[error(transparent)]
    #[diagnostic(code(rift::core))]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(code(rift::simulation))]
    Sim(#[from] SimError),

    #[error("cannot serialize scenario")]
    #[diagnostic(code(rift::scenario::serialize))]
    Serialize(#[source] serde_json::Error),
}
