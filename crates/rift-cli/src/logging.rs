//! Tracing subscriber setup for the binary.

use std::env;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Our crates log at info, everything else at warn.
const DEFAULT_FILTER: &str = "warn,rift_core=info,rift_simulation=info";

/// With `--verbose`, our crates log at debug.
const VERBOSE_FILTER: &str = "warn,rift_core=debug,rift_simulation=debug,rift_cli=debug";

/// Install a compact stderr subscriber. `RUST_LOG` directives are appended
/// to the default filter, so they override it per target.
pub fn init(verbose: bool) {
    let mut filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr);

    let subscriber = Registry::default().with(EnvFilter::new(filter)).with(layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a tracing subscriber was already installed");
    }
}
