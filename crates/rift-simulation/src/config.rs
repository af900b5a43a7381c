use serde::{Deserialize, Serialize};

use crate::clock::ClockMode;
use crate::error::{SimError, SimResult};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Source of per-tick elapsed time.
    pub clock: ClockMode,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Maximum number of dead entities kept for inspection (oldest dropped
    /// first). 0 = unlimited.
    pub max_graveyard: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock: ClockMode::default(),
            max_events: 0,
            max_graveyard: 0,
        }
    }
}

impl SimConfig {
    /// Advance every tick by a fixed number of seconds.
    pub fn with_fixed_step(mut self, step: f64) -> Self {
        self.clock = ClockMode::Fixed { step };
        self
    }

    /// Advance every tick by the wall time since the previous tick.
    pub fn with_wall_clock(mut self) -> Self {
        self.clock = ClockMode::Wall;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set how many dead entities are kept (0 = unlimited).
    pub fn with_max_graveyard(mut self, max: usize) -> Self {
        self.max_graveyard = max;
        self
    }

    /// Reject configurations that cannot drive a simulation.
    pub fn validate(&self) -> SimResult<()> {
        match self.clock {
            ClockMode::Fixed { step } if !step.is_finite() || step < 0.0 => {
                Err(SimError::InvalidConfig(format!(
                    "fixed step must be a finite, non-negative number of seconds (got {step})"
                )))
            }
            _ => Ok(()),
        }
    }
}
