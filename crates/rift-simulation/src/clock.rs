use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Where a tick's elapsed time comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClockMode {
    /// Every tick advances by the same number of seconds.
    Fixed {
        /// Seconds per tick.
        step: f64,
    },
    /// Each tick advances by the wall time since the previous tick.
    Wall,
}

impl Default for ClockMode {
    fn default() -> Self {
        Self::Fixed { step: 1.0 / 60.0 }
    }
}

/// Tracks simulation time: a monotonic tick counter and the total simulated
/// seconds.
///
/// Elapsed time is sampled once per tick and shared by every phase of that
/// tick, so entities and projectiles always move on the same time base.
#[derive(Debug, Clone)]
pub struct SimClock {
    mode: ClockMode,
    tick: u64,
    elapsed_total: f64,
    last_elapsed: f64,
    last_instant: Instant,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            tick: 0,
            elapsed_total: 0.0,
            last_elapsed: 0.0,
            last_instant: Instant::now(),
        }
    }

    /// Start a new tick and return its elapsed seconds.
    pub fn advance(&mut self) -> f64 {
        let elapsed = match self.mode {
            ClockMode::Fixed { step } => step,
            ClockMode::Wall => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_instant).as_secs_f64();
                self.last_instant = now;
                elapsed
            }
        };
        self.advance_by(elapsed)
    }

    /// Start a new tick with an explicit elapsed time, bypassing the mode.
    ///
    /// A negative or non-finite `elapsed` is replaced by zero: the tick still
    /// counts, but simulated time does not move.
    pub fn advance_by(&mut self, elapsed: f64) -> f64 {
        let elapsed = if elapsed.is_finite() && elapsed >= 0.0 {
            elapsed
        } else {
            tracing::warn!(elapsed, tick = self.tick + 1, "ignoring invalid elapsed time");
            0.0
        };
        self.tick += 1;
        self.elapsed_total += elapsed;
        self.last_elapsed = elapsed;
        elapsed
    }

    /// Current tick number. Zero before the first tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds elapsed during the most recent tick.
    pub fn last_elapsed(&self) -> f64 {
        self.last_elapsed
    }

    /// Total simulated seconds since the clock was created.
    pub fn elapsed_total(&self) -> f64 {
        self.elapsed_total
    }

    /// Where per-tick elapsed time comes from.
    pub fn mode(&self) -> ClockMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = SimClock::new(ClockMode::default());
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed_total(), 0.0);
    }

    #[test]
    fn fixed_clock_advances_by_step() {
        let mut clock = SimClock::new(ClockMode::Fixed { step: 0.25 });
        assert_eq!(clock.advance(), 0.25);
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick(), 3);
        assert!((clock.elapsed_total() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn advance_by_overrides_mode() {
        let mut clock = SimClock::new(ClockMode::Fixed { step: 0.25 });
        assert_eq!(clock.advance_by(2.0), 2.0);
        assert_eq!(clock.last_elapsed(), 2.0);
        assert_eq!(clock.tick(), 1);
    }

    #[test]
    fn invalid_elapsed_counts_as_zero() {
        let mut clock = SimClock::new(ClockMode::Fixed { step: 0.25 });
        clock.advance();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1.0] {
            assert_eq!(clock.advance_by(bad), 0.0);
            assert_eq!(clock.last_elapsed(), 0.0);
        }
        assert_eq!(clock.tick(), 5);
        assert_eq!(clock.elapsed_total(), 0.25);
    }

    #[test]
    fn wall_clock_is_non_negative() {
        let mut clock = SimClock::new(ClockMode::Wall);
        let first = clock.advance();
        let second = clock.advance();
        assert!(first >= 0.0);
        assert!(second >= 0.0);
        assert_eq!(clock.tick(), 2);
    }
}
