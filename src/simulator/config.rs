//! Simulation configuration.

use crate::core::constants::TICK_INTERVAL_MS;

/// Configuration for a simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Combat runs played back to back on one save.
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Seconds per run before it is abandoned.
    pub max_seconds_per_run: f64,

    /// Tick length in seconds.
    pub dt: f64,

    /// Stage to start on; clamped to the unlocked stage.
    pub start_stage: u32,

    /// Spend currency on the cheapest affordable upgrade between runs.
    pub auto_buy: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 20,
            seed: None,
            max_seconds_per_run: 300.0,
            dt: TICK_INTERVAL_MS as f64 / 1000.0,
            start_stage: 1,
            auto_buy: false,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Short run count for a quick balance check.
    pub fn quick() -> Self {
        Self {
            num_runs: 5,
            max_seconds_per_run: 120.0,
            ..Default::default()
        }
    }

    /// Long meta-progression check with upgrade purchases.
    pub fn progression() -> Self {
        Self {
            num_runs: 100,
            auto_buy: true,
            ..Default::default()
        }
    }

    pub fn max_ticks_per_run(&self) -> u64 {
        if self.dt <= 0.0 {
            return 0;
        }
        (self.max_seconds_per_run / self.dt).ceil() as u64
    }
}
