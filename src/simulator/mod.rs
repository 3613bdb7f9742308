//! Headless balance simulator.
//!
//! Plays whole combat runs back to back through [`Game`](crate::core::Game)
//! with an in-memory save, optionally spending currency between runs, to
//! check how quickly a build clears stages:
//! - Kills, deaths and boss victories per run
//! - Currency income per second
//! - Stage reached and upgrades bought

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunOutcome, RunStats, SimReport};
pub use runner::run_simulation;
