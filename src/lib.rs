//! Slime Breach - idle arena combat and upgrade economy.
//!
//! The crate holds the game rules with no rendering: an upgrade forest bought
//! with four currencies, a derived stat table, pooled enemies spawned in
//! stage waves with a timed boss, an automatic area attack with reflected
//! damage, and currency drops that fly to the player.
//!
//! [`core::Game`] ties it together. Hosts feed it a time step and a pointer
//! each frame and render the [`core::TickEvent`]s it returns.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod pool;
pub mod progression;
pub mod simulator;
pub mod spawning;
pub mod stats;
pub mod upgrades;
pub mod utils;
