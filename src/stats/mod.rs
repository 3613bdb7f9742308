//! Player stats, currency balances and experience.

pub mod leveling;
pub mod types;

pub use leveling::*;
pub use types::*;
