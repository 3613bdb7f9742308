//! Combat: damage math, the player resolver and currency drops.

pub mod drops;
pub mod logic;
pub mod math;
pub mod types;

pub use drops::*;
pub use logic::*;
pub use math::*;
pub use types::*;
