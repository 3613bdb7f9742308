//! Core game state: configuration, geometry and the per-tick orchestration.

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod geometry;
pub mod tick;

pub use config::*;
pub use error::*;
pub use game::*;
pub use geometry::*;
pub use tick::*;
