//! Enemy templates, pooled instances and their per-tick behavior.

pub mod data;
pub mod logic;
pub mod pools;
pub mod types;

pub use data::*;
pub use logic::*;
pub use pools::*;
pub use types::*;
