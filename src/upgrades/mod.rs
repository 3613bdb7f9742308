//! The upgrade forest: cost formulas, nodes, purchases and the shipped catalog.

pub mod data;
pub mod formula;
pub mod tree;
pub mod types;

pub use data::*;
pub use formula::*;
pub use tree::*;
pub use types::*;
