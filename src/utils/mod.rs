//! Utility modules: save persistence.

pub mod persistence;

pub use persistence::*;
