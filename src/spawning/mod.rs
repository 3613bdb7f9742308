//! Wave spawning and the stage boss.

pub mod boss;
pub mod data;
pub mod wave;

pub use boss::*;
pub use data::*;
pub use wave::*;
