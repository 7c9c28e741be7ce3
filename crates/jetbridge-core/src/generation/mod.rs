//! Generation - construction of the cabin station topology.

mod cabin;

pub use cabin::*;
