//! Component definitions for the boarding simulation.
//!
//! Components are pure data structs attached to station entities.
//! Reconciliation logic lives in systems; components only carry the small
//! local operations a single station can answer about itself.

mod session;
mod stations;

pub use session::*;
pub use stations::*;
