//! Jetbridge Core - Boarding Synchronization Engine
//!
//! Converges an aircraft's actual seat occupancy and cargo load toward
//! externally-set targets under three drivers: manual time-paced boarding,
//! instant loading, and GSX ground-service synchronization.
//!
//! # Architecture
//!
//! Stations live in an Entity Component System world via `hecs`:
//! - **Entities**: passenger zones and cargo holds
//! - **Components**: pure data ([`components::PaxZone`], [`components::CargoHold`])
//! - **Systems**: reconciliation logic that queries and updates components
//!
//! The engine is tick-driven and single-threaded: the host invokes
//! [`engine::BoardingEngine::update`] once per frame with the elapsed time
//! and a [`bridge::VariableStore`] giving access to the host's named
//! variables. Exactly one reconciliation step runs per tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use jetbridge_core::prelude::*;
//!
//! let mut engine = BoardingEngine::with_cabin(&CabinConfig::default(), EngineConfig::default());
//! let mut vars = InMemoryVars::new();
//! engine.init_vars(&mut vars);
//!
//! // Host frame loop
//! loop {
//!     engine.update(&mut vars, 16.7); // ~60 FPS
//! }
//! ```

pub mod bridge;
pub mod components;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::bridge::{InMemoryVars, VariableStore};
    pub use crate::components::*;
    pub use crate::engine::{BoardingEngine, EngineConfig};
    pub use crate::generation::{CabinConfig, CabinLayout};
    pub use crate::systems::StepResult;
}
