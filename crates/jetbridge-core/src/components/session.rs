//! Boarding session state - one per flight/ground-service cycle.

use jetbridge_logic::lifecycle::BoardingPhase;
use serde::{Deserialize, Serialize};

/// Which reconciliation algorithm runs this tick. Derived from host
/// variables every frame, never stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardingMode {
    /// No boarding driver active; the paced accumulator is held at zero.
    Idle,
    /// Rate-limited single-unit stepping.
    ManualPaced,
    /// Targets applied in a single step.
    Instant,
    /// Driven by the external ground-service progress feed.
    GsxSynchronized,
}

/// Cross-tick boarding bookkeeping.
///
/// Everything the reconciliation algorithms remember between frames lives
/// here, explicitly - there is no hidden module-level state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardingSession {
    /// Paced-mode accumulator; reset whenever a paced step commits and
    /// whenever the engine is idle.
    pub elapsed_ms: f64,
    /// Coarse lifecycle, re-derived from aggregates each tick.
    pub phase: BoardingPhase,
    /// Set while user-initiated boarding is in progress; drives the
    /// edge-triggered completion chime.
    pub was_boarding: bool,
    /// Last cumulative GSX passenger counter seen (boarding and deboarding
    /// share one feed; the two services never perform simultaneously).
    pub last_gsx_pax_total: i64,
    /// Last GSX deboard cargo percentage applied. The feed repeats values
    /// across polls; the drain is applied once per distinct reading.
    pub last_cargo_deboard_percent: f64,
}

impl BoardingSession {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0.0,
            phase: BoardingPhase::Finished,
            was_boarding: false,
            last_gsx_pax_total: 0,
            last_cargo_deboard_percent: 0.0,
        }
    }
}

impl Default for BoardingSession {
    fn default() -> Self {
        Self::new()
    }
}
