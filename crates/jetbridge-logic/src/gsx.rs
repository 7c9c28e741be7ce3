//! Ground-service (GSX) state decoding and progress arithmetic.
//!
//! GSX reports coarse, cumulative progress on its own schedule: a service
//! state, a running passenger total, and a cargo percentage. Nothing here
//! mutates stations; these are the pure diffs and projections the engine
//! applies.

use serde::{Deserialize, Serialize};

/// Lifecycle of one GSX service (boarding or deboarding), as reported by
/// the external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GsxState {
    /// Anything outside the documented 1..=6 range, treated as a no-op.
    Unknown,
    Available,
    NotAvailable,
    Bypassed,
    Requested,
    Performing,
    Completed,
}

impl GsxState {
    /// Decode the host-side numeric state.
    pub fn from_number(value: f64) -> Self {
        match value.round() as i64 {
            1 => Self::Available,
            2 => Self::NotAvailable,
            3 => Self::Bypassed,
            4 => Self::Requested,
            5 => Self::Performing,
            6 => Self::Completed,
            _ => Self::Unknown,
        }
    }
}

/// Incremental passengers to move this tick, diffed against the previous
/// cumulative reading. Callers treat non-positive results as no-ops, never
/// as undo instructions.
pub fn pax_delta(reported_total: i64, last_total: i64) -> i64 {
    reported_total - last_total
}

/// Clamp a reported percentage into [0, 100].
fn clamp_percent(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}

/// Hold load while boarding: the reported percentage of the desired load.
/// Cumulative, so reapplying the same percentage is idempotent.
pub fn board_cargo_load(desired_kg: f64, percent: f64) -> f64 {
    desired_kg * (clamp_percent(percent) / 100.0)
}

/// Hold load while deboarding: the remaining fraction of the current load.
pub fn deboard_cargo_load(current_kg: f64, percent: f64) -> f64 {
    current_kg * ((100.0 - clamp_percent(percent)) / 100.0)
}
