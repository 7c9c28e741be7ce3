//! Boarding rate tiers and paced step sizing.

use serde::{Deserialize, Serialize};

/// How fast boarding converges toward its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardingRate {
    /// Real-time pacing, one unit per five seconds.
    Real,
    /// Accelerated pacing, one unit per second.
    Fast,
    /// No pacing: targets are applied in a single step.
    Instant,
}

impl BoardingRate {
    /// Decode the host-side numeric setting. Unknown values fall back to
    /// `Real` rather than faulting.
    pub fn from_index(value: f64) -> Self {
        match value as u8 {
            0 => Self::Instant,
            1 => Self::Fast,
            _ => Self::Real,
        }
    }

    /// Host-side encoding of this rate.
    pub fn index(self) -> u8 {
        match self {
            Self::Instant => 0,
            Self::Fast => 1,
            Self::Real => 2,
        }
    }

    /// Milliseconds between paced steps. `Instant` is never time-gated.
    pub fn delay_ms(self) -> u64 {
        match self {
            Self::Fast => 1000,
            _ => 5000,
        }
    }
}

/// Most cargo a single paced step may move, in kilograms.
pub const CARGO_STEP_KG: f64 = 60.0;

/// One paced cargo step: the next load value, moving at most
/// [`CARGO_STEP_KG`] toward `target_kg` and never overshooting it.
pub fn paced_cargo_step(current_kg: f64, target_kg: f64) -> f64 {
    let delta = (target_kg - current_kg).abs();
    if current_kg < target_kg {
        current_kg + delta.min(CARGO_STEP_KG)
    } else if current_kg > target_kg {
        current_kg - delta.min(CARGO_STEP_KG)
    } else {
        current_kg
    }
}
