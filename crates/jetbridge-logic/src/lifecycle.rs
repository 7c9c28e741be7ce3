//! Boarding phase transitions and cabin sound cues.
//!
//! Both are derived once per tick from the same aggregate snapshot. The
//! phase machine feeds the host's boarding-state variable; the cues drive
//! the cabin sound set.

use serde::{Deserialize, Serialize};

/// Coarse boarding lifecycle, re-derived from aggregates each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardingPhase {
    Boarding,
    Finished,
}

/// Aggregate cabin snapshot used by the phase machine and sound cues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabinTotals {
    pub pax: u32,
    pub pax_target: u32,
    pub cargo_kg: f64,
    pub cargo_target_kg: f64,
    /// Every passenger zone individually matches its target.
    pub all_pax_zones_match: bool,
    /// Every cargo hold individually matches its target.
    pub all_cargo_holds_match: bool,
}

/// Tolerance for cargo aggregate comparisons, in kilograms.
pub const CARGO_EPSILON_KG: f64 = 0.001;

impl CabinTotals {
    pub fn pax_at_target(&self) -> bool {
        self.pax == self.pax_target
    }

    pub fn cargo_at_target(&self) -> bool {
        (self.cargo_kg - self.cargo_target_kg).abs() < CARGO_EPSILON_KG
    }
}

/// Evaluate the phase transition for this tick.
///
/// `Finished` requires the aggregate totals to match on both domains AND
/// every individual station to match: two stations mismatched in
/// offsetting ways keep the phase at `Boarding` even though the totals
/// agree. `None` holds the current phase: the only tolerated staleness
/// window, cleared on the next tick's re-evaluation.
pub fn next_phase(totals: &CabinTotals) -> Option<BoardingPhase> {
    if totals.pax_at_target()
        && totals.cargo_at_target()
        && totals.all_pax_zones_match
        && totals.all_cargo_holds_match
    {
        Some(BoardingPhase::Finished)
    } else if totals.pax < totals.pax_target
        || totals.cargo_kg < totals.cargo_target_kg - CARGO_EPSILON_KG
    {
        Some(BoardingPhase::Boarding)
    } else {
        None
    }
}

/// Cabin sound cue set for one tick.
///
/// `ambience` is `None` on the completion-chime tick: the chime takes the
/// write slot and the ambience variable is left untouched until the next
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCues {
    pub boarding: bool,
    pub deboarding: bool,
    pub complete: bool,
    pub ambience: Option<bool>,
}

/// Derive the sound cues for this tick.
///
/// Boarding/deboarding cues only play for user-initiated boarding. The
/// completion chime is edge-triggered: it fires exactly once, on the tick
/// where occupancy first meets the target while boarding was in progress.
/// Returns the cues and the updated was-boarding flag.
pub fn sound_cues(
    pax: u32,
    pax_target: u32,
    started_by_user: bool,
    was_boarding: bool,
) -> (SoundCues, bool) {
    let boarding = pax < pax_target && started_by_user;
    let deboarding = pax > pax_target && started_by_user;
    let mut now_boarding = was_boarding || boarding;

    let (complete, ambience) = if pax == pax_target && now_boarding {
        now_boarding = false;
        (true, None)
    } else {
        (false, Some(pax > 0))
    };

    (
        SoundCues {
            boarding,
            deboarding,
            complete,
            ambience,
        },
        now_boarding,
    )
}
