//! Per-tick lifecycle and sound-cue application.
//!
//! Runs every tick regardless of the active reconciliation mode: cues and
//! phase are derived from the same aggregate snapshot the controller uses.

use jetbridge_logic::lifecycle::{next_phase, sound_cues, BoardingPhase, CabinTotals, SoundCues};
use tracing::debug;

use crate::components::BoardingSession;

/// Derive this tick's sound cues and update the session's boarding edge
/// flag.
pub fn update_cues(
    session: &mut BoardingSession,
    totals: &CabinTotals,
    started_by_user: bool,
) -> SoundCues {
    let (cues, was_boarding) = sound_cues(
        totals.pax,
        totals.pax_target,
        started_by_user,
        session.was_boarding,
    );
    if cues.complete {
        debug!("boarding complete chime");
    }
    session.was_boarding = was_boarding;
    cues
}

/// Evaluate the phase machine for this tick. Returns `true` when the
/// cabin fully matches its targets - the host's "boarding started by
/// user" flag is cleared while that holds.
pub fn update_phase(session: &mut BoardingSession, totals: &CabinTotals) -> bool {
    match next_phase(totals) {
        Some(phase) => {
            if phase != session.phase {
                debug!(?phase, "boarding phase change");
            }
            session.phase = phase;
            phase == BoardingPhase::Finished
        }
        // Hold the current phase: the tolerated staleness window.
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched_totals(pax: u32) -> CabinTotals {
        CabinTotals {
            pax,
            pax_target: pax,
            cargo_kg: 0.0,
            cargo_target_kg: 0.0,
            all_pax_zones_match: true,
            all_cargo_holds_match: true,
        }
    }

    #[test]
    fn test_phase_finishes_and_requests_flag_clear() {
        let mut session = BoardingSession::new();
        session.phase = BoardingPhase::Boarding;

        let clear = update_phase(&mut session, &matched_totals(100));
        assert!(clear);
        assert_eq!(session.phase, BoardingPhase::Finished);
    }

    #[test]
    fn test_offsetting_mismatch_keeps_boarding() {
        let mut session = BoardingSession::new();
        session.phase = BoardingPhase::Boarding;

        let totals = CabinTotals {
            all_pax_zones_match: false,
            ..matched_totals(100)
        };
        let clear = update_phase(&mut session, &totals);
        assert!(!clear);
        assert_eq!(session.phase, BoardingPhase::Boarding);
    }

    #[test]
    fn test_cues_set_edge_flag() {
        let mut session = BoardingSession::new();
        let totals = CabinTotals {
            pax: 10,
            pax_target: 50,
            ..matched_totals(0)
        };

        let cues = update_cues(&mut session, &totals, true);
        assert!(cues.boarding);
        assert!(session.was_boarding);

        let cues = update_cues(&mut session, &matched_totals(50), true);
        assert!(cues.complete);
        assert!(!session.was_boarding);
    }
}
