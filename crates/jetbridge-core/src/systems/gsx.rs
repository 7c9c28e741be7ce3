//! GSX-synchronized reconciliation.
//!
//! The ground-service feed reports coarse, cumulative progress (a running
//! passenger total and a cargo percentage) on its own schedule. These
//! systems diff each reading against the session's bookkeeping and apply
//! the increment, without double-counting when the feed repeats itself.

use hecs::World;
use jetbridge_logic::gsx::{board_cargo_load, deboard_cargo_load, pax_delta, GsxState};
use jetbridge_logic::seatmap::SeatMap;
use tracing::debug;

use crate::components::{BoardingSession, CargoHold, PaxZone};
use crate::generation::CabinLayout;
use crate::systems::StepResult;

/// One tick's worth of ground-service readings.
#[derive(Debug, Clone, Copy)]
pub struct GsxSnapshot {
    pub board_state: GsxState,
    pub deboard_state: GsxState,
    /// Cumulative passengers boarded this service.
    pub boarding_total: i64,
    /// Cumulative passengers deboarded this service.
    pub deboarding_total: i64,
    /// Cumulative boarding cargo progress, 0-100.
    pub board_cargo_percent: f64,
    /// Cumulative deboarding cargo progress, 0-100.
    pub deboard_cargo_percent: f64,
}

/// Run both ground-service sides for this tick. Deboarding is handled
/// first; a side whose state is not actionable is a no-op. The two
/// cumulative counters move independently, which is the only guard against
/// conflicting simultaneous instructions.
pub fn gsx_sync(
    world: &mut World,
    layout: &CabinLayout,
    session: &mut BoardingSession,
    snapshot: &GsxSnapshot,
) -> StepResult {
    let mut result = StepResult::new();
    gsx_deboard(world, layout, session, snapshot, &mut result);
    gsx_board(world, layout, session, snapshot, &mut result);
    result
}

fn gsx_board(
    world: &mut World,
    layout: &CabinLayout,
    session: &mut BoardingSession,
    snapshot: &GsxSnapshot,
    result: &mut StepResult,
) {
    match snapshot.board_state {
        // The feed never reports a clean 100%; completion forces every hold
        // onto its exact target.
        GsxState::Completed => {
            for &entity in &layout.cargo_holds {
                if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
                    let target = hold.desired_kg;
                    let moved = hold.set_load(target);
                    result.record_hold(&hold.name, moved);
                }
            }
        }
        GsxState::Performing => {
            let mut remaining = pax_delta(snapshot.boarding_total, session.last_gsx_pax_total);
            if remaining > 0 {
                debug!(remaining, "distributing boarded passengers");
            }
            for &entity in layout.pax_zones.iter().rev() {
                if remaining <= 0 {
                    break;
                }
                if let Ok(mut zone) = world.get::<&mut PaxZone>(entity) {
                    let current = zone.pax();
                    let target = zone.pax_target();
                    let amount = remaining.min(i64::from(zone.seats)) as u8;
                    if current < target {
                        let change = zone.sync_to_target(current + amount);
                        result.record_zone(&zone.name, change);
                        remaining -= i64::from(amount);
                    }
                }
            }
            // Persisted even when the delta was non-positive, so a regressed
            // counter re-baselines instead of replaying.
            session.last_gsx_pax_total = snapshot.boarding_total;

            for &entity in &layout.cargo_holds {
                if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
                    let load = board_cargo_load(hold.desired_kg, snapshot.board_cargo_percent);
                    let moved = hold.set_load(load);
                    result.record_hold(&hold.name, moved);
                }
            }
        }
        _ => {}
    }
}

fn gsx_deboard(
    world: &mut World,
    layout: &CabinLayout,
    session: &mut BoardingSession,
    snapshot: &GsxSnapshot,
    result: &mut StepResult,
) {
    match snapshot.deboard_state {
        // Backup reset in case the boarding UI never zeroed the targets.
        GsxState::Requested => {
            for &entity in &layout.pax_zones {
                if let Ok(mut zone) = world.get::<&mut PaxZone>(entity) {
                    zone.desired = SeatMap::new(zone.seats);
                }
            }
            for &entity in &layout.cargo_holds {
                if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
                    hold.desired_kg = 0.0;
                }
            }
            result.targets_reset = true;
        }
        // The feed never reports a clean 100% either way; completion
        // empties every hold.
        GsxState::Completed => {
            for &entity in &layout.cargo_holds {
                if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
                    let moved = hold.set_load(0.0);
                    result.record_hold(&hold.name, moved);
                }
            }
        }
        GsxState::Performing => {
            let mut remaining = pax_delta(snapshot.deboarding_total, session.last_gsx_pax_total);
            if remaining > 0 {
                debug!(remaining, "draining deboarded passengers");
            }
            for &entity in layout.pax_zones.iter().rev() {
                if remaining <= 0 {
                    break;
                }
                if let Ok(mut zone) = world.get::<&mut PaxZone>(entity) {
                    let current = zone.pax();
                    let target = zone.pax_target();
                    let amount = remaining.min(i64::from(zone.seats)) as u8;
                    if current > target {
                        let change = zone.sync_to_target(current.saturating_sub(amount));
                        result.record_zone(&zone.name, change);
                        remaining -= i64::from(amount);
                    }
                }
            }
            session.last_gsx_pax_total = snapshot.deboarding_total;

            // The feed repeats percentages across polls; the proportional
            // drain is applied once per distinct reading.
            if session.last_cargo_deboard_percent != snapshot.deboard_cargo_percent {
                for &entity in &layout.cargo_holds {
                    if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
                        let load = deboard_cargo_load(hold.load_kg, snapshot.deboard_cargo_percent);
                        let moved = hold.set_load(load);
                        result.record_hold(&hold.name, moved);
                    }
                }
            }
            session.last_cargo_deboard_percent = snapshot.deboard_cargo_percent;
        }
        _ => {}
    }
}
