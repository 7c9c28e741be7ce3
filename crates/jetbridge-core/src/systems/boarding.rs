//! Instant and manually-paced boarding reconciliation.

use hecs::World;
use jetbridge_logic::lifecycle::CabinTotals;
use jetbridge_logic::rate::{paced_cargo_step, BoardingRate};
use tracing::debug;

use crate::components::{BoardingSession, CargoHold, PaxZone, ZoneChange};
use crate::generation::CabinLayout;

/// Outcome of one reconciliation step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Seats moved per zone this step, by zone name. Positive = boarded.
    pub zone_deltas: Vec<(String, i32)>,
    /// Kilograms moved per hold this step, by hold name. Positive = loaded.
    pub hold_deltas: Vec<(String, f64)>,
    /// Zones whose seat membership was rewritten without a count change.
    pub shuffles: u32,
    /// A deboard request reset all desired state to zero this step.
    pub targets_reset: bool,
    /// Aggregates after the step.
    pub totals: CabinTotals,
}

impl StepResult {
    pub fn new() -> Self {
        Self {
            zone_deltas: Vec::new(),
            hold_deltas: Vec::new(),
            shuffles: 0,
            targets_reset: false,
            totals: CabinTotals {
                pax: 0,
                pax_target: 0,
                cargo_kg: 0.0,
                cargo_target_kg: 0.0,
                all_pax_zones_match: true,
                all_cargo_holds_match: true,
            },
        }
    }

    /// Net seats moved, sign-blind.
    pub fn pax_moved(&self) -> u32 {
        self.zone_deltas
            .iter()
            .map(|(_, d)| d.unsigned_abs())
            .sum()
    }

    /// Kilograms moved, sign-blind.
    pub fn cargo_moved_kg(&self) -> f64 {
        self.hold_deltas.iter().map(|(_, d)| d.abs()).sum()
    }

    pub fn is_noop(&self) -> bool {
        self.zone_deltas.is_empty() && self.hold_deltas.is_empty() && self.shuffles == 0
    }

    pub(crate) fn record_zone(&mut self, name: &str, change: ZoneChange) {
        match change {
            ZoneChange::Boarded(n) => self.zone_deltas.push((name.to_string(), i32::from(n))),
            ZoneChange::Deboarded(n) => self.zone_deltas.push((name.to_string(), -i32::from(n))),
            ZoneChange::Shuffled => self.shuffles += 1,
            ZoneChange::Unchanged => {}
        }
    }

    pub(crate) fn record_hold(&mut self, name: &str, moved_kg: f64) {
        if moved_kg != 0.0 {
            self.hold_deltas.push((name.to_string(), moved_kg));
        }
    }
}

impl Default for StepResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Instant reconciliation: every station straight to its target, one step.
pub fn board_instant(world: &mut World, layout: &CabinLayout) -> StepResult {
    let mut result = StepResult::new();

    for &entity in &layout.pax_zones {
        if let Ok(mut zone) = world.get::<&mut PaxZone>(entity) {
            let target = zone.pax_target();
            let change = zone.sync_to_target(target);
            result.record_zone(&zone.name, change);
        }
    }

    for &entity in &layout.cargo_holds {
        if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
            if !hold.is_target() {
                let target = hold.desired_kg;
                let moved = hold.set_load(target);
                result.record_hold(&hold.name, moved);
            }
        }
    }

    if !result.is_noop() {
        debug!(
            pax = result.pax_moved(),
            cargo_kg = result.cargo_moved_kg(),
            "instant load applied"
        );
    }
    result
}

/// Manually-paced reconciliation: at most one passenger seat and one cargo
/// step per elapsed-delay interval.
///
/// The accumulator carries across ticks; once it exceeds the rate's delay
/// it resets and one unit of work is attempted. Passenger zones are
/// scanned in reversed declaration order, cargo holds forward; each scan
/// acts on the first mismatched station and stops.
pub fn board_paced(
    world: &mut World,
    layout: &CabinLayout,
    session: &mut BoardingSession,
    rate: BoardingRate,
    delta_ms: f64,
) -> StepResult {
    let mut result = StepResult::new();

    session.elapsed_ms += delta_ms;
    if session.elapsed_ms <= rate.delay_ms() as f64 {
        return result;
    }
    session.elapsed_ms = 0.0;

    // One passenger, last-declared zone first.
    for &entity in layout.pax_zones.iter().rev() {
        if let Ok(mut zone) = world.get::<&mut PaxZone>(entity) {
            let current = zone.pax();
            let target = zone.pax_target();

            let change = if current < target {
                zone.sync_to_target(current + 1)
            } else if current > target {
                zone.sync_to_target(current - 1)
            } else {
                continue;
            };
            debug!(zone = %zone.name, ?change, "paced passenger step");
            result.record_zone(&zone.name, change);
            break;
        }
    }

    // One cargo step, declaration order.
    for &entity in &layout.cargo_holds {
        if let Ok(mut hold) = world.get::<&mut CargoHold>(entity) {
            if hold.is_target() {
                continue;
            }
            let next = paced_cargo_step(hold.load_kg, hold.desired_kg);
            let moved = hold.set_load(next);
            debug!(hold = %hold.name, moved_kg = moved, "paced cargo step");
            result.record_hold(&hold.name, moved);
            break;
        }
    }

    result
}
