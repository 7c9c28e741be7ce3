//! End-to-end boarding flow tests, driven through the host variable
//! boundary the way the aircraft would drive the engine.

use jetbridge_core::bridge::vars;
use jetbridge_core::generation::random_seat_allocation;
use jetbridge_core::prelude::*;
use jetbridge_logic::lifecycle::BoardingPhase;
use rand::rngs::StdRng;
use rand::SeedableRng;

struct BoardingTestBed {
    engine: BoardingEngine,
    store: InMemoryVars,
    rng: StdRng,
}

impl BoardingTestBed {
    fn new() -> Self {
        let engine = BoardingEngine::with_cabin(&CabinConfig::default(), EngineConfig::default());
        let mut store = InMemoryVars::new();
        engine.init_vars(&mut store);
        store.set_bool(vars::CAN_BOARD, true);

        Self {
            engine,
            store,
            rng: StdRng::seed_from_u64(380320),
        }
    }

    fn zone_name(&self, index: usize) -> String {
        self.engine
            .world
            .get::<&PaxZone>(self.engine.layout.pax_zones[index])
            .unwrap()
            .name
            .clone()
    }

    fn zone_seats(&self, index: usize) -> u8 {
        self.engine
            .world
            .get::<&PaxZone>(self.engine.layout.pax_zones[index])
            .unwrap()
            .seats
    }

    fn hold_name(&self, index: usize) -> String {
        self.engine
            .world
            .get::<&CargoHold>(self.engine.layout.cargo_holds[index])
            .unwrap()
            .name
            .clone()
    }

    fn with_pax(mut self, index: usize, count: u8) -> Self {
        let seats = self.zone_seats(index);
        let map = random_seat_allocation(count, seats, &mut self.rng);
        self.store.set(
            &vars::pax_occupancy(&self.zone_name(index)),
            map.bits() as f64,
        );
        self
    }

    fn target_pax(mut self, index: usize, count: u8) -> Self {
        let seats = self.zone_seats(index);
        let map = random_seat_allocation(count, seats, &mut self.rng);
        self.store.set(
            &vars::pax_target(&self.zone_name(index)),
            map.bits() as f64,
        );
        self
    }

    fn target_half_pax(mut self) -> Self {
        for index in 0..self.engine.layout.pax_zones.len() {
            let half = self.zone_seats(index) / 2;
            self = self.target_pax(index, half);
        }
        self
    }

    fn with_cargo(mut self, index: usize, kg: f64) -> Self {
        self.store
            .set(&vars::cargo_load(&self.hold_name(index)), kg);
        self
    }

    fn target_cargo(mut self, index: usize, kg: f64) -> Self {
        self.store
            .set(&vars::cargo_target(&self.hold_name(index)), kg);
        self
    }

    fn instant_rate(mut self) -> Self {
        self.store.set(vars::BOARDING_RATE, 0.0);
        self
    }

    fn fast_rate(mut self) -> Self {
        self.store.set(vars::BOARDING_RATE, 1.0);
        self
    }

    fn real_rate(mut self) -> Self {
        self.store.set(vars::BOARDING_RATE, 2.0);
        self
    }

    fn start_boarding(mut self) -> Self {
        self.store.set_bool(vars::BOARDING_STARTED_BY_USR, true);
        self
    }

    fn gsx_enabled(mut self) -> Self {
        self.store.set_bool(vars::GSX_SYNC_ENABLED, true);
        self
    }

    fn tick(&mut self, delta_ms: f64) -> StepResult {
        self.engine.update(&mut self.store, delta_ms)
    }

    fn run_frames(&mut self, frames: usize, delta_ms: f64) {
        for _ in 0..frames {
            self.tick(delta_ms);
        }
    }

    fn zone_pax(&self, index: usize) -> u8 {
        self.engine
            .world
            .get::<&PaxZone>(self.engine.layout.pax_zones[index])
            .unwrap()
            .pax()
    }

    fn hold_load(&self, index: usize) -> f64 {
        self.engine
            .world
            .get::<&CargoHold>(self.engine.layout.cargo_holds[index])
            .unwrap()
            .load_kg
    }

    fn total_pax(&self) -> u32 {
        self.engine.pax()
    }

    fn sound(&self, name: &str) -> bool {
        self.store.get_bool(name)
    }
}

#[test]
fn instant_board_reaches_every_target() {
    let mut bed = BoardingTestBed::new()
        .target_half_pax()
        .target_cargo(0, 1700.0)
        .target_cargo(2, 1000.0)
        .instant_rate()
        .start_boarding();

    bed.tick(16.7);

    assert_eq!(bed.total_pax(), 18 + 21 + 24 + 24);
    assert_eq!(bed.hold_load(0), 1700.0);
    assert_eq!(bed.hold_load(2), 1000.0);
    assert_eq!(bed.engine.session.phase, BoardingPhase::Boarding); // evaluated pre-step
    bed.tick(16.7);
    assert_eq!(bed.engine.session.phase, BoardingPhase::Finished);
}

#[test]
fn instant_deboard_to_zero() {
    let mut bed = BoardingTestBed::new()
        .with_pax(0, 18)
        .with_pax(3, 24)
        .with_cargo(1, 1213.0)
        .instant_rate()
        .start_boarding();

    bed.tick(16.7);

    assert_eq!(bed.total_pax(), 0);
    assert_eq!(bed.hold_load(1), 0.0);
}

#[test]
fn fast_pacing_moves_one_seat_and_sixty_kg_per_interval() {
    let mut bed = BoardingTestBed::new()
        .target_pax(0, 3)
        .target_cargo(0, 500.0)
        .fast_rate()
        .start_boarding();

    // Below the 1000 ms threshold: nothing moves.
    bed.tick(500.0);
    bed.tick(500.0);
    assert_eq!(bed.total_pax(), 0);
    assert_eq!(bed.hold_load(0), 0.0);

    // Crossing it: exactly one seat and one 60 kg cargo step.
    bed.tick(500.0);
    assert_eq!(bed.total_pax(), 1);
    assert_eq!(bed.hold_load(0), 60.0);

    // Each further qualifying tick adds one more of each.
    bed.tick(1100.0);
    assert_eq!(bed.total_pax(), 2);
    assert_eq!(bed.hold_load(0), 120.0);
}

#[test]
fn real_rate_waits_five_seconds() {
    let mut bed = BoardingTestBed::new().target_pax(1, 2).real_rate().start_boarding();

    bed.tick(4900.0);
    assert_eq!(bed.total_pax(), 0);
    bed.tick(200.0);
    assert_eq!(bed.total_pax(), 1);
}

#[test]
fn paced_boarding_fills_last_declared_zone_first() {
    let mut bed = BoardingTestBed::new()
        .target_pax(0, 1)
        .target_pax(3, 1)
        .fast_rate()
        .start_boarding();

    bed.tick(1100.0);
    assert_eq!(bed.zone_pax(3), 1);
    assert_eq!(bed.zone_pax(0), 0);

    bed.tick(1100.0);
    assert_eq!(bed.zone_pax(0), 1);
}

#[test]
fn paced_boarding_converges_and_finishes() {
    let mut bed = BoardingTestBed::new()
        .target_pax(0, 4)
        .target_cargo(3, 100.0)
        .fast_rate()
        .start_boarding();

    bed.run_frames(8, 1100.0);

    assert_eq!(bed.total_pax(), 4);
    assert_eq!(bed.hold_load(3), 100.0);
    assert_eq!(bed.engine.session.phase, BoardingPhase::Finished);
    // Completion cleared the user's boarding switch.
    assert!(!bed.store.get_bool(vars::BOARDING_STARTED_BY_USR));
}

#[test]
fn shuffle_applies_in_one_step_when_counts_match() {
    let mut bed = BoardingTestBed::new().instant_rate().start_boarding();

    // Same headcount, different seats.
    bed.store.set(&vars::pax_occupancy("A"), 0b0011 as f64);
    bed.store.set(&vars::pax_target("A"), 0b1100 as f64);

    bed.tick(16.7);

    assert_eq!(bed.store.get(&vars::pax_occupancy("A")), 0b1100 as f64);
}

#[test]
fn offsetting_zone_mismatch_keeps_phase_boarding() {
    let mut bed = BoardingTestBed::new();

    // Drive the phase into Boarding first.
    bed.store.set(&vars::pax_target("A"), 0b1 as f64);
    bed.tick(16.7);
    assert_eq!(bed.engine.session.phase, BoardingPhase::Boarding);

    // Zone A holds one passenger nobody requested; zone B wants one nobody
    // boarded. Totals agree, the cabin does not.
    bed.store.set(&vars::pax_occupancy("A"), 0b1 as f64);
    bed.store.set(&vars::pax_target("A"), 0.0);
    bed.store.set(&vars::pax_target("B"), 0b1 as f64);

    bed.tick(16.7);
    assert_eq!(bed.engine.session.phase, BoardingPhase::Boarding);
}

#[test]
fn boarding_sound_and_completion_chime() {
    let mut bed = BoardingTestBed::new().target_pax(2, 1).fast_rate().start_boarding();

    bed.tick(1100.0); // boards the passenger; cues saw pax < target
    assert!(bed.sound(vars::SOUND_PAX_BOARDING));
    assert!(!bed.sound(vars::SOUND_BOARDING_COMPLETE));

    bed.tick(16.7); // chime tick
    assert!(bed.sound(vars::SOUND_BOARDING_COMPLETE));
    assert!(!bed.sound(vars::SOUND_PAX_BOARDING));

    bed.tick(16.7); // chime clears, ambience reflects occupied cabin
    assert!(!bed.sound(vars::SOUND_BOARDING_COMPLETE));
    assert!(bed.sound(vars::SOUND_PAX_AMBIENCE));
}

#[test]
fn ambience_sound_tracks_occupancy() {
    let mut bed = BoardingTestBed::new();
    bed.tick(16.7);
    assert!(!bed.sound(vars::SOUND_PAX_AMBIENCE));

    let mut bed = BoardingTestBed::new().with_pax(1, 5);
    bed.tick(16.7);
    assert!(bed.sound(vars::SOUND_PAX_AMBIENCE));
}

#[test]
fn zone_payload_weight_written_from_headcount() {
    let mut bed = BoardingTestBed::new().target_pax(0, 2).instant_rate().start_boarding();

    bed.tick(16.7);

    assert_eq!(bed.store.get(&vars::payload_station(1)), 2.0 * 84.0);
}

#[test]
fn gsx_boarding_distributes_reported_deltas() {
    let mut bed = BoardingTestBed::new()
        .target_pax(0, 20)
        .target_pax(1, 20)
        .target_pax(2, 20)
        .target_pax(3, 20)
        .gsx_enabled();

    bed.store.set(vars::GSX_BOARDING_STATE, 5.0); // performing
    bed.store.set(vars::GSX_BOARDING_TOTAL, 10.0);
    bed.tick(100.0);
    assert_eq!(bed.total_pax(), 10);
    assert_eq!(bed.engine.session.last_gsx_pax_total, 10);

    // Next poll reports 14: exactly four more, into the last-declared zone.
    bed.store.set(vars::GSX_BOARDING_TOTAL, 14.0);
    bed.tick(100.0);
    assert_eq!(bed.total_pax(), 14);
    assert_eq!(bed.zone_pax(3), 14);
    assert_eq!(bed.engine.session.last_gsx_pax_total, 14);

    // A repeated reading moves nobody.
    bed.tick(100.0);
    assert_eq!(bed.total_pax(), 14);
}

#[test]
fn gsx_boarding_cargo_follows_percentage() {
    let mut bed = BoardingTestBed::new().target_cargo(0, 2000.0).gsx_enabled();

    bed.store.set(vars::GSX_BOARDING_STATE, 5.0);
    bed.store.set(vars::GSX_BOARDING_CARGO_PERCENT, 50.0);
    bed.tick(100.0);
    assert_eq!(bed.hold_load(0), 1000.0);

    // Completion forces the exact target even though 100% never arrived.
    bed.store.set(vars::GSX_BOARDING_STATE, 6.0);
    bed.tick(100.0);
    assert_eq!(bed.hold_load(0), 2000.0);
}

#[test]
fn gsx_deboard_requested_zeroes_targets_in_store() {
    let mut bed = BoardingTestBed::new()
        .target_pax(0, 12)
        .target_cargo(1, 800.0)
        .gsx_enabled();

    bed.store.set(vars::GSX_DEBOARDING_STATE, 4.0); // requested
    bed.tick(100.0);

    assert_eq!(bed.store.get(&vars::pax_target("A")), 0.0);
    assert_eq!(bed.store.get(&vars::cargo_target("AFT_CONTAINER")), 0.0);
}

#[test]
fn gsx_deboard_cargo_percentage_applies_once() {
    let mut bed = BoardingTestBed::new().with_cargo(0, 1000.0).gsx_enabled();

    bed.store.set(vars::GSX_DEBOARDING_STATE, 5.0);
    bed.store.set(vars::GSX_DEBOARDING_CARGO_PERCENT, 40.0);
    bed.tick(100.0);
    assert_eq!(bed.hold_load(0), 600.0);

    // The feed repeats 40% on the next poll; the drain must not compound.
    bed.tick(100.0);
    assert_eq!(bed.hold_load(0), 600.0);

    // A new reading drains again, proportionally to the current load.
    bed.store.set(vars::GSX_DEBOARDING_CARGO_PERCENT, 70.0);
    bed.tick(100.0);
    assert!((bed.hold_load(0) - 180.0).abs() < 0.001);
}

#[test]
fn gsx_deboard_drains_passengers_and_completes_cargo() {
    let mut bed = BoardingTestBed::new()
        .with_pax(3, 24)
        .with_cargo(2, 500.0)
        .gsx_enabled();

    bed.store.set(vars::GSX_DEBOARDING_STATE, 5.0);
    bed.store.set(vars::GSX_DEBOARDING_TOTAL, 9.0);
    bed.tick(100.0);
    assert_eq!(bed.zone_pax(3), 15);

    bed.store.set(vars::GSX_DEBOARDING_STATE, 6.0); // completed
    bed.tick(100.0);
    assert_eq!(bed.hold_load(2), 0.0);
}

#[test]
fn mode_switch_to_idle_halts_convergence() {
    let mut bed = BoardingTestBed::new().target_pax(0, 6).fast_rate().start_boarding();

    bed.tick(1100.0);
    assert_eq!(bed.total_pax(), 1);

    // User cancels; nothing moves afterwards and the accumulator drains.
    bed.store.set_bool(vars::BOARDING_STARTED_BY_USR, false);
    bed.run_frames(10, 1100.0);
    assert_eq!(bed.total_pax(), 1);
    assert_eq!(bed.engine.session.elapsed_ms, 0.0);
}
