//! Jetbridge Headless Boarding Harness
//!
//! Validates the boarding engine against its behavioral contract without a
//! host simulator. Runs entirely in-process: no SimConnect, no rendering.
//!
//! Usage:
//!   cargo run -p jetbridge-simtest
//!   cargo run -p jetbridge-simtest -- --verbose

use jetbridge_core::bridge::{vars, InMemoryVars, VariableStore};
use jetbridge_core::engine::{BoardingEngine, EngineConfig};
use jetbridge_core::generation::CabinConfig;
use jetbridge_logic::lifecycle::BoardingPhase;
use jetbridge_logic::seatmap::{SeatMap, MAX_ZONE_SEATS};
use serde::Deserialize;

// ── Cabin manifest (same JSON a host integration would ship) ────────────
const MANIFEST_JSON: &str = include_str!("../../../data/cabin_manifest.json");

/// Raw manifest row, validated independently of the engine's own parser.
#[derive(Debug, Deserialize)]
struct StationRow {
    kind: String,
    name: String,
    #[serde(default)]
    seats: u8,
    #[serde(default)]
    capacity_kg: f64,
    payload_station: usize,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Jetbridge Boarding Harness ===\n");

    let mut results = Vec::new();

    // 1. Cabin manifest validation
    results.extend(validate_cabin_manifest());

    // 2. Instant convergence sweep
    results.extend(validate_instant_convergence());

    // 3. Paced stepping contract
    results.extend(validate_paced_stepping());

    // 4. GSX boarding delta distribution
    results.extend(validate_gsx_boarding());

    // 5. GSX deboard percentage guard
    results.extend(validate_gsx_deboard_guard());

    // 6. Lifecycle edge cases
    results.extend(validate_lifecycle());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Engine plus seeded store, boarding preconditions satisfied.
fn rig() -> (BoardingEngine, InMemoryVars) {
    let engine = BoardingEngine::with_cabin(&CabinConfig::default(), EngineConfig::default());
    let mut store = InMemoryVars::new();
    engine.init_vars(&mut store);
    store.set_bool(vars::CAN_BOARD, true);
    (engine, store)
}

fn seat_mask(count: u8, capacity: u8) -> f64 {
    let mut map = SeatMap::new(capacity);
    for seat in 0..count {
        map.set(seat);
    }
    map.bits() as f64
}

// ── 1. Cabin Manifest ───────────────────────────────────────────────────

fn validate_cabin_manifest() -> Vec<TestResult> {
    println!("--- Cabin Manifest ---");
    let mut results = Vec::new();

    let rows: Vec<StationRow> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(rows) => rows,
        Err(e) => {
            results.push(check(
                "manifest_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    results.push(check(
        "manifest_parse",
        true,
        format!("{} stations", rows.len()),
    ));

    let pax_rows = rows.iter().filter(|r| r.kind == "pax").count();
    let cargo_rows = rows.iter().filter(|r| r.kind == "cargo").count();
    results.push(check(
        "manifest_has_stations",
        pax_rows > 0 && cargo_rows > 0,
        format!("{} zones, {} holds", pax_rows, cargo_rows),
    ));

    let kinds_ok = rows.iter().all(|r| r.kind == "pax" || r.kind == "cargo");
    results.push(check("station_kinds_known", kinds_ok, "only pax/cargo kinds"));

    let seats_ok = rows
        .iter()
        .filter(|r| r.kind == "pax")
        .all(|r| r.seats > 0 && r.seats <= MAX_ZONE_SEATS);
    results.push(check(
        "zone_seat_bounds",
        seats_ok,
        format!("every zone within 1..={} seats", MAX_ZONE_SEATS),
    ));

    let capacity_ok = rows
        .iter()
        .filter(|r| r.kind == "cargo")
        .all(|r| r.capacity_kg > 0.0);
    results.push(check("hold_capacities_positive", capacity_ok, "capacity_kg > 0"));

    let mut names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    let unique = names.windows(2).all(|w| w[0] != w[1]);
    results.push(check("station_names_unique", unique, "no duplicate station names"));

    let mut slots: Vec<usize> = rows.iter().map(|r| r.payload_station).collect();
    slots.sort_unstable();
    let slots_unique = slots.windows(2).all(|w| w[0] != w[1]);
    results.push(check(
        "payload_slots_unique",
        slots_unique,
        "no shared payload stations",
    ));

    // The engine's own parser must agree with the raw rows.
    match CabinConfig::from_manifest(MANIFEST_JSON) {
        Ok(config) => results.push(check(
            "engine_parser_agrees",
            config.zones.len() == pax_rows && config.holds.len() == cargo_rows,
            "CabinConfig sees the same stations",
        )),
        Err(e) => results.push(check("engine_parser_agrees", false, format!("{}", e))),
    }

    results
}

// ── 2. Instant Convergence ──────────────────────────────────────────────

fn validate_instant_convergence() -> Vec<TestResult> {
    println!("--- Instant Convergence ---");
    let mut results = Vec::new();

    for (label, pax_counts, cargo_kg) in [
        ("empty_to_half", [18u8, 21, 24, 24], 1700.0),
        ("empty_to_full", [36, 42, 48, 48], 3402.0),
        ("single_zone", [0, 0, 0, 7], 0.0),
    ] {
        let (mut engine, mut store) = rig();
        store.set(vars::BOARDING_RATE, 0.0);
        store.set_bool(vars::BOARDING_STARTED_BY_USR, true);
        for (index, &count) in pax_counts.iter().enumerate() {
            let zone_name = ["A", "B", "C", "D"][index];
            let seats = [36, 42, 48, 48][index];
            store.set(&vars::pax_target(zone_name), seat_mask(count, seats));
        }
        store.set(&vars::cargo_target("FWD_BAGGAGE"), cargo_kg);

        engine.update(&mut store, 16.7);

        let totals = engine.layout.totals(&engine.world);
        let expected: u32 = pax_counts.iter().map(|&c| u32::from(c)).sum();
        results.push(check(
            &format!("instant_{}", label),
            totals.pax == expected
                && totals.all_pax_zones_match
                && totals.all_cargo_holds_match,
            format!("{}/{} pax, cargo matched", totals.pax, expected),
        ));
    }

    // Shuffle: same count, different seats, one step.
    let (mut engine, mut store) = rig();
    store.set(vars::BOARDING_RATE, 0.0);
    store.set_bool(vars::BOARDING_STARTED_BY_USR, true);
    store.set(&vars::pax_occupancy("A"), 0b0011 as f64);
    store.set(&vars::pax_target("A"), 0b1100 as f64);
    engine.update(&mut store, 16.7);
    results.push(check(
        "instant_shuffle",
        store.get(&vars::pax_occupancy("A")) == 0b1100 as f64,
        "membership rewritten despite equal counts",
    ));

    results
}

// ── 3. Paced Stepping ───────────────────────────────────────────────────

fn validate_paced_stepping() -> Vec<TestResult> {
    println!("--- Paced Stepping ---");
    let mut results = Vec::new();

    let (mut engine, mut store) = rig();
    store.set(vars::BOARDING_RATE, 1.0); // fast
    store.set_bool(vars::BOARDING_STARTED_BY_USR, true);
    store.set(&vars::pax_target("A"), seat_mask(5, 36));
    store.set(&vars::cargo_target("FWD_BAGGAGE"), 500.0);

    engine.update(&mut store, 900.0);
    let below = engine.pax() == 0 && engine.cargo_kg() == 0.0;
    results.push(check(
        "paced_below_threshold",
        below,
        "no movement before 1000 ms",
    ));

    engine.update(&mut store, 200.0);
    let first = engine.pax() == 1 && engine.cargo_kg() == 60.0;
    results.push(check(
        "paced_first_step",
        first,
        format!("{} pax, {} kg after threshold", engine.pax(), engine.cargo_kg()),
    ));

    let mut one_at_a_time = true;
    for _ in 0..10 {
        let before = engine.pax();
        let result = engine.update(&mut store, 1100.0);
        if result.pax_moved() > 1 || engine.pax() > before + 1 {
            one_at_a_time = false;
        }
    }
    results.push(check(
        "paced_single_unit",
        one_at_a_time && engine.pax() == 5,
        "exactly one seat per qualifying tick",
    ));

    results.push(check(
        "paced_cargo_converged",
        engine.cargo_kg() == 500.0,
        "cargo reached target in 60 kg steps",
    ));

    results
}

// ── 4. GSX Boarding ─────────────────────────────────────────────────────

fn validate_gsx_boarding() -> Vec<TestResult> {
    println!("--- GSX Boarding ---");
    let mut results = Vec::new();

    let (mut engine, mut store) = rig();
    store.set_bool(vars::GSX_SYNC_ENABLED, true);
    for (zone_name, seats) in [("A", 36u8), ("B", 42), ("C", 48), ("D", 48)] {
        store.set(&vars::pax_target(zone_name), seat_mask(20, seats));
    }

    store.set(vars::GSX_BOARDING_STATE, 5.0); // performing
    store.set(vars::GSX_BOARDING_TOTAL, 10.0);
    engine.update(&mut store, 100.0);

    store.set(vars::GSX_BOARDING_TOTAL, 14.0);
    let result = engine.update(&mut store, 100.0);

    results.push(check(
        "gsx_delta_applied",
        result.pax_moved() == 4 && engine.pax() == 14,
        format!("4 expected, {} moved", result.pax_moved()),
    ));
    results.push(check(
        "gsx_counter_persisted",
        engine.session.last_gsx_pax_total == 14,
        "last total rebaselined to 14",
    ));
    results.push(check(
        "gsx_reversed_fill",
        store.get(&vars::pax_occupancy("D")) != 0.0 && store.get(&vars::pax_occupancy("A")) == 0.0,
        "last-declared zone boards first",
    ));

    let repeat = engine.update(&mut store, 100.0);
    results.push(check(
        "gsx_repeat_reading_inert",
        repeat.pax_moved() == 0,
        "repeated total moves nobody",
    ));

    results
}

// ── 5. GSX Deboard Guard ────────────────────────────────────────────────

fn validate_gsx_deboard_guard() -> Vec<TestResult> {
    println!("--- GSX Deboard Guard ---");
    let mut results = Vec::new();

    let (mut engine, mut store) = rig();
    store.set_bool(vars::GSX_SYNC_ENABLED, true);
    store.set(&vars::cargo_load("FWD_BAGGAGE"), 1000.0);

    store.set(vars::GSX_DEBOARDING_STATE, 5.0);
    store.set(vars::GSX_DEBOARDING_CARGO_PERCENT, 40.0);
    engine.update(&mut store, 100.0);
    let after_first = engine.cargo_kg();

    engine.update(&mut store, 100.0);
    let after_repeat = engine.cargo_kg();

    results.push(check(
        "deboard_drain_applied",
        (after_first - 600.0).abs() < 0.001,
        format!("40% drain leaves {} kg", after_first),
    ));
    results.push(check(
        "deboard_drain_once_per_reading",
        (after_repeat - after_first).abs() < 0.001,
        "identical percentage does not compound",
    ));

    store.set(vars::GSX_DEBOARDING_STATE, 6.0); // completed
    engine.update(&mut store, 100.0);
    results.push(check(
        "deboard_completed_empties",
        engine.cargo_kg() == 0.0,
        "completion forces zero load",
    ));

    results
}

// ── 6. Lifecycle ────────────────────────────────────────────────────────

fn validate_lifecycle() -> Vec<TestResult> {
    println!("--- Lifecycle ---");
    let mut results = Vec::new();

    // Offsetting mismatch: totals agree, stations do not.
    let (mut engine, mut store) = rig();
    store.set(&vars::pax_target("A"), 0b1 as f64);
    engine.update(&mut store, 16.7);
    store.set(&vars::pax_occupancy("A"), 0b1 as f64);
    store.set(&vars::pax_target("A"), 0.0);
    store.set(&vars::pax_target("B"), 0b1 as f64);
    engine.update(&mut store, 16.7);
    results.push(check(
        "offsetting_mismatch_not_finished",
        engine.session.phase == BoardingPhase::Boarding,
        "equal totals with mismatched stations stay Boarding",
    ));

    // Completion chime edge.
    let (mut engine, mut store) = rig();
    store.set(vars::BOARDING_RATE, 1.0);
    store.set_bool(vars::BOARDING_STARTED_BY_USR, true);
    store.set(&vars::pax_target("C"), 0b1 as f64);
    engine.update(&mut store, 1100.0); // boards the single passenger
    engine.update(&mut store, 16.7); // chime tick
    let chimed = store.get_bool(vars::SOUND_BOARDING_COMPLETE);
    engine.update(&mut store, 16.7);
    let cleared = !store.get_bool(vars::SOUND_BOARDING_COMPLETE);
    results.push(check(
        "completion_chime_edge",
        chimed && cleared,
        "chime fires exactly once",
    ));

    results.push(check(
        "finish_clears_user_switch",
        !store.get_bool(vars::BOARDING_STARTED_BY_USR),
        "boarding switch cleared on finish",
    ));

    results
}
