//! Boarding engine - main entry point for running the synchronization loop

use hecs::World;
use jetbridge_logic::lifecycle::SoundCues;
use jetbridge_logic::rate::BoardingRate;
use jetbridge_logic::seatmap::SeatMap;
use tracing::trace;

use crate::bridge::{vars, VariableStore};
use crate::components::{BoardingMode, BoardingSession, CargoHold, PaxZone};
use crate::generation::{generate_cabin, CabinConfig, CabinLayout};
use crate::systems::{board_instant, board_paced, gsx_sync, GsxSnapshot, StepResult};
use crate::systems::{update_cues, update_phase};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Gate manual paced boarding on the host's single "aircraft may
    /// board" boolean. Instant loading and GSX sync are never gated - the
    /// former is a teleport, the latter is owned by the ground service.
    pub require_ground_conditions: bool,
    /// Per-passenger weight used when the host variable is unset.
    pub per_pax_weight_kg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_ground_conditions: true,
            per_pax_weight_kg: 84.0,
        }
    }
}

/// Main boarding synchronization engine.
///
/// Tick-driven and single-threaded: the host calls [`update`](Self::update)
/// once per frame. Exactly one reconciliation step runs per tick, so the
/// engine is naturally rate-limited and cannot starve the frame loop.
pub struct BoardingEngine {
    /// ECS world containing the station entities
    pub world: World,
    /// Station entity lists in declaration order
    pub layout: CabinLayout,
    /// Cross-tick bookkeeping
    pub session: BoardingSession,

    config: EngineConfig,
}

impl BoardingEngine {
    /// Create an engine with an empty cabin.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            world: World::new(),
            layout: CabinLayout::default(),
            session: BoardingSession::new(),
            config,
        }
    }

    /// Create an engine and generate the station topology.
    pub fn with_cabin(cabin: &CabinConfig, config: EngineConfig) -> Self {
        let mut engine = Self::new(config);
        engine.layout = generate_cabin(&mut engine.world, cabin);
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Total passengers currently seated.
    pub fn pax(&self) -> u32 {
        self.layout.totals(&self.world).pax
    }

    /// Total cargo currently loaded, in kilograms.
    pub fn cargo_kg(&self) -> f64 {
        self.layout.totals(&self.world).cargo_kg
    }

    /// Seed the host's boarding variables: default weights, real-time
    /// rate, ground-service sync off, all stations empty.
    pub fn init_vars(&self, store: &mut impl VariableStore) {
        if store.get(vars::PER_PAX_WEIGHT) <= 0.0 {
            store.set(vars::PER_PAX_WEIGHT, self.config.per_pax_weight_kg);
        }
        store.set(vars::BOARDING_RATE, f64::from(BoardingRate::Real.index()));
        store.set_bool(vars::GSX_SYNC_ENABLED, false);

        for &entity in &self.layout.pax_zones {
            if let Ok(zone) = self.world.get::<&PaxZone>(entity) {
                store.set(&zone.occupancy_var, zone.active.bits() as f64);
                store.set(&zone.payload_var, 0.0);
            }
        }
        for &entity in &self.layout.cargo_holds {
            if let Ok(hold) = self.world.get::<&CargoHold>(entity) {
                store.set(&hold.load_var, 0.0);
                store.set(&hold.target_var, 0.0);
                store.set(&hold.payload_var, 0.0);
            }
        }
    }

    /// Run one simulation tick.
    ///
    /// Reads station state and control variables, derives the active mode,
    /// updates cues and phase from the aggregates, runs exactly one
    /// mode-appropriate reconciliation step, and writes the results back.
    pub fn update(&mut self, store: &mut impl VariableStore, delta_ms: f64) -> StepResult {
        self.read_station_state(store);

        let rate = BoardingRate::from_index(store.get(vars::BOARDING_RATE));
        let started = store.get_bool(vars::BOARDING_STARTED_BY_USR);
        let mode = self.resolve_mode(store, started, rate);

        let totals = self.layout.totals(&self.world);
        let cues = update_cues(&mut self.session, &totals, started);
        Self::write_cues(store, &cues);
        if update_phase(&mut self.session, &totals) {
            store.set_bool(vars::BOARDING_STARTED_BY_USR, false);
        }

        let mut result = match mode {
            BoardingMode::Idle => {
                self.session.elapsed_ms = 0.0;
                StepResult::new()
            }
            BoardingMode::Instant => board_instant(&mut self.world, &self.layout),
            BoardingMode::ManualPaced => board_paced(
                &mut self.world,
                &self.layout,
                &mut self.session,
                rate,
                delta_ms,
            ),
            BoardingMode::GsxSynchronized => {
                let snapshot = Self::read_gsx(store);
                gsx_sync(&mut self.world, &self.layout, &mut self.session, &snapshot)
            }
        };

        self.write_station_state(store, result.targets_reset);
        result.totals = self.layout.totals(&self.world);
        result
    }

    /// Which reconciliation algorithm is active this tick.
    fn resolve_mode(
        &self,
        store: &impl VariableStore,
        started: bool,
        rate: BoardingRate,
    ) -> BoardingMode {
        if store.get_bool(vars::GSX_SYNC_ENABLED) {
            return BoardingMode::GsxSynchronized;
        }
        if !started {
            return BoardingMode::Idle;
        }
        match rate {
            BoardingRate::Instant => BoardingMode::Instant,
            _ => {
                if self.config.require_ground_conditions && !store.get_bool(vars::CAN_BOARD) {
                    BoardingMode::Idle
                } else {
                    BoardingMode::ManualPaced
                }
            }
        }
    }

    /// Pull per-station actual/desired state from the host. The host owns
    /// both representations between ticks; the engine's components are a
    /// working copy.
    fn read_station_state(&mut self, store: &impl VariableStore) {
        for &entity in &self.layout.pax_zones {
            if let Ok(mut zone) = self.world.get::<&mut PaxZone>(entity) {
                zone.active = SeatMap::from_bits(store.get(&zone.occupancy_var) as u64, zone.seats);
                zone.desired = SeatMap::from_bits(store.get(&zone.target_var) as u64, zone.seats);
            }
        }
        for &entity in &self.layout.cargo_holds {
            if let Ok(mut hold) = self.world.get::<&mut CargoHold>(entity) {
                hold.load_kg = store.get(&hold.load_var).max(0.0);
                hold.desired_kg = store.get(&hold.target_var).max(0.0);
            }
        }
    }

    /// Push occupancy, loads, and computed weights back to the host.
    /// Desired state is host-owned and only written after a
    /// deboard-requested safety reset.
    fn write_station_state(&mut self, store: &mut impl VariableStore, targets_reset: bool) {
        let mut per_pax = store.get(vars::PER_PAX_WEIGHT);
        if per_pax <= 0.0 {
            per_pax = self.config.per_pax_weight_kg;
        }

        for &entity in &self.layout.pax_zones {
            if let Ok(zone) = self.world.get::<&PaxZone>(entity) {
                store.set(&zone.occupancy_var, zone.active.bits() as f64);
                let payload = zone.payload_kg(per_pax);
                if (store.get(&zone.payload_var) - payload).abs() > 0.001 {
                    trace!(zone = %zone.name, payload_kg = payload, "zone payload updated");
                }
                store.set(&zone.payload_var, payload);
                if targets_reset {
                    store.set(&zone.target_var, zone.desired.bits() as f64);
                }
            }
        }
        for &entity in &self.layout.cargo_holds {
            if let Ok(hold) = self.world.get::<&CargoHold>(entity) {
                store.set(&hold.load_var, hold.load_kg);
                store.set(&hold.payload_var, hold.load_kg);
                if targets_reset {
                    store.set(&hold.target_var, hold.desired_kg);
                }
            }
        }
    }

    fn write_cues(store: &mut impl VariableStore, cues: &SoundCues) {
        store.set_bool(vars::SOUND_PAX_BOARDING, cues.boarding);
        store.set_bool(vars::SOUND_PAX_DEBOARDING, cues.deboarding);
        store.set_bool(vars::SOUND_BOARDING_COMPLETE, cues.complete);
        if let Some(ambience) = cues.ambience {
            store.set_bool(vars::SOUND_PAX_AMBIENCE, ambience);
        }
    }

    fn read_gsx(store: &impl VariableStore) -> GsxSnapshot {
        GsxSnapshot {
            board_state: jetbridge_logic::gsx::GsxState::from_number(
                store.get(vars::GSX_BOARDING_STATE),
            ),
            deboard_state: jetbridge_logic::gsx::GsxState::from_number(
                store.get(vars::GSX_DEBOARDING_STATE),
            ),
            boarding_total: store.get(vars::GSX_BOARDING_TOTAL) as i64,
            deboarding_total: store.get(vars::GSX_DEBOARDING_TOTAL) as i64,
            board_cargo_percent: store.get(vars::GSX_BOARDING_CARGO_PERCENT),
            deboard_cargo_percent: store.get(vars::GSX_DEBOARDING_CARGO_PERCENT),
        }
    }

    /// Save engine state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_session(writer, &self.world, &self.layout, &self.session)
    }

    /// Load engine state from a reader, rebuilding the station entities
    pub fn load<R: std::io::Read>(
        &mut self,
        reader: R,
    ) -> Result<(), crate::persistence::SaveError> {
        let loaded = crate::persistence::load_session(reader)?;

        self.world = World::new();
        self.layout = CabinLayout::default();
        for zone in loaded.zones {
            let entity = self.world.spawn((zone,));
            self.layout.pax_zones.push(entity);
        }
        for hold in loaded.holds {
            let entity = self.world.spawn((hold,));
            self.layout.cargo_holds.push(entity);
        }
        self.session = loaded.session;
        Ok(())
    }
}
