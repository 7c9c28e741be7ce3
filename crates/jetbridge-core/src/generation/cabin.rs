//! Cabin topology: station specs, world generation, aggregate queries.

use hecs::{Entity, World};
use jetbridge_logic::lifecycle::CabinTotals;
use jetbridge_logic::seatmap::SeatMap;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{CargoHold, PaxZone, LOAD_EPSILON_KG};

/// One passenger zone in the cabin manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub seats: u8,
    pub payload_station: usize,
}

/// One cargo hold in the cabin manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldSpec {
    pub name: String,
    pub capacity_kg: f64,
    pub payload_station: usize,
}

/// Static cabin topology: zone and hold declarations, in order.
///
/// Declaration order is behavioral - incremental fill visits passenger
/// zones in reversed order (last-declared zone boards first) and cargo
/// holds forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CabinConfig {
    pub zones: Vec<ZoneSpec>,
    pub holds: Vec<HoldSpec>,
}

/// Manifest entry shape shared by `data/cabin_manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StationSpec {
    Pax(ZoneSpec),
    Cargo(HoldSpec),
}

impl CabinConfig {
    /// Parse a station manifest (the `data/cabin_manifest.json` format).
    pub fn from_manifest(json: &str) -> Result<Self, serde_json::Error> {
        let stations: Vec<StationSpec> = serde_json::from_str(json)?;
        let mut config = Self {
            zones: Vec::new(),
            holds: Vec::new(),
        };
        for station in stations {
            match station {
                StationSpec::Pax(zone) => config.zones.push(zone),
                StationSpec::Cargo(hold) => config.holds.push(hold),
            }
        }
        Ok(config)
    }
}

impl Default for CabinConfig {
    /// A320neo single-aisle layout: four passenger zones, four holds.
    fn default() -> Self {
        let zone = |name: &str, seats: u8, slot: usize| ZoneSpec {
            name: name.to_string(),
            seats,
            payload_station: slot,
        };
        let hold = |name: &str, capacity_kg: f64, slot: usize| HoldSpec {
            name: name.to_string(),
            capacity_kg,
            payload_station: slot,
        };
        Self {
            zones: vec![
                zone("A", 36, 1),
                zone("B", 42, 2),
                zone("C", 48, 3),
                zone("D", 48, 4),
            ],
            holds: vec![
                hold("FWD_BAGGAGE", 3402.0, 5),
                hold("AFT_CONTAINER", 2426.0, 6),
                hold("AFT_BAGGAGE", 2110.0, 7),
                hold("AFT_BULK_LOOSE", 1497.0, 8),
            ],
        }
    }
}

/// Station entity lists in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CabinLayout {
    pub pax_zones: Vec<Entity>,
    pub cargo_holds: Vec<Entity>,
}

impl CabinLayout {
    /// Aggregate totals plus the per-station match flags the phase machine
    /// needs. Sums are order-independent.
    pub fn totals(&self, world: &World) -> CabinTotals {
        let mut pax = 0u32;
        let mut pax_target = 0u32;
        let mut all_pax_zones_match = true;
        for &entity in &self.pax_zones {
            if let Ok(zone) = world.get::<&PaxZone>(entity) {
                pax += u32::from(zone.pax());
                pax_target += u32::from(zone.pax_target());
                if !zone.is_target() {
                    all_pax_zones_match = false;
                }
            }
        }

        let mut cargo_kg = 0.0;
        let mut cargo_target_kg = 0.0;
        let mut all_cargo_holds_match = true;
        for &entity in &self.cargo_holds {
            if let Ok(hold) = world.get::<&CargoHold>(entity) {
                cargo_kg += hold.load_kg;
                cargo_target_kg += hold.desired_kg;
                if (hold.load_kg - hold.desired_kg).abs() >= LOAD_EPSILON_KG {
                    all_cargo_holds_match = false;
                }
            }
        }

        CabinTotals {
            pax,
            pax_target,
            cargo_kg,
            cargo_target_kg,
            all_pax_zones_match,
            all_cargo_holds_match,
        }
    }
}

/// Spawn the station entities for a cabin configuration.
pub fn generate_cabin(world: &mut World, config: &CabinConfig) -> CabinLayout {
    let mut layout = CabinLayout::default();

    for spec in &config.zones {
        let entity = world.spawn((PaxZone::new(
            spec.name.clone(),
            spec.seats,
            spec.payload_station,
        ),));
        layout.pax_zones.push(entity);
    }

    for spec in &config.holds {
        let entity = world.spawn((CargoHold::new(
            spec.name.clone(),
            spec.capacity_kg,
            spec.payload_station,
        ),));
        layout.cargo_holds.push(entity);
    }

    layout
}

/// Pick which individual seats a desired headcount maps to.
///
/// Used when a target arrives as a bare count (UI sliders, test setup):
/// `count` distinct seats are chosen uniformly from the zone.
pub fn random_seat_allocation(count: u8, capacity: u8, rng: &mut impl Rng) -> SeatMap {
    let mut map = SeatMap::new(capacity);
    let chosen = (0..map.capacity()).choose_multiple(rng, usize::from(count));
    for seat in chosen {
        map.set(seat);
    }
    map
}
