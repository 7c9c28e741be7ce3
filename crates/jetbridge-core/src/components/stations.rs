//! Station components: passenger zones and cargo holds.

use jetbridge_logic::seatmap::SeatMap;
use serde::{Deserialize, Serialize};

use crate::bridge::vars;

/// Tolerance for hold load comparisons, in kilograms.
pub const LOAD_EPSILON_KG: f64 = 0.001;

/// How one zone's occupancy changed during a reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneChange {
    /// Seats filled.
    Boarded(u8),
    /// Seats vacated.
    Deboarded(u8),
    /// Same headcount, different seats: membership rewritten wholesale.
    Shuffled,
    Unchanged,
}

/// Passenger zone component - one cabin section with individually tracked seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaxZone {
    pub name: String,
    /// Seat capacity, fixed at construction.
    pub seats: u8,
    /// Seats currently occupied. Mutated only by the reconciliation systems.
    pub active: SeatMap,
    /// Seats requested as the fill target. Owned by the host UI; the engine
    /// only rewrites it on a deboard-requested safety reset.
    pub desired: SeatMap,
    /// Host variable carrying the active occupancy mask.
    pub occupancy_var: String,
    /// Host variable carrying the desired occupancy mask.
    pub target_var: String,
    /// Host payload slot this zone's weight is written to.
    pub payload_var: String,
}

impl PaxZone {
    pub fn new(name: impl Into<String>, seats: u8, payload_station: usize) -> Self {
        let name = name.into();
        Self {
            seats,
            active: SeatMap::new(seats),
            desired: SeatMap::new(seats),
            occupancy_var: vars::pax_occupancy(&name),
            target_var: vars::pax_target(&name),
            payload_var: vars::payload_station(payload_station),
            name,
        }
    }

    /// Current headcount.
    pub fn pax(&self) -> u8 {
        self.active.count()
    }

    /// Target headcount.
    pub fn pax_target(&self) -> u8 {
        self.desired.count()
    }

    /// Whether this zone matches its target in count AND seat membership.
    pub fn is_target(&self) -> bool {
        self.active == self.desired
    }

    /// Zone weight from headcount.
    pub fn payload_kg(&self, per_pax_kg: f64) -> f64 {
        f64::from(self.pax()) * per_pax_kg
    }

    /// Move occupancy toward `requested` seats in one step.
    ///
    /// Filling only ever takes seats that are desired-but-vacant; emptying
    /// only takes seats that are occupied-but-undesired; nobody is seated
    /// who was not requested. A `requested` above capacity is clamped, not
    /// rejected. When the count already matches but the seat membership
    /// differs, active is overwritten seat-for-seat with desired (the
    /// "shuffle": count equality alone never skips the membership check).
    pub fn sync_to_target(&mut self, requested: u8) -> ZoneChange {
        let diff = i16::from(requested.min(self.seats)) - i16::from(self.pax());

        if diff > 0 {
            let candidates: Vec<u8> = self
                .desired
                .filled_seats()
                .into_iter()
                .filter(|&s| !self.active.contains(s))
                .collect();
            let moved = self.active.fill(diff as u8, &candidates);
            if moved > 0 {
                ZoneChange::Boarded(moved)
            } else {
                ZoneChange::Unchanged
            }
        } else if diff < 0 {
            let candidates: Vec<u8> = self
                .desired
                .empty_seats()
                .into_iter()
                .filter(|&s| self.active.contains(s))
                .collect();
            let moved = self.active.empty(diff.unsigned_abs() as u8, &candidates);
            if moved > 0 {
                ZoneChange::Deboarded(moved)
            } else {
                ZoneChange::Unchanged
            }
        } else if self.active != self.desired {
            self.active = self.desired;
            ZoneChange::Shuffled
        } else {
            ZoneChange::Unchanged
        }
    }
}

/// Cargo hold component - weight-tracked load station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoHold {
    pub name: String,
    pub capacity_kg: f64,
    /// Current load. Mutated only by the reconciliation systems.
    pub load_kg: f64,
    /// Target load. Owned by the host UI; trusted, not bounds-checked
    /// against capacity.
    pub desired_kg: f64,
    /// Host variable carrying the current load.
    pub load_var: String,
    /// Host variable carrying the target load.
    pub target_var: String,
    /// Host payload slot this hold's weight is written to.
    pub payload_var: String,
}

impl CargoHold {
    pub fn new(name: impl Into<String>, capacity_kg: f64, payload_station: usize) -> Self {
        let name = name.into();
        Self {
            capacity_kg,
            load_kg: 0.0,
            desired_kg: 0.0,
            load_var: vars::cargo_load(&name),
            target_var: vars::cargo_target(&name),
            payload_var: vars::payload_station(payload_station),
            name,
        }
    }

    pub fn is_target(&self) -> bool {
        (self.load_kg - self.desired_kg).abs() < LOAD_EPSILON_KG
    }

    /// Set the load, floored at zero. Returns the signed change applied.
    pub fn set_load(&mut self, kg: f64) -> f64 {
        let next = kg.max(0.0);
        let moved = next - self.load_kg;
        self.load_kg = next;
        moved
    }
}
