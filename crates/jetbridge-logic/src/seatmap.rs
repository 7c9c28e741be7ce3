//! Seat occupancy set for a single passenger zone.
//!
//! One bit per seat, seat ids `0..capacity`. The backing integer only
//! escapes through [`SeatMap::bits`]/[`SeatMap::from_bits`], the codec used
//! at the host variable boundary; reconciliation logic never depends on
//! the encoding.

use serde::{Deserialize, Serialize};

/// Widest zone the engine supports. Occupancy masks cross the host boundary
/// as an integer carried in an `f64` variable, so every bit must fit the
/// 53-bit mantissa.
pub const MAX_ZONE_SEATS: u8 = 53;

/// Which individual seats of a zone are occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    bits: u64,
    capacity: u8,
}

impl SeatMap {
    /// Empty map for a zone of `capacity` seats (capped at [`MAX_ZONE_SEATS`]).
    pub fn new(capacity: u8) -> Self {
        Self {
            bits: 0,
            capacity: capacity.min(MAX_ZONE_SEATS),
        }
    }

    /// Decode a host-side integer mask. Bits at or above `capacity` are
    /// discarded rather than trusted.
    pub fn from_bits(bits: u64, capacity: u8) -> Self {
        let capacity = capacity.min(MAX_ZONE_SEATS);
        let mask = if capacity == 0 {
            0
        } else {
            u64::MAX >> (64 - u32::from(capacity))
        };
        Self {
            bits: bits & mask,
            capacity,
        }
    }

    /// Encode for the host variable boundary.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Number of occupied seats.
    pub fn count(&self) -> u8 {
        self.bits.count_ones() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn contains(&self, seat: u8) -> bool {
        seat < self.capacity && self.bits & (1 << seat) != 0
    }

    /// Occupy one seat. Out-of-range ids are ignored.
    pub fn set(&mut self, seat: u8) {
        if seat < self.capacity {
            self.bits |= 1 << seat;
        }
    }

    /// Vacate one seat. Out-of-range ids are ignored.
    pub fn clear(&mut self, seat: u8) {
        if seat < self.capacity {
            self.bits &= !(1 << seat);
        }
    }

    /// Occupied seat ids, ascending.
    pub fn filled_seats(&self) -> Vec<u8> {
        (0..self.capacity).filter(|&s| self.contains(s)).collect()
    }

    /// Vacant seat ids, ascending.
    pub fn empty_seats(&self) -> Vec<u8> {
        (0..self.capacity).filter(|&s| !self.contains(s)).collect()
    }

    /// Occupy up to `n` seats chosen from `candidates`, first-listed first.
    /// Already-occupied and out-of-range candidates are skipped. Returns the
    /// number of seats actually filled.
    pub fn fill(&mut self, n: u8, candidates: &[u8]) -> u8 {
        let mut moved = 0;
        for &seat in candidates {
            if moved >= n {
                break;
            }
            if seat < self.capacity && !self.contains(seat) {
                self.set(seat);
                moved += 1;
            }
        }
        moved
    }

    /// Vacate up to `n` seats chosen from `candidates`, first-listed first.
    /// Already-vacant and out-of-range candidates are skipped. Returns the
    /// number of seats actually emptied.
    pub fn empty(&mut self, n: u8, candidates: &[u8]) -> u8 {
        let mut moved = 0;
        for &seat in candidates {
            if moved >= n {
                break;
            }
            if self.contains(seat) {
                self.clear(seat);
                moved += 1;
            }
        }
        moved
    }
}
