//! Tick clock and deterministic state hashing.

use crate::product::Product;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Elapsed-tick counter with a terminal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    elapsed: u64,
    end_tick: u64,
}

impl SimClock {
    pub fn new(end_tick: u64) -> Self {
        Self {
            elapsed: 0,
            end_tick,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn end_tick(&self) -> u64 {
        self.end_tick
    }

    pub fn is_over(&self) -> bool {
        self.elapsed >= self.end_tick
    }

    /// Advance by one tick unless already over. Returns the new tick, or
    /// `None` if the clock had already reached its end.
    pub fn advance(&mut self) -> Option<u64> {
        if self.is_over() {
            return None;
        }
        self.elapsed += 1;
        Some(self.elapsed)
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

/// Running fingerprint of a game: the manager feeds it the tick and score,
/// the board feeds it every cell in row-major order. Equal games give equal
/// fingerprints, and a single moved product almost surely changes it.
///
/// Bytes are folded with 64-bit FNV-1a; integers go in little-endian. Only
/// meant for comparing runs of the same build, not as a stable file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash {
    state: u64,
}

impl StateHash {
    pub fn new() -> Self {
        Self { state: OFFSET_BASIS }
    }

    fn absorb(&mut self, bytes: &[u8]) {
        self.state = bytes
            .iter()
            .fold(self.state, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME));
    }

    /// A one-byte marker: entity kind, direction ordinal, empty cell.
    pub fn write_tag(&mut self, tag: u8) {
        self.absorb(&[tag]);
    }

    /// A product slot as its value, with zero standing for empty.
    pub fn write_slot(&mut self, slot: Option<Product>) {
        self.write_u32(slot.map_or(0, Product::value));
    }

    pub fn write_u32(&mut self, v: u32) {
        self.absorb(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.absorb(&v.to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.state
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::product;

    #[test]
    fn clock_stops_at_end() {
        let mut clock = SimClock::new(2);
        assert_eq!(clock.advance(), Some(1));
        assert_eq!(clock.advance(), Some(2));
        assert!(clock.is_over());
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.elapsed(), 2);
    }

    #[test]
    fn zero_end_tick_is_over_immediately() {
        let mut clock = SimClock::new(0);
        assert!(clock.is_over());
        assert_eq!(clock.advance(), None);
    }

    #[test]
    fn same_slots_same_fingerprint() {
        let belt = [Some(product(3)), None, Some(product(7))];
        let fingerprint = || {
            let mut hash = StateHash::new();
            hash.write_u64(12);
            for slot in belt {
                hash.write_slot(slot);
            }
            hash.finish()
        };
        assert_eq!(fingerprint(), fingerprint());
    }

    #[test]
    fn product_moving_one_slot_changes_fingerprint() {
        let mut before = StateHash::new();
        for slot in [None, Some(product(5)), None] {
            before.write_slot(slot);
        }
        let mut after = StateHash::new();
        for slot in [Some(product(5)), None, None] {
            after.write_slot(slot);
        }
        assert_ne!(before.finish(), after.finish());
    }

    #[test]
    fn empty_slot_hashes_like_zero() {
        let mut empty = StateHash::new();
        empty.write_slot(None);
        let mut zero = StateHash::new();
        zero.write_u32(0);
        assert_eq!(empty.finish(), zero.finish());
        assert_ne!(StateHash::new().finish(), empty.finish());
    }
}
