//! Lock-free heading cell.

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{normalize_degrees, HeadingReading, HeadingStatus};

/// NaN bit pattern; a normalized heading can never produce it
const UNAVAILABLE_BITS: u64 = u64::MAX;

/// Latest heading, stored as the bits of one `f64` in a single atomic word
///
/// Status and value live in the same word, so a reader can never observe
/// an available status paired with a stale or half-written angle.
#[derive(Debug)]
pub struct HeadingCell {
    bits: AtomicU64,
}

impl HeadingCell {
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(UNAVAILABLE_BITS),
        }
    }

    /// Publish a new heading (normalized into `[0, 360)`)
    pub fn store(&self, degrees: f64) {
        let normalized = normalize_degrees(degrees);
        self.bits.store(normalized.to_bits(), Ordering::Release);
    }

    pub fn load(&self) -> HeadingReading {
        match self.bits.load(Ordering::Acquire) {
            UNAVAILABLE_BITS => HeadingReading::UNAVAILABLE,
            bits => HeadingReading {
                degrees: f64::from_bits(bits),
                status: HeadingStatus::Available,
            },
        }
    }

    /// Back to unavailable
    pub fn clear(&self) {
        self.bits.store(UNAVAILABLE_BITS, Ordering::Release);
    }
}

impl Default for HeadingCell {
    fn default() -> Self {
        Self::new()
    }
}
