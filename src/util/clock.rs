//! Time sources for wait-time and timestamp computation.
//!
//! Everything in the scheduler reads time through [`Clock`], so tests can
//! drive aging deterministically with [`ManualClock`].

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::util::serde::TimestampMs;

/// Wall-clock milliseconds since the Unix epoch. Returns 0 if the system
/// clock is set before 1970.
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Source of "now" in epoch milliseconds. Must never go backwards.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> TimestampMs;
}

/// Production clock: epoch-anchored once, then advanced by a monotonic
/// [`Instant`], so wall-clock adjustments cannot make time run backwards.
#[derive(Debug, Clone)]
pub struct SystemClock {
    anchor_ms: TimestampMs,
    anchor: Instant,
}

impl SystemClock {
    /// Anchor a new clock at the current wall-clock time.
    pub fn new() -> Self {
        Self {
            anchor_ms: now_ms(),
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        self.anchor_ms + self.anchor.elapsed().as_millis()
    }
}

/// Manually advanced clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<TimestampMs>,
}

impl ManualClock {
    /// Start the clock at `start_ms`.
    pub fn new(start_ms: TimestampMs) -> Self {
        Self {
            now: Mutex::new(start_ms),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by.as_millis();
    }

    /// Jump to `to_ms`; ignored if it would move time backwards.
    pub fn set(&self, to_ms: TimestampMs) {
        let mut now = self.now.lock();
        if to_ms >= *now {
            *now = to_ms;
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        *self.now.lock()
    }
}
