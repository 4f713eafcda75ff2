//! Aging policy: effective priority as a function of wait time.
//!
//! Lower numbers are more urgent. Every `aging_interval` seconds a queued
//! request waits, its effective priority improves by one, down to a floor
//! of [`HIGHEST_PRIORITY`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::serde::TimestampMs;

/// The most urgent effective priority a request can reach.
pub const HIGHEST_PRIORITY: u32 = 1;

/// Default seconds of waiting per unit of priority boost.
pub const DEFAULT_AGING_INTERVAL_SECS: u64 = 30;

/// Whole seconds elapsed between `requested_at` and `now`, zero if `now`
/// precedes `requested_at`.
pub const fn wait_seconds(requested_at: TimestampMs, now: TimestampMs) -> u64 {
    let waited_secs = now.saturating_sub(requested_at) / 1_000;
    if waited_secs > u64::MAX as u128 {
        u64::MAX
    } else {
        waited_secs as u64
    }
}

/// `max(1, base - floor(wait_seconds / aging_interval_secs))`.
///
/// An `aging_interval_secs` of zero disables aging rather than dividing by
/// zero; configuration validation rejects it anyway.
pub const fn effective_priority(
    base: u32,
    requested_at: TimestampMs,
    now: TimestampMs,
    aging_interval_secs: u64,
) -> u32 {
    let boost = if aging_interval_secs == 0 {
        0
    } else {
        wait_seconds(requested_at, now) / aging_interval_secs
    };
    let effective = (base as u64).saturating_sub(boost);
    if effective < HIGHEST_PRIORITY as u64 {
        HIGHEST_PRIORITY
    } else {
        effective as u32
    }
}

/// The aging interval bundled as a value, shared by the allocator and any
/// preview that must agree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingPolicy {
    /// Seconds of waiting per unit of priority boost.
    pub interval_secs: u64,
}

impl AgingPolicy {
    /// Policy with the given interval in seconds.
    pub const fn new(interval_secs: u64) -> Self {
        Self { interval_secs }
    }

    /// Interval as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Effective priority of a request with `base` priority queued at
    /// `requested_at`, evaluated at `now`.
    pub const fn effective(&self, base: u32, requested_at: TimestampMs, now: TimestampMs) -> u32 {
        effective_priority(base, requested_at, now, self.interval_secs)
    }
}

impl Default for AgingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AGING_INTERVAL_SECS)
    }
}
