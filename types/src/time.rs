//! Timestamp type used throughout the backend.
//!
//! Timestamps are Unix epoch seconds (UTC). Vote decay is computed from the
//! age of a vote relative to an explicit `now` passed in by the caller, so
//! the core never reads the system clock itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Age of this timestamp in fractional hours (relative to `now`).
    ///
    /// Saturates to 0.0 when `now` is earlier than this timestamp, so a vote
    /// from a slightly-skewed clock never gains weight.
    pub fn age_hours(&self, now: Timestamp) -> f64 {
        self.elapsed_since(now) as f64 / 3600.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
