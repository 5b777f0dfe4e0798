//! # Temporal Types — Epoch-Second Timestamps and Injected Clocks
//!
//! Records store `issued_at` and `expires_at` as unsigned 64-bit Unix epoch
//! seconds. `Timestamp` wraps that value; it can represent every `u64` a
//! record may carry, including instants chrono cannot render.
//!
//! `issued_at` is stamped by the registry from a [`Clock`], never taken from
//! the caller, so a credential cannot be backdated. Expiry is likewise
//! evaluated against the clock at read time.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix epoch timestamp in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// Wrap a number of seconds since the Unix epoch.
    pub const fn from_epoch_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }

    /// Seconds since the Unix epoch.
    pub const fn epoch_secs(&self) -> u64 {
        self.0
    }

    /// Convert to a chrono datetime, if the value is within chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.0).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Render as ISO8601 with Z suffix (e.g. `2100-01-01T00:00:00Z`).
    ///
    /// Values beyond chrono's range fall back to the raw second count.
    pub fn to_iso8601(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            None => format!("@{}", self.0),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(u64::try_from(dt.timestamp()).unwrap_or(0))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Source of the registry's authoritative time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock for deterministic tests and replay.
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    /// Create a clock frozen at `timestamp`.
    pub const fn new(timestamp: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(timestamp.0),
        }
    }

    /// Move the clock to an absolute time.
    pub fn set(&self, timestamp: Timestamp) {
        self.secs.store(timestamp.0, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs` seconds, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let _ = self
            .secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(secs))
            });
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::SeqCst))
    }
}
