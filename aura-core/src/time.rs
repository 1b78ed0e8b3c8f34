//! Time sources for history timestamps
//!
//! History entries are stamped in milliseconds since the Unix epoch. The
//! clock is injected so that tests can pin and advance time explicitly.

use core::sync::atomic::{AtomicU64, Ordering};

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Milliseconds in one hour
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Source of time for the system
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs fixed/test time)
    fn is_wall_clock(&self) -> bool;
}

/// Wall clock (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
///
/// Shared through an `Arc`, the owner can keep advancing the clock after
/// handing it to a service.
#[derive(Debug, Default)]
pub struct FixedTime {
    timestamp: AtomicU64,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: AtomicU64::new(timestamp) }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::SeqCst)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Start of a trailing window of `hours`, saturating at the epoch
pub fn window_start(now: Timestamp, hours: u32) -> Timestamp {
    now.saturating_sub(hours as u64 * MS_PER_HOUR)
}
