//! Clock and timing utilities for measurement sessions.
//!
//! The pose-hold timer never reads the system clock directly. Sessions are
//! handed a [`Clock`] so the hold duration can be driven by a real monotonic
//! clock in production and by a manually advanced one in tests and replays.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

/// Source of session-relative time.
pub trait Clock {
    /// Nanoseconds elapsed since the clock's epoch.
    fn elapsed_ns(&self) -> u64;

    /// Wall-clock time corresponding to `elapsed_ns()`.
    fn wall_now(&self) -> DateTime<Utc>;

    /// Seconds elapsed since the clock's epoch.
    fn elapsed_secs(&self) -> f64 {
        ns_to_secs(self.elapsed_ns())
    }
}

/// A monotonic clock anchored to the moment a session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch.
    epoch_wall: DateTime<Utc>,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: Utc::now(),
        }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> DateTime<Utc> {
        self.epoch_wall
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SessionClock {
    fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.epoch_wall + Duration::nanoseconds(self.elapsed_ns() as i64)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same counter, so a test can keep one handle and give
/// the other to a session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ns: Arc<AtomicU64>,
    epoch_wall: DateTime<Utc>,
}

impl ManualClock {
    /// Create a manual clock at zero, with the Unix epoch as wall time.
    pub fn new() -> Self {
        Self::with_epoch(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Create a manual clock at zero with a specific wall-clock epoch.
    pub fn with_epoch(epoch_wall: DateTime<Utc>) -> Self {
        Self {
            now_ns: Arc::new(AtomicU64::new(0)),
            epoch_wall,
        }
    }

    /// Jump to an absolute session time. Going backwards is ignored.
    pub fn set_ns(&self, ns: u64) {
        self.now_ns.fetch_max(ns, Ordering::SeqCst);
    }

    /// Move forward by `ns` nanoseconds.
    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.fetch_add(ns, Ordering::SeqCst);
    }

    /// Move forward by `secs` seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance_ns(secs_to_ns(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn elapsed_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.epoch_wall + Duration::nanoseconds(self.elapsed_ns() as i64)
    }
}

/// Convert a nanosecond value to seconds.
pub fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / 1_000_000_000.0
}

/// Convert seconds to the nearest nanosecond. Negative input saturates to zero.
pub fn secs_to_ns(secs: f64) -> u64 {
    (secs.max(0.0) * 1_000_000_000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_clock_elapsed() {
        let clock = SessionClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_ns() < 1_000_000_000); // less than 1 second
        assert!(clock.wall_now() >= clock.epoch_wall());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(secs_to_ns(2.0), 2_000_000_000);
        assert_eq!(secs_to_ns(-1.0), 0);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_secs(1.5);
        assert_eq!(clock.elapsed_ns(), 1_500_000_000);

        handle.set_ns(2_000_000_000);
        assert!((clock.elapsed_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let clock = ManualClock::new();
        clock.set_ns(5_000);
        clock.set_ns(1_000);
        assert_eq!(clock.elapsed_ns(), 5_000);
    }

    #[test]
    fn test_manual_clock_wall_time_tracks_elapsed() {
        let clock = ManualClock::new();
        clock.advance_secs(60.0);
        assert_eq!(
            clock.wall_now(),
            DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(60)
        );
    }
}
