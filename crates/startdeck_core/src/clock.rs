//! Injectable time source for gesture and hold timers.
//!
//! # Responsibility
//! - Give timer-driven state machines a clock they can be tested against.
//!
//! # Invariants
//! - `now()` is monotonic for a given clock instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source consumed by timer-driven components.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock implementation used by real hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for deterministic timer tests.
///
/// Clones share the same offset, so one handle can drive time forward while
/// other handles are held by the components under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advances the shared clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let millis = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(millis, Ordering::SeqCst);
    }

    /// Advances the shared clock by whole milliseconds.
    pub fn advance_ms(&self, millis: u64) {
        self.offset_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use std::time::Duration;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let before = handle.now();

        clock.advance(Duration::from_millis(250));
        assert_eq!(handle.now() - before, Duration::from_millis(250));
    }
}
