//! Injectable time source.
//!
//! Every component that reasons about windows or cooldowns takes a `&dyn Clock`
//! rather than calling `SystemTime::now()` directly, so tests can drive time
//! deterministically instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A monotonic-enough millisecond time source.
///
/// The default implementation is wall-clock based; tests inject a
/// [`ManualClock`] instead.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since an arbitrary but fixed epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock implementation backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock tests can advance by hand, for deterministic window/cooldown assertions.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock starting at the given timestamp.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute timestamp.
    pub fn set(&self, at_ms: u64) {
        self.now_ms.store(at_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
