//! Per-service health tracking: rate-limit and consecutive-error cooldowns.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use super::clock::Clock;

const DEFAULT_RATE_LIMIT_COOLDOWN_MS: u64 = 60_000;
const DEFAULT_ERROR_COOLDOWN_MS: u64 = 30_000;
const DEFAULT_ERROR_THRESHOLD: u32 = 5;

/// Per-service health counters. Deadlines are stored as absolute
/// milliseconds rather than durations, so no per-service timer is needed.
#[derive(Debug, Default)]
struct HealthRecord {
    last_rate_limit_at_ms: AtomicU64,
    consecutive_errors: AtomicU32,
    recovery_deadline_ms: AtomicU64,
}

/// Tunable cooldown/threshold parameters. Defaults match the documented
/// values: 60s rate-limit cooldown, 30s error cooldown, 5-error threshold.
#[derive(Debug, Clone, Copy)]
pub struct HealthMonitorConfig {
    pub rate_limit_cooldown_ms: u64,
    pub error_cooldown_ms: u64,
    pub error_threshold: u32,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            rate_limit_cooldown_ms: DEFAULT_RATE_LIMIT_COOLDOWN_MS,
            error_cooldown_ms: DEFAULT_ERROR_COOLDOWN_MS,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
        }
    }
}

/// Tracks health signals for every service seen so far, keyed by service id.
///
/// Records are created lazily on first signal. All operations are lock-free
/// reads/writes against a per-key entry in a concurrent map, so readers
/// never block writers and there is no global mutex on this path.
pub struct HealthMonitor {
    config: HealthMonitorConfig,
    records: DashMap<String, HealthRecord>,
}

impl HealthMonitor {
    pub fn new(config: HealthMonitorConfig) -> Self {
        Self {
            config,
            records: DashMap::new(),
        }
    }

    /// Mark a service unhealthy for `rate_limit_cooldown_ms` from now.
    pub fn report_rate_limit(&self, service_id: &str, clock: &dyn Clock) {
        let now = clock.now_ms();
        let record = self.records.entry(service_id.to_string()).or_default();
        record.last_rate_limit_at_ms.store(now, Ordering::Relaxed);
        record
            .recovery_deadline_ms
            .store(now + self.config.rate_limit_cooldown_ms, Ordering::Relaxed);
    }

    /// Increment the consecutive-error counter; past the threshold, enter
    /// an error cooldown.
    pub fn report_error(&self, service_id: &str, clock: &dyn Clock) {
        let record = self.records.entry(service_id.to_string()).or_default();
        let errors = record.consecutive_errors.fetch_add(1, Ordering::Relaxed) + 1;
        if errors > self.config.error_threshold {
            let now = clock.now_ms();
            let deadline = now + self.config.error_cooldown_ms;
            let existing = record.recovery_deadline_ms.load(Ordering::Relaxed);
            if deadline > existing {
                record.recovery_deadline_ms.store(deadline, Ordering::Relaxed);
            }
        }
    }

    /// Reset the consecutive-error counter. Does not shorten an active
    /// rate-limit recovery deadline.
    pub fn report_success(&self, service_id: &str) {
        if let Some(record) = self.records.get(service_id) {
            record.consecutive_errors.store(0, Ordering::Relaxed);
        }
    }

    /// True iff the service has no active cooldown. Services never seen
    /// before are healthy by default. Once a cooldown's recovery deadline
    /// has passed, the consecutive-error count decays back to zero — time
    /// alone restores health, matching the documented cooldown contract,
    /// rather than leaving a service permanently unhealthy until an
    /// explicit `report_success`.
    pub fn is_healthy(&self, service_id: &str, clock: &dyn Clock) -> bool {
        let Some(record) = self.records.get(service_id) else {
            return true;
        };
        let now = clock.now_ms();
        let deadline = record.recovery_deadline_ms.load(Ordering::Relaxed);
        if deadline > now {
            return false;
        }
        if deadline > 0 {
            record.consecutive_errors.store(0, Ordering::Relaxed);
        }
        true
    }

    /// Drop the health record for a service, e.g. once it has been stably
    /// healthy for a long interval. Implementation-defined per the
    /// lifecycle notes; callers decide when "stable" applies.
    pub fn forget(&self, service_id: &str) {
        self.records.remove(service_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::clock::ManualClock;

    #[test]
    fn unseen_service_is_healthy() {
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        let clock = ManualClock::new(0);
        assert!(monitor.is_healthy("openai:gpt-4o", &clock));
    }

    #[test]
    fn rate_limit_enters_cooldown_and_recovers() {
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        let clock = ManualClock::new(0);
        monitor.report_rate_limit("a", &clock);
        assert!(!monitor.is_healthy("a", &clock));
        clock.advance(59_000);
        assert!(!monitor.is_healthy("a", &clock));
        clock.advance(2_000);
        assert!(monitor.is_healthy("a", &clock));
    }

    #[test]
    fn errors_below_threshold_stay_healthy() {
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        let clock = ManualClock::new(0);
        for _ in 0..5 {
            monitor.report_error("a", &clock);
        }
        assert!(monitor.is_healthy("a", &clock));
    }

    #[test]
    fn errors_past_threshold_enter_cooldown() {
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        let clock = ManualClock::new(0);
        for _ in 0..6 {
            monitor.report_error("a", &clock);
        }
        assert!(!monitor.is_healthy("a", &clock));
        clock.advance(30_001);
        assert!(monitor.is_healthy("a", &clock));
    }

    #[test]
    fn success_resets_error_counter_but_not_rate_limit_deadline() {
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        let clock = ManualClock::new(0);
        monitor.report_rate_limit("a", &clock);
        monitor.report_success("a");
        assert!(!monitor.is_healthy("a", &clock));
    }
}
