//! Process-wide round-robin streak state, shared across every [`crate::core::router::rule::Rule`]
//! using the `RoundRobin` or `Hybrid` tactics.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Injected streak state so tests can supply an isolated store and so
/// multiple rules sharing a process share state deterministically.
///
/// Round-robin's invocation contract is "exactly one read-modify-write per
/// selection", which `compare_and_swap` expresses directly: callers read
/// the current streak, compute the next state, and retry on contention
/// rather than holding a lock across the decision.
pub trait StreakStore: Send + Sync {
    /// Current streak for a rule, or 0 if never selected.
    fn load(&self, rule_uuid: &str) -> u64;

    /// Unconditionally set a rule's streak.
    fn store(&self, rule_uuid: &str, value: u64);

    /// Set a rule's streak to `new` iff it currently equals `current`.
    /// Returns whether the swap happened.
    fn compare_and_swap(&self, rule_uuid: &str, current: u64, new: u64) -> bool;

    /// Drop the streak entry for a deleted rule, so a long-lived process
    /// with churning rule uuids doesn't leak entries.
    fn remove(&self, rule_uuid: &str);
}

/// Default in-memory store: one atomic counter per rule uuid in a
/// concurrent map.
#[derive(Debug, Default)]
pub struct DashMapStreakStore {
    streaks: DashMap<String, AtomicU64>,
}

impl DashMapStreakStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreakStore for DashMapStreakStore {
    fn load(&self, rule_uuid: &str) -> u64 {
        self.streaks
            .get(rule_uuid)
            .map(|s| s.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn store(&self, rule_uuid: &str, value: u64) {
        self.streaks
            .entry(rule_uuid.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .store(value, Ordering::Relaxed);
    }

    fn compare_and_swap(&self, rule_uuid: &str, current: u64, new: u64) -> bool {
        let entry = self
            .streaks
            .entry(rule_uuid.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        entry
            .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn remove(&self, rule_uuid: &str) {
        self.streaks.remove(rule_uuid);
    }
}
