//! Process-wide rule registry: the external-config-reload side of the
//! core. Rule replacement is a whole-structure swap; stats for services
//! whose id survives the replacement are re-attached rather than reset,
//! so a reload doesn't discard warmup.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use super::rule::Rule;
use super::service::Service;
use super::streak::StreakStore;

/// Holds one rule per uuid behind an `ArcSwap`, so a reader can grab a
/// consistent `Arc<Rule>` snapshot while a writer replaces it atomically —
/// no reader ever observes a rule mid-reload.
#[derive(Default)]
pub struct RuleRegistry {
    rules: DashMap<String, ArcSwap<Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a brand-new rule, or overwrite an existing uuid's rule
    /// without attempting stats carry-over (use [`Self::replace`] for that).
    pub fn insert(&self, rule: Rule) {
        self.rules
            .insert(rule.uuid().to_string(), ArcSwap::new(Arc::new(rule)));
    }

    /// Current snapshot for a rule, or `None` if no rule with that uuid is
    /// registered.
    pub fn get(&self, uuid: &str) -> Option<Arc<Rule>> {
        self.rules.get(uuid).map(|entry| entry.load_full())
    }

    /// Replace the rule at `new_rule`'s uuid. Services in `new_rule` whose
    /// id matches a service in the prior version have their stats handle
    /// carried over; new ids get fresh stats.
    pub fn replace(&self, new_rule: Rule) {
        let uuid = new_rule.uuid().to_string();
        let Some(entry) = self.rules.get(&uuid) else {
            self.insert(new_rule);
            return;
        };
        let previous = entry.load_full();
        let (uuid, scenario, services, tactic, active) = new_rule.into_parts();

        let rebuilt: Vec<Service> = services
            .into_iter()
            .map(|svc| match previous.services().iter().find(|old| old.id() == svc.id()) {
                Some(old) => {
                    Service::with_stats(svc.provider(), svc.model(), svc.weight(), svc.active(), old.stats_arc())
                }
                None => svc,
            })
            .collect();

        let rebuilt_rule = Rule::new(uuid, scenario, rebuilt, tactic, active)
            .expect("uuid was already validated by the rule being replaced");
        rebuilt_rule.set_current_service_id(previous.current_service_id());
        entry.store(Arc::new(rebuilt_rule));
    }

    /// Drop a rule and its round-robin streak entry. Matches the
    /// documented lifecycle: the streak map entry is removed when the
    /// rule is deleted.
    pub fn remove(&self, uuid: &str, streaks: &dyn StreakStore) {
        self.rules.remove(uuid);
        streaks.remove(uuid);
    }
}
