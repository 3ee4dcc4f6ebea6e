//! Multi-tenant routing and load-balancing core.
//!
//! Entry point is [`selector::Selector::select`]: given a [`rule::Rule`],
//! it applies [`health_filter::HealthFilter`] over the rule's active
//! services, dispatches the rule's configured tactic, updates the rule's
//! current-service cursor, and returns the chosen service. Callers then
//! issue the upstream call themselves and report the outcome back into
//! [`stats::ServiceStats`] and [`health::HealthMonitor`].

pub mod clock;
pub mod error;
pub mod health;
pub mod health_filter;
pub mod random;
pub mod registry;
pub mod rule;
pub mod selector;
pub mod service;
pub mod stats;
pub mod streak;
pub mod tactic;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RouterError;
pub use health::{HealthMonitor, HealthMonitorConfig};
pub use health_filter::HealthFilter;
pub use random::{FixedRandomSource, RandomSource, SeededRandomSource, ThreadRandomSource};
pub use registry::RuleRegistry;
pub use rule::{Rule, Scenario};
pub use selector::Selector;
pub use service::Service;
pub use stats::{LatencyStats, ServiceStats, SpeedStats, WindowStats};
pub use streak::{DashMapStreakStore, StreakStore};
pub use tactic::config::TacticConfig;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use tactic::config::{HybridParams, LatencyBasedParams, SpeedBasedParams, TacticConfig};

    fn services_abc() -> Vec<Service> {
        vec![
            Service::new("openai", "gpt-4o", 1, true),
            Service::new("anthropic", "claude-3", 1, true),
            Service::new("azure", "gpt-4o", 1, true),
        ]
    }

    #[test]
    fn end_to_end_latency_switch_scenario() {
        let services = services_abc();
        services[0].stats().record_latency(300.0);
        services[1].stats().record_latency(200.0);
        services[2].stats().record_latency(100.0);
        let first_id = services[0].id().to_string();

        let rule = Rule::new(
            "rule-latency",
            Scenario::Global,
            services,
            TacticConfig::LatencyBased(LatencyBasedParams { latency_threshold_ms: 150, ..Default::default() }),
            true,
        )
        .unwrap();
        rule.set_current_service_id(&first_id);

        let clock = ManualClock::new(0);
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let filter = HealthFilter::passthrough();

        let chosen = Selector::select(&rule, &filter, &clock, &random, &streaks).unwrap();
        assert_eq!(chosen.id(), "azure:gpt-4o");
    }

    #[test]
    fn unknown_tactic_kind_is_rejected_at_parse_time() {
        let result = TacticConfig::from_map("teleport", &serde_json::Map::new());
        assert!(matches!(result, Err(RouterError::UnknownTactic(_))));
    }

    #[test]
    fn rule_deletion_prunes_its_streak_entry() {
        let streaks = DashMapStreakStore::new();
        streaks.store("rule-to-delete", 42);
        streaks.remove("rule-to-delete");
        assert_eq!(streaks.load("rule-to-delete"), 0);
    }

    #[test]
    fn hybrid_ties_use_shared_tiebreak() {
        let services = services_abc();
        let rule = Rule::new(
            "rule-hybrid",
            Scenario::Global,
            services,
            TacticConfig::Hybrid(HybridParams::default()),
            true,
        )
        .unwrap();
        rule.set_current_service_id("openai:gpt-4o");

        let clock = ManualClock::new(0);
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let filter = HealthFilter::passthrough();

        // All windows are empty, so the current service stays under threshold.
        let chosen = Selector::select(&rule, &filter, &clock, &random, &streaks).unwrap();
        assert_eq!(chosen.id(), "openai:gpt-4o");
    }

    #[test]
    fn speed_insufficient_samples_scenario() {
        let services = vec![
            Service::new("p", "x", 1, true),
            Service::new("p", "y", 1, true),
        ];
        services[0].stats().record_token_speed(100.0);
        services[0].stats().record_token_speed(100.0);
        for _ in 0..5 {
            services[1].stats().record_token_speed(50.0);
        }

        let rule = Rule::new(
            "rule-speed",
            Scenario::Global,
            services,
            TacticConfig::SpeedBased(SpeedBasedParams { min_samples_required: 5, ..Default::default() }),
            true,
        )
        .unwrap();

        let clock = ManualClock::new(0);
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let filter = HealthFilter::passthrough();

        let chosen = Selector::select(&rule, &filter, &clock, &random, &streaks).unwrap();
        assert_eq!(chosen.id(), "p:y");
    }
}
