//! The single entry point to routing: health-filters a rule's active
//! services, dispatches its tactic, and updates the rule's cursor.

use super::clock::Clock;
use super::error::RouterError;
use super::health_filter::HealthFilter;
use super::random::RandomSource;
use super::rule::Rule;
use super::service::Service;
use super::streak::StreakStore;
use super::tactic::{self, RuleView, TacticContext};

/// Stateless selection pipeline. Holds no state itself; every call is
/// handed the rule, health filter, and shared context it needs.
pub struct Selector;

impl Selector {
    /// Run the selection pipeline for one request against `rule`.
    pub fn select<'s>(
        rule: &'s Rule,
        health_filter: &HealthFilter<'_>,
        clock: &dyn Clock,
        random: &dyn RandomSource,
        streaks: &dyn StreakStore,
    ) -> Result<&'s Service, RouterError> {
        let active = rule.active_services();
        if active.is_empty() {
            return Err(RouterError::NoActiveService(rule.uuid().to_string()));
        }

        let candidates = health_filter.filter_with_fallback(&active, clock);

        let current_service_id = rule.current_service_id();
        let view = RuleView {
            uuid: rule.uuid(),
            current_service_id: &current_service_id,
            candidates: &candidates,
        };
        let ctx = TacticContext { clock, random, streaks };

        let chosen_idx = tactic::select(rule.tactic(), &view, &ctx)
            .ok_or_else(|| RouterError::SelectionFailed(rule.uuid().to_string()))?;
        let chosen = candidates[chosen_idx];

        if chosen.id() != current_service_id {
            rule.set_current_service_id(chosen.id());
        }

        Ok(chosen)
    }
}
