//! The pluggable load-balancing tactic family.
//!
//! Every tactic shares the signature `select(view, ctx) -> Option<usize>`:
//! given the candidate slice exposed by [`RuleView`] and shared context
//! (clock, random source, streak store), it returns the index of the
//! chosen candidate, or `None` only when the candidate slice is empty.

pub mod adaptive;
pub mod config;
pub mod hybrid;
pub mod latency;
pub mod random_pick;
pub mod round_robin;
pub mod speed;
pub mod token_based;

use crate::core::router::clock::Clock;
use crate::core::router::random::RandomSource;
use crate::core::router::service::Service;
use crate::core::router::streak::StreakStore;

use self::config::TacticConfig;

/// The candidate slice and rule identity a tactic selects over, assembled
/// by the selector for each call.
pub struct RuleView<'a> {
    pub uuid: &'a str,
    pub current_service_id: &'a str,
    pub candidates: &'a [&'a Service],
}

/// Shared context every tactic may need: time, randomness, and the
/// process-wide round-robin streak state. Bundled so adding a new tactic
/// never changes the dispatch signature.
pub struct TacticContext<'a> {
    pub clock: &'a dyn Clock,
    pub random: &'a dyn RandomSource,
    pub streaks: &'a dyn StreakStore,
}

/// Dispatch a configured tactic against a candidate view.
///
/// Shared preconditions (documented, not re-checked per tactic): an empty
/// candidate slice returns `None`; a single-candidate slice returns index 0
/// without running the tactic's scoring logic.
pub fn select(config: &TacticConfig, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> Option<usize> {
    if view.candidates.is_empty() {
        return None;
    }
    if view.candidates.len() == 1 {
        return Some(0);
    }
    Some(match config {
        TacticConfig::RoundRobin(params) => round_robin::select(params, view, ctx),
        TacticConfig::TokenBased(params) => token_based::select(params, view, ctx),
        TacticConfig::Hybrid(params) => hybrid::select(params, view, ctx),
        TacticConfig::Random(params) => random_pick::select(params, view, ctx),
        TacticConfig::LatencyBased(params) => latency::select(params, view, ctx),
        TacticConfig::SpeedBased(params) => speed::select(params, view, ctx),
        TacticConfig::Adaptive(params) => adaptive::select(params, view, ctx),
    })
}

/// Index of `current_service_id` in `candidates`, or `None` if absent
/// (including when `current_service_id` is empty).
pub(crate) fn current_index(view: &RuleView<'_>) -> Option<usize> {
    if view.current_service_id.is_empty() {
        return None;
    }
    view.candidates
        .iter()
        .position(|s| s.id() == view.current_service_id)
}

/// Single-pass best-score search with the shared tie-break rule: prefer the
/// current service on an exact tie, otherwise prefer the earlier index.
///
/// `minimize` selects argmin when true, argmax when false.
pub(crate) fn best_index_with_tiebreak<F>(
    candidates: &[&Service],
    current_idx: Option<usize>,
    minimize: bool,
    score: F,
) -> usize
where
    F: Fn(usize) -> f64,
{
    let mut best_idx = 0usize;
    let mut best_score = score(0);
    for i in 1..candidates.len() {
        let s = score(i);
        let better = if minimize { s < best_score } else { s > best_score };
        if better {
            best_score = s;
            best_idx = i;
        }
    }
    if let Some(ci) = current_idx {
        if ci < candidates.len() && score(ci) == best_score {
            best_idx = ci;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiebreak_prefers_current_on_exact_tie() {
        let a = Service::new("p", "a", 1, true);
        let b = Service::new("p", "b", 1, true);
        let c = Service::new("p", "c", 1, true);
        let candidates: Vec<&Service> = vec![&a, &b, &c];
        let scores = [1.0, 1.0, 1.0];
        let idx = best_index_with_tiebreak(&candidates, Some(2), false, |i| scores[i]);
        assert_eq!(idx, 2);
    }

    #[test]
    fn tiebreak_prefers_earlier_index_without_current() {
        let a = Service::new("p", "a", 1, true);
        let b = Service::new("p", "b", 1, true);
        let candidates: Vec<&Service> = vec![&a, &b];
        let scores = [3.0, 3.0];
        let idx = best_index_with_tiebreak(&candidates, None, false, |i| scores[i]);
        assert_eq!(idx, 0);
    }
}
