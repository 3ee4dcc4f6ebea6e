//! `TokenBased`: stays on the current service while its windowed token
//! usage is below threshold, otherwise moves to the least-loaded candidate.

use super::config::TokenBasedParams;
use super::{best_index_with_tiebreak, current_index, RuleView, TacticContext};

pub fn select(params: &TokenBasedParams, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> usize {
    let current = current_index(view).unwrap_or(0);
    let tokens = view.candidates[current].stats().window_stats(ctx.clock).tokens;
    if (tokens as i64) < params.token_threshold {
        return current;
    }
    best_index_with_tiebreak(view.candidates, Some(current), true, |i| {
        view.candidates[i].stats().window_stats(ctx.clock).tokens as f64
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::clock::ManualClock;
    use crate::core::router::random::ThreadRandomSource;
    use crate::core::router::service::Service;
    use crate::core::router::streak::DashMapStreakStore;

    #[test]
    fn stays_current_when_below_threshold() {
        let a = Service::new("p", "a", 1, true);
        let b = Service::new("p", "b", 1, true);
        let clock = ManualClock::new(0);
        a.stats().record_request(50, &clock);

        let candidates: Vec<&Service> = vec![&a, &b];
        let params = TokenBasedParams { token_threshold: 100 };
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let ctx = TacticContext { clock: &clock, random: &random, streaks: &streaks };
        let view = RuleView { uuid: "r", current_service_id: "p:a", candidates: &candidates };

        for _ in 0..2 {
            assert_eq!(select(&params, &view, &ctx), 0);
        }
    }

    #[test]
    fn switches_to_least_loaded_past_threshold() {
        let a = Service::new("p", "a", 1, true);
        let b = Service::new("p", "b", 1, true);
        let clock = ManualClock::new(0);
        a.stats().record_request(500, &clock);
        b.stats().record_request(10, &clock);

        let candidates: Vec<&Service> = vec![&a, &b];
        let params = TokenBasedParams { token_threshold: 100 };
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let ctx = TacticContext { clock: &clock, random: &random, streaks: &streaks };
        let view = RuleView { uuid: "r", current_service_id: "p:a", candidates: &candidates };

        assert_eq!(select(&params, &view, &ctx), 1);
    }
}
