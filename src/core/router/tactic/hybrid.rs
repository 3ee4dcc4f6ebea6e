//! `Hybrid`: keep current while both its request and token counts are
//! below threshold, otherwise minimize a blended `requests*10 + tokens` score.

use super::config::HybridParams;
use super::{best_index_with_tiebreak, current_index, RuleView, TacticContext};

pub fn select(params: &HybridParams, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> usize {
    let current = current_index(view).unwrap_or(0);
    let window = view.candidates[current].stats().window_stats(ctx.clock);
    if (window.requests as i64) < params.request_threshold && (window.tokens as i64) < params.token_threshold {
        return current;
    }
    best_index_with_tiebreak(view.candidates, Some(current), true, |i| {
        let w = view.candidates[i].stats().window_stats(ctx.clock);
        w.requests as f64 * 10.0 + w.tokens as f64
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
    fn switches_when_either_threshold_exceeded() {
        let a = Service::new("p", "a", 1, true);
        let b = Service::new("p", "b", 1, true);
        let clock = ManualClock::new(0);
        for _ in 0..150 {
            a.stats().record_request(1, &clock);
        }
        b.stats().record_request(1, &clock);

        let candidates: Vec<&Service> = vec![&a, &b];
        let params = HybridParams { request_threshold: 100, token_threshold: 100_000 };
        let random = ThreadRandomSource;
        let streaks = DashMapStreakStore::new();
        let ctx = TacticContext { clock: &clock, random: &random, streaks: &streaks };
        let view = RuleView { uuid: "r", current_service_id: "p:a", candidates: &candidates };

        assert_eq!(select(&params, &view, &ctx), 1);
    }
}
