//! `RoundRobin`: sticky on the current service for `request_threshold`
//! selections, then advances to the next candidate.

use super::config::RoundRobinParams;
use super::{current_index, RuleView, TacticContext};

pub fn select(params: &RoundRobinParams, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> usize {
    let n = view.candidates.len();
    let i = current_index(view).unwrap_or(0);
    let threshold = params.request_threshold.max(1) as u64;

    loop {
        let streak = ctx.streaks.load(view.uuid);
        let (next_index, next_streak) = if streak < threshold {
            (i, streak + 1)
        } else {
            ((i + 1) % n, 1)
        };
        if ctx.streaks.compare_and_swap(view.uuid, streak, next_streak) {
            return next_index;
        }
    }
}
