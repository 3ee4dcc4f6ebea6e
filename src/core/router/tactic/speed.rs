//! `SpeedBased`: picks the fastest candidate with enough samples to trust,
//! preferring ones that also clear the throughput threshold.

use super::config::SpeedBasedParams;
use super::{best_index_with_tiebreak, current_index, RuleView, TacticContext};

pub fn select(params: &SpeedBasedParams, view: &RuleView<'_>, _ctx: &TacticContext<'_>) -> usize {
    let min_samples = params.min_samples_required.max(1) as usize;
    let eligible: Vec<usize> = (0..view.candidates.len())
        .filter(|&i| view.candidates[i].stats().token_speed_stats().count >= min_samples)
        .collect();

    if eligible.is_empty() {
        return 0;
    }

    let meets_threshold: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|&i| view.candidates[i].stats().token_speed_stats().avg >= params.speed_threshold_tps)
        .collect();

    let pool = if meets_threshold.is_empty() { &eligible } else { &meets_threshold };
    let current = current_index(view);
    let current_in_pool = current.filter(|c| pool.contains(c));

    let best_in_pool = best_index_with_tiebreak_over(pool, current_in_pool, |i| {
        view.candidates[i].stats().token_speed_stats().avg
    });
    best_in_pool
}

/// Like the shared tie-break helper, but scans an explicit index pool
/// instead of the full `0..n` range (speed restricts to eligible/threshold
/// subsets before picking a winner).
fn best_index_with_tiebreak_over<F>(pool: &[usize], current: Option<usize>, score: F) -> usize
where
    F: Fn(usize) -> f64,
{
    let mut best = pool[0];
    let mut best_score = score(best);
    for &i in &pool[1..] {
        let s = score(i);
        if s > best_score {
            best_score = s;
            best = i;
        }
    }
    if let Some(ci) = current {
        if score(ci) == best_score {
            best = ci;
        }
    }
    best
}
