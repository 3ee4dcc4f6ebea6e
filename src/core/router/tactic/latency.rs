//! `LatencyBased`: keep current while its chosen latency statistic is
//! under threshold, otherwise switch to the lowest-latency candidate.

use super::config::{ComparisonMode, LatencyBasedParams};
use super::{best_index_with_tiebreak, current_index, RuleView, TacticContext};

fn latency_of(view: &RuleView<'_>, idx: usize, params: &LatencyBasedParams) -> f64 {
    let stats = view.candidates[idx].stats().latency_stats();
    if stats.count == 0 {
        return 2.0 * params.latency_threshold_ms as f64;
    }
    match params.comparison_mode {
        ComparisonMode::Avg => stats.avg,
        ComparisonMode::P50 => stats.p50,
        ComparisonMode::P95 => stats.p95,
        ComparisonMode::P99 => stats.p99,
    }
}

pub fn select(params: &LatencyBasedParams, view: &RuleView<'_>, _ctx: &TacticContext<'_>) -> usize {
    let current = current_index(view).unwrap_or(0);
    if latency_of(view, current, params) < params.latency_threshold_ms as f64 {
        return current;
    }
    best_index_with_tiebreak(view.candidates, Some(current), true, |i| latency_of(view, i, params))
}
