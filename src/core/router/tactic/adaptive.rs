//! `Adaptive`: blends latency, token-load, speed, and health sub-scores
//! into a composite and picks the argmax.
//!
//! `scoring_mode` is given three genuinely distinct combination rules
//! rather than all collapsing to the same weighted sum (see the open
//! question this resolves, recorded in the design notes): `weighted_sum`
//! is the documented default; `multiplicative` combines sub-scores as a
//! weighted geometric mean, so a single near-zero dimension dominates the
//! composite instead of being averaged away; `rank_based` scores each
//! candidate by its relative rank per dimension rather than raw magnitude,
//! which is less sensitive to outlier sample values.

use super::config::{AdaptiveParams, ScoringMode};
use super::{best_index_with_tiebreak, current_index, RuleView, TacticContext};

struct SubScores {
    latency: f64,
    token: f64,
    speed: f64,
    health: f64,
}

fn sub_scores(view: &RuleView<'_>, idx: usize, ctx: &TacticContext<'_>, params: &AdaptiveParams) -> SubScores {
    let svc = view.candidates[idx];
    let latency_stats = svc.stats().latency_stats();
    let latency = if latency_stats.count == 0 {
        0.5
    } else {
        (1.0 - latency_stats.avg / params.max_latency_ms).max(0.0)
    };

    let tokens = svc.stats().window_stats(ctx.clock).tokens as f64;
    let token = if params.max_token_usage == 0.0 {
        0.5
    } else {
        (1.0 - tokens / params.max_token_usage).max(0.0)
    };

    let speed_stats = svc.stats().token_speed_stats();
    let speed = if speed_stats.count == 0 {
        0.5
    } else {
        (speed_stats.avg / (2.0 * params.min_speed_tps)).min(1.0)
    };

    SubScores { latency, token, speed, health: 1.0 }
}

fn weighted_sum(s: &SubScores, p: &AdaptiveParams) -> f64 {
    p.latency_weight * s.latency + p.token_weight * s.token + p.speed_weight * s.speed + p.health_weight * s.health
}

fn multiplicative(s: &SubScores, p: &AdaptiveParams) -> f64 {
    fn term(weight: f64, score: f64) -> f64 {
        if weight <= 0.0 {
            return 1.0;
        }
        score.max(1e-9).powf(weight)
    }
    term(p.latency_weight, s.latency) * term(p.token_weight, s.token) * term(p.speed_weight, s.speed) * term(p.health_weight, s.health)
}

/// Rank-based composite: for each dimension, candidates are ranked best
/// (score 1.0) to worst (score 0.0) and the weighted sum of those rank
/// scores becomes the composite. Computed over the whole candidate set so
/// a single candidate's score is relative to its peers.
fn rank_based_composites(view: &RuleView<'_>, ctx: &TacticContext<'_>, params: &AdaptiveParams) -> Vec<f64> {
    let n = view.candidates.len();
    let raw: Vec<SubScores> = (0..n).map(|i| sub_scores(view, i, ctx, params)).collect();

    let rank_scores = |extract: &dyn Fn(&SubScores) -> f64| -> Vec<f64> {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| extract(&raw[b]).partial_cmp(&extract(&raw[a])).unwrap());
        let mut out = vec![0.0; n];
        for (rank, idx) in order.into_iter().enumerate() {
            out[idx] = if n > 1 { 1.0 - (rank as f64 / (n - 1) as f64) } else { 1.0 };
        }
        out
    };

    let latency_ranks = rank_scores(&|s| s.latency);
    let token_ranks = rank_scores(&|s| s.token);
    let speed_ranks = rank_scores(&|s| s.speed);

    (0..n)
        .map(|i| {
            params.latency_weight * latency_ranks[i]
                + params.token_weight * token_ranks[i]
                + params.speed_weight * speed_ranks[i]
                + params.health_weight * 1.0
        })
        .collect()
}

pub fn select(params: &AdaptiveParams, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> usize {
    let current = current_index(view);

    match params.scoring_mode {
        ScoringMode::RankBased => {
            let composites = rank_based_composites(view, ctx, params);
            best_index_with_tiebreak(view.candidates, current, false, |i| composites[i])
        }
        mode => {
            let combine: fn(&SubScores, &AdaptiveParams) -> f64 = match mode {
                ScoringMode::Multiplicative => multiplicative,
                _ => weighted_sum,
            };
            best_index_with_tiebreak(view.candidates, current, false, |i| {
                combine(&sub_scores(view, i, ctx, params), params)
            })
        }
    }
}
