//! `Random`: weighted-random over positive weights when any candidate
//! carries one, otherwise uniform random.

use super::config::RandomParams;
use super::{RuleView, TacticContext};

pub fn select(_params: &RandomParams, view: &RuleView<'_>, ctx: &TacticContext<'_>) -> usize {
    let candidates = view.candidates;
    let total_weight: f64 = candidates.iter().map(|s| s.weight() as f64).filter(|w| *w > 0.0).sum();

    if total_weight > 0.0 {
        let mut remaining = ctx.random.next_f64() * total_weight;
        for (i, svc) in candidates.iter().enumerate() {
            let w = svc.weight() as f64;
            if w <= 0.0 {
                continue;
            }
            remaining -= w;
            if remaining <= 0.0 {
                return i;
            }
        }
        return candidates.len() - 1;
    }

    let draw = ctx.random.next_f64();
    let idx = (draw * candidates.len() as f64) as usize;
    idx.min(candidates.len() - 1)
}
