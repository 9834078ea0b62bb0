//! Ensemble Scorer: combines strategy outputs into a full 1..=90 score map.
//!
//! Grounded on the teacher's `services/analysis_service.rs`
//! `calculate_number_scores`, which already linearly combines several
//! named signals with configurable weights; this module generalizes that
//! to the strategy pool and adds the neighbor-redistribution and synergy
//! passes the spec requires. Per design note §9 this module depends on
//! strategies and analyzers but never on the Brain — the Brain calls in,
//! not the other way around.

use crate::models::{StrategyKey, Weights};
use crate::strategies::{PoolMember, StrategyContext};

const RANK_LIST_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap {
    pub scores: [f64; 90],
    pub votes: [u32; 90],
}

impl ScoreMap {
    pub fn score_of(&self, n: u8) -> f64 {
        self.scores[(n - 1) as usize]
    }

    pub fn votes_of(&self, n: u8) -> u32 {
        self.votes[(n - 1) as usize]
    }
}

/// `external_scores` is the ranked candidate list from the pluggable ML
/// feature source (spec §9), already truncated/ordered by the caller; an
/// empty slice means "ml has nothing to say" and contributes zero.
pub fn score(ctx: &StrategyContext, weights: &Weights, external_scores: &[u8]) -> ScoreMap {
    let mut scores = [0.0f64; 90];
    let mut votes = [0u32; 90];

    for member in PoolMember::ALL {
        let Some(key) = member.weight_key() else { continue };
        let ranked = member.run(ctx, RANK_LIST_LEN);
        apply_ranked_list(&mut scores, &mut votes, &ranked, weights.get(key), key, ctx);
    }

    if !external_scores.is_empty() {
        let ranked: Vec<u8> = external_scores.iter().take(RANK_LIST_LEN).copied().collect();
        apply_ranked_list(&mut scores, &mut votes, &ranked, weights.get(StrategyKey::Lstm), StrategyKey::Lstm, ctx);
    }

    redistribute_neighbors(&mut scores);
    apply_synergy(&mut scores, &votes);

    ScoreMap { scores, votes }
}

fn apply_ranked_list(
    scores: &mut [f64; 90],
    votes: &mut [u32; 90],
    ranked: &[u8],
    weight: f64,
    key: StrategyKey,
    ctx: &StrategyContext,
) {
    for (i, &n) in ranked.iter().enumerate() {
        let idx = (n - 1) as usize;
        let base = weight * (RANK_LIST_LEN - i) as f64 / RANK_LIST_LEN as f64;
        let contribution = match key {
            StrategyKey::Due => {
                let due_score = ctx.cycle[idx].due_score;
                base * (due_score.min(150.0) / 150.0)
            }
            StrategyKey::Position => weight * 2.0,
            StrategyKey::Balanced => {
                if i < 5 {
                    weight * 3.0
                } else {
                    weight * (1.0 + 2.0 * (RANK_LIST_LEN - i) as f64 / 10.0)
                }
            }
            _ => base,
        };
        scores[idx] += contribution;
        if i < 5 {
            votes[idx] += 1;
        }
    }
}

fn redistribute_neighbors(scores: &mut [f64; 90]) {
    let mut top: Vec<usize> = (0..90).filter(|&idx| scores[idx] > 0.0).collect();
    top.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));
    top.truncate(15);

    let additions: Vec<(usize, f64)> = top
        .iter()
        .flat_map(|&idx| {
            let spill = 0.15 * scores[idx];
            let n = idx + 1;
            let mut out = Vec::with_capacity(2);
            if n > 1 {
                out.push((idx - 1, spill));
            }
            if n < 90 {
                out.push((idx + 1, spill));
            }
            out
        })
        .collect();

    for (idx, amount) in additions {
        scores[idx] += amount;
    }
}

fn apply_synergy(scores: &mut [f64; 90], votes: &[u32; 90]) {
    for idx in 0..90 {
        if votes[idx] >= 5 {
            scores[idx] *= 1.20;
        } else if votes[idx] >= 3 {
            scores[idx] *= 1.10;
        } else if votes[idx] == 0 && scores[idx] > 2.0 {
            scores[idx] *= 0.85;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Draw, DrawTypeId, Stream};
    use chrono::Utc;

    fn draw(winning: [u8; 5]) -> Draw {
        Draw { draw_type_id: DrawTypeId(1), date: Utc::now(), day_of_week: 0, winning, machine: None }
    }

    #[test]
    fn scores_are_non_negative_and_finite() {
        let draws: Vec<Draw> = (0..200).map(|_| draw([7, 1, 2, 3, 4])).collect();
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let weights = Weights::default();
        let map = score(&ctx, &weights, &[]);
        for v in map.scores {
            assert!(v.is_finite());
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn dominant_number_lands_in_top_three() {
        let draws: Vec<Draw> = (0..200).map(|_| draw([7, 1, 2, 3, 4])).collect();
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let weights = Weights::default();
        let map = score(&ctx, &weights, &[]);
        let mut ranked: Vec<(u8, f64)> = (1..=90u8).map(|n| (n, map.score_of(n))).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        assert!(ranked.iter().take(3).any(|&(n, _)| n == 7));
    }

    #[test]
    fn neighbor_redistribution_stays_in_range() {
        let draws: Vec<Draw> = (0..50).map(|_| draw([1, 45, 46, 89, 90])).collect();
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let weights = Weights::default();
        let map = score(&ctx, &weights, &[]);
        assert_eq!(map.scores.len(), 90);
    }

    #[test]
    fn empty_draws_yield_all_zero_scores() {
        let ctx = StrategyContext::build(&[], Stream::Winning);
        let weights = Weights::default();
        let map = score(&ctx, &weights, &[]);
        assert!(map.scores.iter().all(|&v| v == 0.0));
    }
}
