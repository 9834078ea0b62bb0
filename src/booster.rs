//! Correlation Booster: machine→winning co-occurrence and hybrid fusion.
//!
//! Grounded on the teacher's `analysis/correlation.rs` cross-number
//! co-occurrence pass (there used for generic "these numbers often
//! co-occur" reporting), specialized to a machine-stream-to-winning-stream
//! direction with a boost multiplier rather than a report.

use std::collections::{HashMap, HashSet};

use crate::models::Draw;
use crate::scorer::ScoreMap;
use crate::selector::{select_with, Selection};

pub struct CorrelationMatrix {
    counts: HashMap<(u8, u8), u32>,
    total_draws_with_both: usize,
}

impl CorrelationMatrix {
    pub fn build(draws: &[Draw]) -> Self {
        let mut counts = HashMap::new();
        let mut total_draws_with_both = 0usize;
        for draw in draws {
            let Some(machine) = draw.machine else { continue };
            total_draws_with_both += 1;
            for m in machine {
                for w in draw.winning {
                    *counts.entry((m, w)).or_insert(0) += 1;
                }
            }
        }
        Self { counts, total_draws_with_both }
    }

    /// Top-10 winning numbers correlated with machine number `m`, by
    /// descending count then ascending winning number.
    pub fn top_correlated(&self, m: u8, limit: usize) -> Vec<(u8, u32)> {
        let mut entries: Vec<(u8, u32)> =
            self.counts.iter().filter(|((from, _), _)| *from == m).map(|((_, w), &c)| (*w, c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HybridResult {
    pub boosted_scores: [f64; 90],
    pub boosted_numbers: Vec<u8>,
    pub correlation_strength: f64,
    pub selection: Selection,
}

const TOP_CORRELATED_PER_MACHINE_NUMBER: usize = 10;

/// Boost winning scores using the predicted machine numbers, then re-run
/// the selector on the boosted map (spec §4.6).
pub fn hybrid(matrix: &CorrelationMatrix, winning_scores: &ScoreMap, machine_numbers: &[u8], boost_factor: f64) -> HybridResult {
    let mut boosted = winning_scores.scores;
    let mut boosted_numbers = Vec::new();
    let mut already_boosted = HashSet::new();
    let mut top_counts = Vec::new();

    for &m in machine_numbers {
        let correlated = matrix.top_correlated(m, TOP_CORRELATED_PER_MACHINE_NUMBER);
        if let Some(&(_, top_count)) = correlated.first() {
            top_counts.push(top_count as f64);
        }
        for (w, _) in correlated {
            let idx = (w - 1) as usize;
            if winning_scores.scores[idx] <= 0.0 {
                continue;
            }
            if already_boosted.insert(w) {
                boosted[idx] *= boost_factor;
                boosted_numbers.push(w);
            }
        }
    }

    let correlation_strength = if top_counts.is_empty() || matrix.total_draws_with_both == 0 {
        0.0
    } else {
        let avg_top_count = top_counts.iter().sum::<f64>() / top_counts.len() as f64;
        (avg_top_count / matrix.total_draws_with_both as f64).clamp(0.0, 1.0)
    };

    let boosted_map = ScoreMap { scores: boosted, votes: winning_scores.votes };
    let selection = select_with(&boosted_map, 97.0, 42.0);

    HybridResult { boosted_scores: boosted, boosted_numbers, correlation_strength, selection }
}
