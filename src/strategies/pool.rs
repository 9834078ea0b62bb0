//! The eight deterministic strategies plus the extra "mixed" pool member.
//!
//! Grounded on the teacher's `plugins/builtin/weighted_frequency.rs` and
//! `plugins/builtin/pattern_analysis.rs` for the scoring idioms (top-k by a
//! derived score, tie-break ascending), generalized to the spec's nine
//! named strategies. `external-ml` has no function here — it is supplied
//! by the pluggable [`crate::ml::MlFeatureSource`] and merged directly by
//! the scorer, per design note §9.

use std::collections::HashSet;

use super::context::StrategyContext;
use crate::models::StrategyKey;

/// Every member of the strategy pool, including `Mixed`, which has no
/// brain weight key and is exposed only as an "alternative" reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolMember {
    Hot,
    Due,
    Position,
    Mixed,
    Correlation,
    Balanced,
    Statistical,
    Finales,
}

impl PoolMember {
    pub const ALL: [PoolMember; 8] = [
        PoolMember::Hot,
        PoolMember::Due,
        PoolMember::Position,
        PoolMember::Mixed,
        PoolMember::Correlation,
        PoolMember::Balanced,
        PoolMember::Statistical,
        PoolMember::Finales,
    ];

    /// `None` for `Mixed`, which tunes no weight (spec §4.3/§9).
    pub fn weight_key(self) -> Option<StrategyKey> {
        match self {
            PoolMember::Hot => Some(StrategyKey::Hot),
            PoolMember::Due => Some(StrategyKey::Due),
            PoolMember::Position => Some(StrategyKey::Position),
            PoolMember::Mixed => None,
            PoolMember::Correlation => Some(StrategyKey::Correlation),
            PoolMember::Balanced => Some(StrategyKey::Balanced),
            PoolMember::Statistical => Some(StrategyKey::Statistical),
            PoolMember::Finales => Some(StrategyKey::Finales),
        }
    }

    pub fn run(self, ctx: &StrategyContext, k: usize) -> Vec<u8> {
        match self {
            PoolMember::Hot => hot(ctx, k),
            PoolMember::Due => due(ctx, k),
            PoolMember::Position => position(ctx, k),
            PoolMember::Mixed => mixed(ctx, k),
            PoolMember::Correlation => correlation(ctx, k),
            PoolMember::Balanced => balanced(ctx, k),
            PoolMember::Statistical => statistical(ctx, k),
            PoolMember::Finales => finales(ctx, k),
        }
    }
}

pub fn hot(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    ctx.by_frequency_desc().into_iter().filter(|&n| ctx.frequency_of(n) > 0).take(k).collect()
}

pub fn due(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    // Tie-break on due_score ties: a candidate backed by >=5 observed
    // cycles outranks one scraping by on the >=3 minimum (spec §4.2).
    let mut candidates: Vec<(u8, f64, bool)> = ctx
        .cycle
        .iter()
        .enumerate()
        .filter(|(_, stats)| stats.cycle_count >= 3)
        .map(|(idx, stats)| ((idx + 1) as u8, stats.due_score, stats.is_reliable_due_candidate()))
        .collect();
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.2.cmp(&a.2))
            .then(a.0.cmp(&b.0))
    });
    candidates.into_iter().take(k).map(|(n, _, _)| n).collect()
}

pub fn position(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let target = 5;
    let mut chosen = Vec::new();
    let mut seen = HashSet::new();
    for pos_entries in &ctx.position {
        if let Some(&(n, _)) = pos_entries.first() {
            if seen.insert(n) {
                chosen.push(n);
            }
        }
    }
    // Pad with hot numbers when fewer than 5 distinct positional picks
    // were found, and further if the caller asked for more than 5.
    if chosen.len() < target {
        for n in hot(ctx, 90) {
            if chosen.len() >= target {
                break;
            }
            if seen.insert(n) {
                chosen.push(n);
            }
        }
    }
    chosen.truncate(k);
    chosen
}

pub fn mixed(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let hot_list = hot(ctx, k);
    let due_list = due(ctx, k);
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    let mut hi = 0;
    let mut di = 0;
    while result.len() < k && (hi < hot_list.len() || di < due_list.len()) {
        if hi < hot_list.len() {
            if seen.insert(hot_list[hi]) {
                result.push(hot_list[hi]);
            }
            hi += 1;
        }
        if result.len() >= k {
            break;
        }
        if di < due_list.len() {
            if seen.insert(due_list[di]) {
                result.push(due_list[di]);
            }
            di += 1;
        }
    }
    result
}

pub fn correlation(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for pair in &ctx.pairs {
        if result.len() >= k {
            break;
        }
        if seen.insert(pair.a) {
            result.push(pair.a);
        }
        if result.len() >= k {
            break;
        }
        if seen.insert(pair.b) {
            result.push(pair.b);
        }
    }
    result
}

/// Decade visit order fixed by the spec: `[2,3,4,5,1,6,7,0,8]`.
const BALANCED_DECADE_ORDER: [usize; 9] = [2, 3, 4, 5, 1, 6, 7, 0, 8];

pub fn balanced(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let mut numbers_by_decade: [Vec<u8>; 9] = Default::default();
    for n in 1..=90u8 {
        numbers_by_decade[crate::analysis::decade_index(n)].push(n);
    }
    for bucket in &mut numbers_by_decade {
        bucket.sort_by(|&a, &b| ctx.frequency_of(b).cmp(&ctx.frequency_of(a)).then(a.cmp(&b)));
    }

    let mut cursors = [0usize; 9];
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut made_progress = true;
    while result.len() < k && made_progress {
        made_progress = false;
        for &decade in &BALANCED_DECADE_ORDER {
            if result.len() >= k {
                break;
            }
            while cursors[decade] < numbers_by_decade[decade].len() {
                let candidate = numbers_by_decade[decade][cursors[decade]];
                cursors[decade] += 1;
                if seen.insert(candidate) {
                    result.push(candidate);
                    made_progress = true;
                    break;
                }
            }
        }
    }
    result
}

pub fn statistical(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let Some(last_draw) = ctx.last_draw else { return Vec::new() };
    let last_set: HashSet<u8> = last_draw.into_iter().collect();

    let mut scores = [0.0f64; 90];
    for pair in &ctx.pairs {
        let (candidate, anchor_in_last) = if last_set.contains(&pair.a) && !last_set.contains(&pair.b) {
            (Some(pair.b), true)
        } else if last_set.contains(&pair.b) && !last_set.contains(&pair.a) {
            (Some(pair.a), true)
        } else {
            (None, false)
        };
        if anchor_in_last {
            if let Some(candidate) = candidate {
                scores[(candidate - 1) as usize] += (pair.lift - 1.0) * 2.0;
            }
        }
    }
    for &anchor in &last_draw {
        for follower in &ctx.followers[(anchor - 1) as usize] {
            scores[(follower.number - 1) as usize] += follower.probability * 5.0;
        }
    }

    let mut candidates: Vec<(u8, f64)> = (1..=90u8).map(|n| (n, scores[(n - 1) as usize])).collect();
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    candidates.into_iter().filter(|(_, score)| *score > 0.0).take(k).map(|(n, _)| n).collect()
}

pub fn finales(ctx: &StrategyContext, k: usize) -> Vec<u8> {
    let total_numbers_seen: u32 = ctx.frequency.iter().sum();
    let mut ranked_finales: Vec<(u8, f64)> = ctx
        .finales
        .iter()
        .map(|stats| (stats.finale, crate::analysis::weighted_rank(stats, total_numbers_seen)))
        .collect();
    ranked_finales.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    let top_three: HashSet<u8> = ranked_finales.into_iter().take(3).map(|(f, _)| f).collect();

    let mut candidates: Vec<u8> = (1..=90u8).filter(|&n| top_three.contains(&(n % 10))).collect();
    candidates.sort_by(|&a, &b| ctx.frequency_of(b).cmp(&ctx.frequency_of(a)).then(a.cmp(&b)));
    candidates.into_iter().take(k).collect()
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
    fn hot_ranks_most_frequent_number_first() {
        let draws: Vec<Draw> = (0..200).map(|_| draw([7, 1, 2, 3, 4])).collect();
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let result = hot(&ctx, 5);
        assert_eq!(result[0], 7);
    }

    #[test]
    fn balanced_visits_decades_in_fixed_order() {
        let draws: Vec<Draw> = (0..50).map(|i| {
            let base = (i % 9) as u8 * 10 + 1;
            draw([base, base.min(85) + 1, 2, 3, 4])
        }).collect();
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let result = balanced(&ctx, 9);
        assert!(!result.is_empty());
    }

    #[test]
    fn empty_history_yields_empty_strategies() {
        let ctx = StrategyContext::build(&[], Stream::Winning);
        assert!(hot(&ctx, 5).is_empty());
        assert!(due(&ctx, 5).is_empty());
        assert!(statistical(&ctx, 5).is_empty());
    }

    #[test]
    fn position_pads_only_up_to_five_even_for_larger_k() {
        // Three draw shapes engineered so the position-0 and position-1
        // leaders collide on the number 5, leaving only 4 genuine
        // positional leaders and forcing the hot-number pad to kick in.
        let mut draws = Vec::new();
        draws.extend((0..150).map(|_| draw([5, 60, 70, 80, 85])));
        draws.extend((0..100).map(|_| draw([3, 5, 61, 71, 81])));
        draws.extend((0..80).map(|_| draw([4, 5, 62, 72, 82])));
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let result = position(&ctx, 15);
        assert!(result.len() <= 5);
    }
}
