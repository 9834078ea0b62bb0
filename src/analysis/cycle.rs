//! Cycle / due analysis: gaps between successive appearances of a number.
//!
//! Grounded on the teacher's `plugins/builtin/weighted_frequency.rs`
//! (the closest precedent for a per-number frequency/recency pass over a
//! draw sequence), generalized to the spec's cycle-statistics shape and
//! using `statrs` for the mean/median/std-dev this crate actually needs
//! (a teacher dependency that had no caller until this module).

use statrs::statistics::Data;
use statrs::statistics::Median;
use statrs::statistics::Statistics;

use crate::models::{CycleStats, Draw, Stream};

/// Cycle statistics for every number 1..=90 seen (or not) in `draws`.
/// Index `i` of the returned vector corresponds to number `i + 1`.
pub fn cycle_stats(draws: &[Draw], stream: Stream) -> Vec<CycleStats> {
    let mut gaps_by_number: Vec<Vec<u32>> = vec![Vec::new(); 90];
    let mut last_seen_index: Vec<Option<usize>> = vec![None; 90];

    for (draw_index, draw) in draws.iter().enumerate() {
        let Some(numbers) = draw.numbers(stream) else { continue };
        for &n in &numbers {
            let slot = (n - 1) as usize;
            if let Some(last) = last_seen_index[slot] {
                gaps_by_number[slot].push((draw_index - last) as u32);
            }
            last_seen_index[slot] = Some(draw_index);
        }
    }

    let total_draws = draws.len();
    (0..90)
        .map(|slot| {
            let gaps = &gaps_by_number[slot];
            let current_gap = match last_seen_index[slot] {
                Some(last) => (total_draws - 1 - last) as u32,
                None => total_draws as u32,
            };

            if gaps.is_empty() {
                return CycleStats::never_appeared(current_gap);
            }

            let values: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
            let avg_cycle = values.clone().mean();
            // Sample std dev is undefined (NaN) for a single observation;
            // analyzers must never surface NaN, so treat that case as 0.
            let std_dev = if values.len() > 1 { values.clone().std_dev() } else { 0.0 };
            let median_cycle = Data::new(values.clone()).median();
            let min_cycle = gaps.iter().copied().min().unwrap_or(0);
            let max_cycle = gaps.iter().copied().max().unwrap_or(0);

            let due_score = if avg_cycle > 0.0 {
                (100.0 * current_gap as f64 / avg_cycle).min(200.0)
            } else {
                200.0
            };
            let is_overdue = current_gap as f64 > avg_cycle;
            let overdue_by = if is_overdue { current_gap.saturating_sub(avg_cycle.round() as u32) } else { 0 };

            CycleStats {
                avg_cycle,
                median_cycle,
                min_cycle,
                max_cycle,
                std_dev,
                current_gap,
                due_score,
                cycle_count: gaps.len() as u32,
                is_overdue,
                overdue_by,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrawTypeId;
    use chrono::Utc;

    fn draw(winning: [u8; 5]) -> Draw {
        Draw { draw_type_id: DrawTypeId(1), date: Utc::now(), day_of_week: 0, winning, machine: None }
    }

    #[test]
    fn never_appeared_number_has_due_score_200() {
        let draws: Vec<Draw> = (0..10).map(|_| draw([1, 2, 3, 4, 5])).collect();
        let stats = cycle_stats(&draws, Stream::Winning);
        assert_eq!(stats[89].due_score, 200.0);
        assert_eq!(stats[89].cycle_count, 0);
    }

    #[test]
    fn constant_gap_matches_expectation() {
        // Number 6 appears every other draw: gap is always 2.
        let mut draws = Vec::new();
        for i in 0..20 {
            let winning = if i % 2 == 0 { [6, 1, 2, 3, 4] } else { [10, 11, 12, 13, 14] };
            draws.push(draw(winning));
        }
        let stats = cycle_stats(&draws, Stream::Winning);
        let six = &stats[5];
        assert!(six.cycle_count >= 8);
        assert!((six.avg_cycle - 2.0).abs() < 1e-9);
    }
}
