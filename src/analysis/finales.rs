//! Finale (last-digit) analysis: numbers grouped by `n mod 10`.
//!
//! Grounded on the teacher's `plugins/builtin/pattern_analysis.rs` finale
//! bucketing, generalized with the same cycle/due arithmetic as
//! [`crate::analysis::cycle`] but scoped to whole draws rather than single
//! numbers.

use crate::models::{Draw, Stream};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinaleStats {
    pub finale: u8,
    /// Total appearances of any number sharing this finale, across all draws.
    pub count: u32,
    /// Distinct draws that contained at least one number with this finale.
    pub appearances: u32,
    pub current_gap: u32,
    pub due_score: f64,
    pub cycle_count: u32,
}

fn finale_of(n: u8) -> u8 {
    n % 10
}

/// `result[f]` is the stats for finale digit `f`, `0..=9`.
pub fn finale_stats(draws: &[Draw], stream: Stream) -> [FinaleStats; 10] {
    let mut counts = [0u32; 10];
    let mut appearances = [0u32; 10];
    let mut gaps: [Vec<u32>; 10] = Default::default();
    let mut last_index: [Option<usize>; 10] = [None; 10];

    for (draw_index, draw) in draws.iter().enumerate() {
        let Some(numbers) = draw.numbers(stream) else { continue };
        let mut seen_this_draw = [false; 10];
        for &n in &numbers {
            let f = finale_of(n) as usize;
            counts[f] += 1;
            seen_this_draw[f] = true;
        }
        for f in 0..10 {
            if seen_this_draw[f] {
                appearances[f] += 1;
                if let Some(last) = last_index[f] {
                    gaps[f].push((draw_index - last) as u32);
                }
                last_index[f] = Some(draw_index);
            }
        }
    }

    let total_draws = draws.len();
    std::array::from_fn(|f| {
        let current_gap = match last_index[f] {
            Some(last) => (total_draws - 1 - last) as u32,
            None => total_draws as u32,
        };
        if gaps[f].is_empty() {
            return FinaleStats {
                finale: f as u8,
                count: counts[f],
                appearances: appearances[f],
                current_gap,
                due_score: 200.0,
                cycle_count: 0,
            };
        }
        let avg_cycle = gaps[f].iter().sum::<u32>() as f64 / gaps[f].len() as f64;
        let due_score = if avg_cycle > 0.0 { (100.0 * current_gap as f64 / avg_cycle).min(200.0) } else { 200.0 };
        FinaleStats {
            finale: f as u8,
            count: counts[f],
            appearances: appearances[f],
            current_gap,
            due_score,
            cycle_count: gaps[f].len() as u32,
        }
    })
}

/// Weighted ranking used by the `finales` strategy: `0.6*dueScore + 0.4*percentage`.
pub fn weighted_rank(stats: &FinaleStats, total_numbers_seen: u32) -> f64 {
    let percentage = if total_numbers_seen == 0 { 0.0 } else { 100.0 * stats.count as f64 / total_numbers_seen as f64 };
    0.6 * stats.due_score + 0.4 * percentage
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
    fn finale_grouping_matches_modulo_ten() {
        assert_eq!(finale_of(10), 0);
        assert_eq!(finale_of(7), 7);
        assert_eq!(finale_of(90), 0);
    }

    #[test]
    fn never_seen_finale_has_due_score_200() {
        let draws: Vec<Draw> = (0..5).map(|_| draw([1, 2, 3, 4, 5])).collect();
        let stats = finale_stats(&draws, Stream::Winning);
        // finale 9 (numbers ...9, 19, 29, ...) never appears in this fixture.
        assert_eq!(stats[9].due_score, 200.0);
        assert_eq!(stats[9].cycle_count, 0);
    }
}
