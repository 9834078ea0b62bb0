//! Pairwise correlation (lift) and triple co-occurrence reporting.
//!
//! Grounded on the teacher's `plugins/builtin/pattern_analysis.rs` pair
//! counting, extended with the lift formula the spec requires.

use std::collections::HashMap;

use crate::models::{Draw, Stream};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairLift {
    pub a: u8,
    pub b: u8,
    pub count: u32,
    pub lift: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripleCount {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub count: u32,
}

/// Pairs with `count >= 3` and `lift > 1.2`, sorted by descending lift then
/// ascending (a, b) for determinism.
pub fn top_pairs(draws: &[Draw], stream: Stream) -> Vec<PairLift> {
    let total = draws.len();
    if total == 0 {
        return Vec::new();
    }

    let mut singles: HashMap<u8, u32> = HashMap::new();
    let mut pairs: HashMap<(u8, u8), u32> = HashMap::new();

    for draw in draws {
        let Some(mut numbers) = draw.numbers(stream) else { continue };
        numbers.sort_unstable();
        for &n in &numbers {
            *singles.entry(n).or_insert(0) += 1;
        }
        for i in 0..numbers.len() {
            for j in (i + 1)..numbers.len() {
                *pairs.entry((numbers[i], numbers[j])).or_insert(0) += 1;
            }
        }
    }

    let mut result: Vec<PairLift> = pairs
        .into_iter()
        .filter(|(_, count)| *count >= 3)
        .filter_map(|((a, b), count)| {
            let count_a = *singles.get(&a).unwrap_or(&0) as f64;
            let count_b = *singles.get(&b).unwrap_or(&0) as f64;
            if count_a == 0.0 || count_b == 0.0 {
                return None;
            }
            let lift = (count as f64 * total as f64) / (count_a * count_b);
            (lift > 1.2).then_some(PairLift { a, b, count, lift })
        })
        .collect();

    result.sort_by(|x, y| y.lift.partial_cmp(&x.lift).unwrap_or(std::cmp::Ordering::Equal).then((x.a, x.b).cmp(&(y.a, y.b))));
    result
}

/// Informational only (spec §4.2: "used only for reporting").
pub fn top_triples(draws: &[Draw], stream: Stream) -> Vec<TripleCount> {
    let mut counts: HashMap<(u8, u8, u8), u32> = HashMap::new();
    for draw in draws {
        let Some(mut numbers) = draw.numbers(stream) else { continue };
        numbers.sort_unstable();
        for i in 0..numbers.len() {
            for j in (i + 1)..numbers.len() {
                for k in (j + 1)..numbers.len() {
                    *counts.entry((numbers[i], numbers[j], numbers[k])).or_insert(0) += 1;
                }
            }
        }
    }
    let mut result: Vec<TripleCount> =
        counts.into_iter().filter(|(_, c)| *c >= 3).map(|((a, b, c), count)| TripleCount { a, b, c, count }).collect();
    result.sort_by(|x, y| y.count.cmp(&x.count).then((x.a, x.b, x.c).cmp(&(y.a, y.b, y.c))));
    result
}
