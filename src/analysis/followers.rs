//! Co-occurrence "followers": numbers that tend to appear in the draw
//! immediately after a given anchor number appeared.
//!
//! Grounded on the teacher's `plugins/builtin/pattern_analysis.rs`
//! sequential-pattern pass, narrowed to one-step-ahead lookahead per the
//! spec.

use std::collections::HashMap;

use crate::models::{Draw, Stream};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follower {
    pub number: u8,
    pub count: u32,
    pub probability: f64,
}

/// `result[a]` lists up to 10 followers for anchor number `a` (1-indexed
/// into the returned `Vec` at index `a - 1`), each with `count >= 3` and
/// `probability > 0.10`, sorted by descending count then ascending number.
pub fn followers(draws: &[Draw], stream: Stream) -> Vec<Vec<Follower>> {
    let mut anchor_freq = [0u32; 90];
    let mut pair_counts: HashMap<(u8, u8), u32> = HashMap::new();

    for window in draws.windows(2) {
        let (Some(anchors), Some(next)) = (window[0].numbers(stream), window[1].numbers(stream)) else { continue };
        for &a in &anchors {
            anchor_freq[(a - 1) as usize] += 1;
            for &b in &next {
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    (1..=90u8)
        .map(|a| {
            let freq = anchor_freq[(a - 1) as usize];
            if freq == 0 {
                return Vec::new();
            }
            let mut candidates: Vec<Follower> = pair_counts
                .iter()
                .filter(|((from, _), _)| *from == a)
                .filter_map(|((_, to), &count)| {
                    if count < 3 {
                        return None;
                    }
                    let probability = count as f64 / freq as f64;
                    (probability > 0.10).then_some(Follower { number: *to, count, probability })
                })
                .collect();
            candidates.sort_by(|x, y| y.count.cmp(&x.count).then(x.number.cmp(&y.number)));
            candidates.truncate(10);
            candidates
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
    fn consistent_follower_is_reported() {
        let mut draws = Vec::new();
        for _ in 0..6 {
            draws.push(draw([1, 2, 3, 4, 5]));
            draws.push(draw([6, 7, 8, 9, 10]));
        }
        let result = followers(&draws, Stream::Winning);
        let anchor_one = &result[0];
        assert!(anchor_one.iter().any(|f| f.number == 6));
    }
}
