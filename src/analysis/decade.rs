//! Decade distribution: bucket 1..9, 10..19, ..., 80..90 (last bucket 11 wide).
//!
//! Grounded on the teacher's `plugins/builtin/pattern_analysis.rs` decade
//! bucketing helper.

use crate::models::{Draw, Stream};

/// Decade index for a number, `0..=8`. Bucket 0 is `1..=9`; buckets
/// `1..=8` are `10..=19` .. `80..=90` (bucket 8 holds 11 numbers).
pub fn decade_index(n: u8) -> usize {
    if n <= 9 {
        0
    } else {
        ((n - 1) / 10) as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecadeDistribution {
    /// Count of appearances per decade bucket, index 0..=8.
    pub counts: [u32; 9],
    /// One pattern string per draw, e.g. "0-1-1-2-0-0-0-1-0" counting how
    /// many of the draw's numbers fell in each decade.
    pub patterns: Vec<String>,
}

pub fn decade_distribution(draws: &[Draw], stream: Stream) -> DecadeDistribution {
    let mut counts = [0u32; 9];
    let mut patterns = Vec::with_capacity(draws.len());

    for draw in draws {
        let Some(numbers) = draw.numbers(stream) else { continue };
        let mut per_draw = [0u32; 9];
        for &n in &numbers {
            let idx = decade_index(n);
            counts[idx] += 1;
            per_draw[idx] += 1;
        }
        patterns.push(per_draw.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("-"));
    }

    DecadeDistribution { counts, patterns }
}
