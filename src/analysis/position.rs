//! Positional frequency analysis.
//!
//! Grounded on the teacher's `plugins/builtin/pattern_analysis.rs`, which
//! already buckets per-draw structure into fixed-size counters; here the
//! bucket is "rank within the sorted draw" instead of decade/parity.

use crate::models::{Draw, Stream};

/// `result[pos]` holds the numbers most frequently seen at sorted position
/// `pos` (0-indexed, 0..=4), ordered by descending frequency then
/// ascending number, truncated to the top 10.
pub fn position_frequency(draws: &[Draw], stream: Stream) -> [Vec<(u8, u32)>; 5] {
    let mut counts: [std::collections::HashMap<u8, u32>; 5] = Default::default();

    for draw in draws {
        let Some(mut numbers) = draw.numbers(stream) else { continue };
        numbers.sort_unstable();
        for (pos, &n) in numbers.iter().enumerate() {
            *counts[pos].entry(n).or_insert(0) += 1;
        }
    }

    counts.map(|map| {
        let mut entries: Vec<(u8, u32)> = map.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(10);
        entries
    })
}
