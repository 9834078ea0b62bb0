//! Precomputed analyzer outputs shared by every strategy in one pass.
//!
//! Grounded on the teacher's `services/analysis_service.rs`, which builds
//! one `AnalysisCache` per request and hands it to every plugin instead of
//! recomputing frequency tables per plugin call.

use crate::analysis::{self, DecadeDistribution, FinaleStats, Follower, PairLift};
use crate::models::{CycleStats, Draw, Stream};

pub struct StrategyContext {
    pub stream: Stream,
    pub cycle: Vec<CycleStats>,
    pub pairs: Vec<PairLift>,
    pub position: [Vec<(u8, u32)>; 5],
    pub decade: DecadeDistribution,
    pub finales: [FinaleStats; 10],
    pub followers: Vec<Vec<Follower>>,
    /// Raw appearance frequency per number, index `n - 1`.
    pub frequency: [u32; 90],
    pub last_draw: Option<[u8; 5]>,
}

impl StrategyContext {
    pub fn build(draws: &[Draw], stream: Stream) -> Self {
        let mut frequency = [0u32; 90];
        for draw in draws {
            if let Some(numbers) = draw.numbers(stream) {
                for n in numbers {
                    frequency[(n - 1) as usize] += 1;
                }
            }
        }

        let last_draw = draws.iter().rev().find_map(|d| d.numbers(stream));

        Self {
            stream,
            cycle: analysis::cycle_stats(draws, stream),
            pairs: analysis::top_pairs(draws, stream),
            position: analysis::position_frequency(draws, stream),
            decade: analysis::decade_distribution(draws, stream),
            finales: analysis::finale_stats(draws, stream),
            followers: analysis::followers(draws, stream),
            frequency,
            last_draw,
        }
    }

    pub fn frequency_of(&self, n: u8) -> u32 {
        self.frequency[(n - 1) as usize]
    }

    /// Numbers ranked by descending raw frequency, ascending number on ties.
    pub fn by_frequency_desc(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=90).collect();
        numbers.sort_by(|&a, &b| self.frequency_of(b).cmp(&self.frequency_of(a)).then(a.cmp(&b)));
        numbers
    }
}
