//! Per-number cycle statistics.
//!
//! Grounded on `super_lotto/models.rs`'s `NumberFrequency` (the teacher's
//! hot/cold-score-bearing per-number record) — the same shape of "one
//! record per candidate number carrying derived statistics", generalized
//! here to the spec's cycle/due model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    pub avg_cycle: f64,
    pub median_cycle: f64,
    pub min_cycle: u32,
    pub max_cycle: u32,
    pub std_dev: f64,
    pub current_gap: u32,
    /// `min(200, 100 * current_gap / avg_cycle)`, or 200 if the number has
    /// never appeared.
    pub due_score: f64,
    pub cycle_count: u32,
    pub is_overdue: bool,
    pub overdue_by: u32,
}

impl CycleStats {
    /// A number that has never appeared in the sequence: zero cycle count,
    /// maximal due score (spec §8 boundary behavior).
    pub fn never_appeared(current_gap: u32) -> Self {
        Self {
            avg_cycle: 0.0,
            median_cycle: 0.0,
            min_cycle: 0,
            max_cycle: 0,
            std_dev: 0.0,
            current_gap,
            due_score: 200.0,
            cycle_count: 0,
            is_overdue: true,
            overdue_by: current_gap,
        }
    }

    /// Qualifies as a "reliable due candidate" only with enough history
    /// (spec §4.2: cycle_count >= 5).
    pub fn is_reliable_due_candidate(&self) -> bool {
        self.cycle_count >= 5
    }
}
