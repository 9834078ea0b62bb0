//! The Brain: per-stream online-learning weight tuner.
//!
//! Grounded on the teacher's `plugins/builtin/neural_network.rs` for the
//! general shape of "hold adjustable weights, expose a scoring pass, learn
//! from outcomes" — rewritten around the spec's explicit weight-adjustment
//! arithmetic instead of a gradient step, and on `repository/traits.rs`
//! for the `BrainStore` persistence seam.

pub mod store;

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::matching::{exact_matches, near_misses};
use crate::models::{
    AccuracyStats, BrainHistoryEntry, BrainState, Draw, DrawTypeId, Stream, StrategyKey, Weights,
};
use crate::scorer::{self, ScoreMap};
use crate::selector;
use crate::strategies::{PoolMember, StrategyContext};

pub use store::{BrainStore, InMemoryBrainStore};

const LEARNING_RATE: f64 = 0.05;
const STRATEGY_CANDIDATE_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LearnOutcome {
    pub global_match: u8,
    pub strat_scores: HashMap<StrategyKey, f64>,
    pub new_weights: Weights,
}

pub struct Brain {
    stream: Stream,
    state: RwLock<BrainState>,
}

impl Brain {
    /// Load from the store, falling back to a fresh default brain on a
    /// missing or corrupted blob (spec §4.7 failure semantics). Always
    /// runs the default-key-injection migration before use.
    pub async fn load(stream: Stream, store: &dyn BrainStore) -> Self {
        let state = match store.load(stream).await {
            Ok(Some(state)) => state.migrated(),
            Ok(None) => BrainState::default(),
            Err(_) => BrainState::default(),
        };
        Self { stream, state: RwLock::new(state) }
    }

    /// Deep copy of the current state.
    pub async fn status(&self) -> BrainState {
        self.state.read().await.clone()
    }

    pub async fn weights(&self) -> Weights {
        self.state.read().await.weights.clone()
    }

    /// Thin wrapper over the Ensemble Scorer (spec §4.7 `Score`).
    pub async fn score(&self, ctx: &StrategyContext, external_scores: &[u8]) -> ScoreMap {
        let weights = self.weights().await;
        scorer::score(ctx, &weights, external_scores)
    }

    /// Learn from a newly observed draw. Returns `None` when this stream
    /// has no numbers for `actual_draw` (e.g. a machine brain given a draw
    /// with no machine set) — nothing to learn from, not an error.
    pub async fn learn(
        &self,
        actual_draw: &Draw,
        all_draws: &[Draw],
        draw_type_id: Option<DrawTypeId>,
        store: &dyn BrainStore,
    ) -> Result<Option<LearnOutcome>> {
        let Some(actual_numbers) = actual_draw.numbers(self.stream) else { return Ok(None) };

        // Leakage guard: never train on a copy of the ground truth itself.
        let filtered: Vec<Draw> = all_draws.iter().filter(|d| !d.same_numbers(actual_draw)).cloned().collect();
        let ctx = StrategyContext::build(&filtered, self.stream);

        let weights = self.weights().await;
        let score_map = scorer::score(&ctx, &weights, &[]);
        let selection = selector::select(&score_map);

        let matches = exact_matches(&selection.numbers, &actual_numbers);
        let global_match = matches.len() as u8;

        let mut strat_scores = HashMap::new();
        let mut deltas = HashMap::new();
        for member in PoolMember::ALL {
            let Some(key) = member.weight_key() else { continue };
            let candidates = member.run(&ctx, STRATEGY_CANDIDATE_COUNT);
            let exact = exact_matches(&candidates, &actual_numbers).len() as f64;
            let near = near_misses(&candidates, &actual_numbers).len() as f64;
            let strat_score = exact * 1.0 + near * 0.25;
            strat_scores.insert(key, strat_score);

            let delta = if strat_score >= 3.0 {
                2.0 * LEARNING_RATE
            } else if strat_score >= 1.0 {
                LEARNING_RATE
            } else {
                -0.5 * LEARNING_RATE
            };
            deltas.insert(key, delta);
        }

        let new_weights = weights.adjusted(&deltas);

        let mut state = self.state.write().await;
        state.stats_global.record(global_match as u32);
        if let Some(id) = draw_type_id {
            state.stats_by_type.entry(id).or_insert_with(AccuracyStats::default).record(global_match as u32);
        }
        state.weights = new_weights.clone();
        state.last_tuned = Some(Utc::now());
        state.last_analyzed_draw = Some(actual_draw.clone());
        state.push_history(BrainHistoryEntry {
            date: Utc::now(),
            draw: actual_draw.clone(),
            strat_scores: strat_scores.clone().into_iter().collect(),
            global_match,
            new_weights: new_weights.clone(),
        });
        let snapshot = state.clone();
        drop(state);

        if store.save(self.stream, &snapshot).await.is_err() {
            tracing::warn!(stream = %self.stream, "brain persistence failed, keeping in-memory copy");
        }

        Ok(Some(LearnOutcome { global_match, strat_scores, new_weights }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrawTypeId;
    use chrono::Utc;

    fn draw(winning: [u8; 5]) -> Draw {
        Draw { draw_type_id: DrawTypeId(1), date: Utc::now(), day_of_week: 0, winning, machine: None }
    }

    #[tokio::test]
    async fn learn_excludes_the_actual_draw_from_training() {
        let store = InMemoryBrainStore::default();
        let brain = Brain::load(Stream::Winning, &store).await;
        let actual = draw([7, 15, 23, 42, 71]);
        let mut history: Vec<Draw> = (0..50).map(|_| draw([1, 2, 3, 4, 5])).collect();
        history.push(actual.clone());

        let outcome = brain.learn(&actual, &history, Some(DrawTypeId(1)), &store).await.unwrap();
        assert!(outcome.is_some());
        let status = brain.status().await;
        assert_eq!(status.stats_global.total_draws, 1);
    }

    #[tokio::test]
    async fn weights_stay_normalized_after_learning() {
        let store = InMemoryBrainStore::default();
        let brain = Brain::load(Stream::Winning, &store).await;
        let actual = draw([7, 15, 23, 42, 71]);
        let history: Vec<Draw> = (0..50).map(|i| draw([(i % 90 + 1) as u8, 2, 3, 4, 5])).collect();
        brain.learn(&actual, &history, None, &store).await.unwrap();
        let weights = brain.weights().await;
        assert!((weights.sum() - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn machine_brain_skips_learning_without_a_machine_set() {
        let store = InMemoryBrainStore::default();
        let brain = Brain::load(Stream::Machine, &store).await;
        let actual = draw([7, 15, 23, 42, 71]);
        let outcome = brain.learn(&actual, &[], None, &store).await.unwrap();
        assert!(outcome.is_none());
    }
}
