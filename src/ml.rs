//! Pluggable external ML feature source.
//!
//! Grounded on the teacher's `plugins/builtin/neural_network.rs`, which is
//! a full (and, per DESIGN.md, unused-in-this-crate) LSTM-flavored plugin;
//! this crate keeps only the interface shape — `Rank(draws, k) -> [number]`
//! — per design note §9, since training a model is an explicit non-goal.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Draw, Stream};

#[async_trait]
pub trait MlFeatureSource: Send + Sync {
    /// Ranked candidate numbers, best first, length at most `k`. The core
    /// must work correctly when this returns an empty vector.
    async fn rank(&self, draws: &[Draw], stream: Stream, k: usize) -> Result<Vec<u8>>;
}

/// Used when no deep-learning module is wired up; always contributes
/// nothing, matching the "missing ml feature: treat as absent" failure
/// semantics in spec §4.9.
pub struct NullMlFeatureSource;

#[async_trait]
impl MlFeatureSource for NullMlFeatureSource {
    async fn rank(&self, _draws: &[Draw], _stream: Stream, _k: usize) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_source_is_always_empty() {
        let source = NullMlFeatureSource;
        let ranked = source.rank(&[], Stream::Winning, 15).await.unwrap();
        assert!(ranked.is_empty());
    }
}
