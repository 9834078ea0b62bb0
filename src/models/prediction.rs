//! Prediction reports and the append-only history log's entry shape.
//!
//! Grounded on the teacher's `super_lotto/models.rs` `PredictionResult` /
//! `ConfidenceDistribution` / `AlgorithmRanking` / `BatchPredictionResult`
//! records — the closest precedent for a multi-field, serializable
//! "here's what we predicted and how confident we were" report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::brain::StrategyKey;
use super::draw::{DrawTypeId, Stream};

/// One candidate number together with its ensemble score and whichever
/// strategies contributed non-zero votes to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNumber {
    pub number: u8,
    pub score: f64,
    pub contributing_strategies: Vec<StrategyKey>,
}

/// The five numbers the Selector committed to for one stream, plus the
/// confidence the spec's formula assigns to that selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamPrediction {
    pub stream: Stream,
    pub numbers: [u8; 5],
    pub confidence: f64,
    pub scored: Vec<ScoredNumber>,
}

/// A named alternative reading of the same draw type: the four canonical
/// views this crate exposes are "winning", "machine", "hybrid" and
/// "consensus" (numbers agreed on by at least two of the first three).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub numbers: [u8; 5],
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub id: Uuid,
    pub draw_type_id: DrawTypeId,
    pub generated_at: DateTime<Utc>,
    pub winning: StreamPrediction,
    pub machine: Option<StreamPrediction>,
    pub hybrid: Option<Alternative>,
    pub alternatives: Vec<Alternative>,
    pub correlation_strength: f64,
}

/// Whether an exact-match or near-miss check for one history entry has
/// been performed yet, and if so, what it found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Verified { exact_matches: u8, near_misses: u8 },
}

impl VerificationStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified { .. })
    }
}

/// One immutable entry in the append-only prediction log (spec §3, §4.9).
/// Entries are written once by prediction generation and mutated exactly
/// once by verification, from `Pending` to `Verified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionHistoryEntry {
    pub id: Uuid,
    pub draw_type_id: DrawTypeId,
    pub stream: Stream,
    pub predicted_at: DateTime<Utc>,
    pub numbers: [u8; 5],
    pub status: VerificationStatus,
}

impl PredictionHistoryEntry {
    pub fn new(draw_type_id: DrawTypeId, stream: Stream, predicted_at: DateTime<Utc>, numbers: [u8; 5]) -> Self {
        Self {
            id: Uuid::new_v4(),
            draw_type_id,
            stream,
            predicted_at,
            numbers,
            status: VerificationStatus::Pending,
        }
    }

    /// Verification never re-opens an already verified entry (spec §4.9:
    /// "immutable once verified").
    pub fn mark_verified(&mut self, exact_matches: u8, near_misses: u8) -> bool {
        if self.status.is_verified() {
            return false;
        }
        self.status = VerificationStatus::Verified { exact_matches, near_misses };
        true
    }
}
