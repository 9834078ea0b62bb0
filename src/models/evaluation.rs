//! The `evaluate` report shape: "how good is this hand-picked set of
//! numbers according to the current ensemble?"
//!
//! Grounded on the teacher's `super_lotto/models.rs` `PredictionResult`
//! (confidence + per-number detail bundled into one response record).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Excellent,
    Bon,
    Moyen,
    Risque,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedNumber {
    pub number: u8,
    pub score: f64,
    pub is_hot: bool,
    pub is_warm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub numbers: Vec<EvaluatedNumber>,
    pub total_score: f64,
    pub confidence: f64,
    pub matches: u8,
    pub strong_matches: u8,
    pub synergy_bonus: f64,
    pub top_candidates: Vec<u8>,
    pub recommendation: Recommendation,
}
