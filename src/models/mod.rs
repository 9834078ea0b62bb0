pub mod brain;
pub mod cycle;
pub mod draw;
pub mod evaluation;
pub mod prediction;

pub use brain::{AccuracyStats, BrainHistoryEntry, BrainState, StrategyKey, Weights};
pub use cycle::CycleStats;
pub use draw::{Draw, DrawType, DrawTypeId, Stream};
pub use evaluation::{EvaluatedNumber, EvaluationReport, Recommendation};
pub use prediction::{
    Alternative, PredictionHistoryEntry, PredictionReport, ScoredNumber, StreamPrediction, VerificationStatus,
};
