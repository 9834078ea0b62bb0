//! The orchestrator: wires the Store, Brains, Scorer, Selector and
//! Correlation Booster into the three operations the (out-of-scope) HTTP
//! façade would call — predict, evaluate, refresh.
//!
//! Grounded on the teacher's `services/analysis_service.rs`, which plays
//! the same "single service struct gluing repository + plugins + cache
//! together" role for its hot/cold-number endpoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use uuid::Uuid;

use crate::booster::{self, CorrelationMatrix};
use crate::brain::{Brain, BrainStore};
use crate::cache::PredictionCache;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::history::PredictionLog;
use crate::matching::exact_matches;
use crate::ml::MlFeatureSource;
use crate::models::{
    Alternative, BrainState, Draw, DrawTypeId, EvaluatedNumber, EvaluationReport, PredictionHistoryEntry,
    PredictionReport, Recommendation, ScoredNumber, Stream, StreamPrediction,
};
use crate::scorer::ScoreMap;
use crate::selector;
use crate::store::DrawStore;
use crate::strategies::StrategyContext;
use crate::verification::VerificationLoop;

const MAX_GLOBAL_DRAWS: usize = 5000;
const MIN_DAY_OF_WEEK_SAMPLE: usize = 10;
const ML_CANDIDATE_COUNT: usize = 15;

pub struct PredictionResponse {
    pub report: PredictionReport,
    pub cached: bool,
    pub age_seconds: i64,
    /// Surfaces whether the `dayOfWeek` filter was silently dropped for
    /// lack of data (decided Open Question, see DESIGN.md).
    pub day_of_week_fallback_applied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RealPerformance {
    pub verified_count: u32,
    pub total_exact_matches: u32,
    pub accuracy: f64,
}

pub struct BrainStatusReport {
    pub state: BrainState,
    pub real_performance: RealPerformance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
}

pub struct Engine {
    config: EngineConfig,
    draw_store: Arc<dyn DrawStore>,
    brain_store: Arc<dyn BrainStore>,
    prediction_log: Arc<dyn PredictionLog>,
    ml_source: Arc<dyn MlFeatureSource>,
    winning_brain: Brain,
    machine_brain: Brain,
    cache: PredictionCache,
    verification_loop: VerificationLoop,
    is_refreshing: AtomicBool,
}

impl Engine {
    pub async fn new(
        config: EngineConfig,
        draw_store: Arc<dyn DrawStore>,
        brain_store: Arc<dyn BrainStore>,
        prediction_log: Arc<dyn PredictionLog>,
        ml_source: Arc<dyn MlFeatureSource>,
    ) -> Self {
        let winning_brain = Brain::load(Stream::Winning, brain_store.as_ref()).await;
        let machine_brain = Brain::load(Stream::Machine, brain_store.as_ref()).await;
        let cache_ttl = config.cache_ttl_seconds;
        let verification_interval = config.verification_min_interval_seconds;
        Self {
            config,
            draw_store,
            brain_store,
            prediction_log,
            ml_source,
            winning_brain,
            machine_brain,
            cache: PredictionCache::new(cache_ttl),
            verification_loop: VerificationLoop::new(verification_interval),
            is_refreshing: AtomicBool::new(false),
        }
    }

    async fn draws_for(&self, draw_type_id: Option<DrawTypeId>) -> Result<Vec<Draw>> {
        match draw_type_id {
            Some(id) => Ok(self.draw_store.draws_for_type(id).await.unwrap_or_default()),
            None => {
                let types = self.draw_store.draw_types().await.unwrap_or_default();
                let mut all = Vec::new();
                for draw_type in types {
                    all.extend(self.draw_store.draws_for_type(draw_type.id).await.unwrap_or_default());
                }
                all.sort_by_key(|d| d.date);
                if all.len() > MAX_GLOBAL_DRAWS {
                    let cut = all.len() - MAX_GLOBAL_DRAWS;
                    all.drain(0..cut);
                }
                Ok(all)
            }
        }
    }

    /// Applies the spec's `dayOfWeek` filter, silently falling back to the
    /// unfiltered set when fewer than 10 draws match, and reporting
    /// whether that fallback happened.
    fn apply_day_filter(all: Vec<Draw>, day_of_week: Option<u8>) -> (Vec<Draw>, bool) {
        let Some(day) = day_of_week else { return (all, false) };
        let filtered: Vec<Draw> = all.iter().filter(|d| d.day_of_week == day).cloned().collect();
        if filtered.len() < MIN_DAY_OF_WEEK_SAMPLE {
            (all, true)
        } else {
            (filtered, false)
        }
    }

    pub async fn predict(&self, draw_type_id: Option<DrawTypeId>, day_of_week: Option<u8>) -> Result<PredictionResponse> {
        let key = (draw_type_id, day_of_week);
        if let Some(hit) = self.cache.get(&key) {
            counter!("predictions_total", 1, "cached" => "true");
            return Ok(PredictionResponse {
                report: hit.report,
                cached: hit.cached,
                age_seconds: hit.age_seconds,
                day_of_week_fallback_applied: false,
            });
        }
        counter!("predictions_total", 1, "cached" => "false");

        let all = self.draws_for(draw_type_id).await?;
        let (draws, fallback_applied) = Self::apply_day_filter(all, day_of_week);

        let winning_ctx = StrategyContext::build(&draws, Stream::Winning);
        let winning_ml = self.ml_source.rank(&draws, Stream::Winning, ML_CANDIDATE_COUNT).await.unwrap_or_default();
        let winning_scores = self.winning_brain.score(&winning_ctx, &winning_ml).await;
        let winning_selection = selector::select(&winning_scores);
        let winning = build_stream_prediction(Stream::Winning, &winning_selection, &winning_scores);

        let has_machine_data = draws.iter().any(|d| d.machine.is_some());
        let machine = if has_machine_data {
            let machine_ctx = StrategyContext::build(&draws, Stream::Machine);
            let machine_ml = self.ml_source.rank(&draws, Stream::Machine, ML_CANDIDATE_COUNT).await.unwrap_or_default();
            let machine_scores = self.machine_brain.score(&machine_ctx, &machine_ml).await;
            let machine_selection = selector::select(&machine_scores);
            Some(build_stream_prediction(Stream::Machine, &machine_selection, &machine_scores))
        } else {
            None
        };

        let (hybrid, correlation_strength) = match &machine {
            Some(machine_pred) if machine_pred.numbers.iter().any(|&n| n != 0) => {
                let matrix = CorrelationMatrix::build(&draws);
                let result = booster::hybrid(&matrix, &winning_scores, &machine_pred.numbers, self.config.boost_factor);
                let alt = Alternative {
                    label: "hybrid".to_string(),
                    numbers: to_fixed(&result.selection.numbers),
                    confidence: result.selection.confidence,
                };
                (Some(alt), result.correlation_strength)
            }
            _ => (None, 0.0),
        };

        let mut alternatives = vec![
            Alternative { label: "winning".to_string(), numbers: winning.numbers, confidence: winning.confidence }
        ];
        if let Some(machine_pred) = &machine {
            alternatives.push(Alternative {
                label: "machine".to_string(),
                numbers: machine_pred.numbers,
                confidence: machine_pred.confidence,
            });
        }
        if let Some(hybrid_alt) = &hybrid {
            alternatives.push(hybrid_alt.clone());
        }
        alternatives.push(consensus_alternative(&alternatives));

        let report = PredictionReport {
            id: Uuid::new_v4(),
            draw_type_id: draw_type_id.unwrap_or(DrawTypeId(0)),
            generated_at: Utc::now(),
            winning: winning.clone(),
            machine: machine.clone(),
            hybrid,
            alternatives,
            correlation_strength,
        };

        let predicted_at = report.generated_at;
        let _ = self
            .prediction_log
            .append(PredictionHistoryEntry::new(report.draw_type_id, Stream::Winning, predicted_at, winning.numbers))
            .await;
        if let Some(machine_pred) = &machine {
            let _ = self
                .prediction_log
                .append(PredictionHistoryEntry::new(report.draw_type_id, Stream::Machine, predicted_at, machine_pred.numbers))
                .await;
        }

        self.cache.put(key, report.clone());

        Ok(PredictionResponse { report, cached: false, age_seconds: 0, day_of_week_fallback_applied: fallback_applied })
    }

    pub async fn evaluate(
        &self,
        numbers: [u8; 5],
        draw_type_id: Option<DrawTypeId>,
        day_of_week: Option<u8>,
    ) -> Result<EvaluationReport> {
        validate_numbers(&numbers)?;

        let all = self.draws_for(draw_type_id).await?;
        let (draws, _) = Self::apply_day_filter(all, day_of_week);
        let ctx = StrategyContext::build(&draws, Stream::Winning);
        let ml = self.ml_source.rank(&draws, Stream::Winning, ML_CANDIDATE_COUNT).await.unwrap_or_default();
        let score_map = self.winning_brain.score(&ctx, &ml).await;

        let hot_threshold = hot_frequency_threshold(&ctx);
        let evaluated: Vec<EvaluatedNumber> = numbers
            .iter()
            .map(|&n| EvaluatedNumber {
                number: n,
                score: score_map.score_of(n),
                is_hot: ctx.frequency_of(n) >= hot_threshold.0,
                is_warm: ctx.frequency_of(n) >= hot_threshold.1 && ctx.frequency_of(n) < hot_threshold.0,
            })
            .collect();

        let total_score: f64 = evaluated.iter().map(|e| e.score).sum();
        let avg_score = total_score / evaluated.len() as f64;
        let confidence = (avg_score * 100.0 + 40.0).min(95.0);

        let last_draw = draws.last().and_then(|d| d.numbers(Stream::Winning));
        let matches = last_draw.map(|actual| exact_matches(&numbers, &actual).len() as u8).unwrap_or(0);
        let strong_matches =
            evaluated.iter().filter(|e| e.score > avg_score * 1.5).count().min(matches as usize) as u8;
        let synergy_bonus = numbers.iter().filter(|&&n| score_map.votes_of(n) >= 3).count() as f64 * 0.1;

        let mut ranked: Vec<(u8, f64)> = (1..=90u8).map(|n| (n, score_map.score_of(n))).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let top_candidates: Vec<u8> =
            ranked.into_iter().filter(|(n, _)| !numbers.contains(n)).take(10).map(|(n, _)| n).collect();

        let recommendation = if confidence >= 85.0 {
            Recommendation::Excellent
        } else if confidence >= 70.0 {
            Recommendation::Bon
        } else if confidence >= 50.0 {
            Recommendation::Moyen
        } else {
            Recommendation::Risque
        };

        Ok(EvaluationReport {
            numbers: evaluated,
            total_score,
            confidence,
            matches,
            strong_matches,
            synergy_bonus,
            top_candidates,
            recommendation,
        })
    }

    pub async fn brain_status(&self, stream: Stream) -> BrainStatusReport {
        let state = match stream {
            Stream::Winning => self.winning_brain.status().await,
            Stream::Machine => self.machine_brain.status().await,
        };

        let mut verified_count = 0u32;
        let mut total_exact_matches = 0u32;
        if let Ok(all_entries) = self.prediction_log.all().await {
            for entry in all_entries.into_iter().filter(|e| e.stream == stream) {
                if let crate::models::VerificationStatus::Verified { exact_matches, .. } = entry.status {
                    verified_count += 1;
                    total_exact_matches += exact_matches as u32;
                }
            }
        }
        let accuracy = if verified_count == 0 { 0.0 } else { total_exact_matches as f64 / (verified_count as f64 * 5.0) };

        BrainStatusReport { state, real_performance: RealPerformance { verified_count, total_exact_matches, accuracy } }
    }

    pub async fn refresh(&self, force_train: bool) -> Result<RefreshOutcome> {
        if self.is_refreshing.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return Err(EngineError::state_conflict("refresh already in progress"));
        }

        let outcome = self.run_refresh(force_train).await;

        self.is_refreshing.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_refresh(&self, force_train: bool) -> Result<RefreshOutcome> {
        self.cache.invalidate_all();

        // Verification must happen-before training in the same refresh
        // cycle, so the Brain never trains on a draw whose matching
        // prediction history entry is still sitting unreconciled.
        let _ = self.verification_loop.run(self.prediction_log.as_ref(), self.draw_store.as_ref(), force_train).await;

        let types = self.draw_store.draw_types().await.unwrap_or_default();
        let mut trained_types = 0;
        for draw_type in &types {
            let draws = self.draw_store.draws_for_type(draw_type.id).await.unwrap_or_default();
            let Some(actual) = draws.last().cloned() else { continue };
            if !(force_train || self.config.run_analysis) {
                continue;
            }
            let _ = self.winning_brain.learn(&actual, &draws, Some(draw_type.id), self.brain_store.as_ref()).await;
            let _ = self.machine_brain.learn(&actual, &draws, Some(draw_type.id), self.brain_store.as_ref()).await;
            trained_types += 1;
        }

        let _ = self.draw_store.mark_refreshed(Utc::now()).await;

        counter!("refreshes_total", 1, "forced" => force_train.to_string());
        Ok(RefreshOutcome { success: true, message: format!("refreshed {trained_types} draw type(s)") })
    }
}

fn validate_numbers(numbers: &[u8; 5]) -> Result<()> {
    if numbers.iter().any(|&n| n < 1 || n > 90) {
        return Err(EngineError::invalid_input("numbers must be within 1..=90"));
    }
    let unique: std::collections::HashSet<u8> = numbers.iter().copied().collect();
    if unique.len() != 5 {
        return Err(EngineError::invalid_input("numbers must be distinct"));
    }
    Ok(())
}

fn to_fixed(numbers: &[u8]) -> [u8; 5] {
    let mut out = [0u8; 5];
    for (i, &n) in numbers.iter().take(5).enumerate() {
        out[i] = n;
    }
    out
}

fn build_stream_prediction(stream: Stream, selection: &selector::Selection, scores: &ScoreMap) -> StreamPrediction {
    let scored: Vec<ScoredNumber> = selection
        .numbers
        .iter()
        .map(|&n| ScoredNumber { number: n, score: scores.score_of(n), contributing_strategies: Vec::new() })
        .collect();
    StreamPrediction { stream, numbers: to_fixed(&selection.numbers), confidence: selection.confidence, scored }
}

/// Numbers appearing in at least two of the winning/machine/hybrid
/// alternatives, highest-confidence-first; non-normative per spec §9.
fn consensus_alternative(existing: &[Alternative]) -> Alternative {
    let mut counts: std::collections::HashMap<u8, u32> = std::collections::HashMap::new();
    for alt in existing {
        for &n in &alt.numbers {
            if n != 0 {
                *counts.entry(n).or_insert(0) += 1;
            }
        }
    }
    let mut agreed: Vec<(u8, u32)> = counts.into_iter().filter(|&(_, c)| c >= 2).collect();
    agreed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut numbers: Vec<u8> = agreed.into_iter().map(|(n, _)| n).take(5).collect();
    numbers.sort_unstable();
    let confidence = existing.iter().map(|a| a.confidence).sum::<f64>() / existing.len().max(1) as f64;
    Alternative { label: "consensus".to_string(), numbers: to_fixed(&numbers), confidence }
}

/// `(hot_threshold, warm_threshold)`: the raw-frequency cutoffs for the
/// top decile (hot) and top third (warm) of observed numbers.
fn hot_frequency_threshold(ctx: &StrategyContext) -> (u32, u32) {
    let mut freqs: Vec<u32> = ctx.frequency.to_vec();
    freqs.sort_unstable_by(|a, b| b.cmp(a));
    let hot_idx = (freqs.len() / 10).min(freqs.len().saturating_sub(1));
    let warm_idx = (freqs.len() / 3).min(freqs.len().saturating_sub(1));
    (freqs.get(hot_idx).copied().unwrap_or(0), freqs.get(warm_idx).copied().unwrap_or(0))
}
