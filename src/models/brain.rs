//! Brain state: weights, accuracy statistics, and learning history.
//!
//! Grounded on `super_lotto/models.rs`'s `PredictionAlgorithm` enum (typed,
//! `FromStr`/`Display`-round-tripping algorithm identifiers instead of bare
//! strings) applied to the spec's eight recognized strategy keys, and on
//! the teacher's `AnalysisCache`/`PatternAnalysis` pattern of a bounded,
//! serializable record of past activity for `BrainState::history`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::draw::{Draw, DrawTypeId};

pub const MIN_WEIGHT: f64 = 0.05;
pub const MAX_WEIGHT: f64 = 0.60;
pub const MAX_HISTORY: usize = 50;

/// The eight strategy identities the Brain tunes weights for. `Lstm` is the
/// external-ml slot; its weight is present but never adjusted by `Learn`
/// (spec §4.7 step 5: "all except lstm, which is externally governed").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKey {
    Hot,
    Due,
    Correlation,
    Position,
    Balanced,
    Statistical,
    Finales,
    Lstm,
}

impl StrategyKey {
    pub const ALL: [StrategyKey; 8] = [
        StrategyKey::Hot,
        StrategyKey::Due,
        StrategyKey::Correlation,
        StrategyKey::Position,
        StrategyKey::Balanced,
        StrategyKey::Statistical,
        StrategyKey::Finales,
        StrategyKey::Lstm,
    ];

    pub fn is_tuned_by_learning(self) -> bool {
        !matches!(self, StrategyKey::Lstm)
    }
}

impl std::fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrategyKey::Hot => "hot",
            StrategyKey::Due => "due",
            StrategyKey::Correlation => "correlation",
            StrategyKey::Position => "position",
            StrategyKey::Balanced => "balanced",
            StrategyKey::Statistical => "statistical",
            StrategyKey::Finales => "finales",
            StrategyKey::Lstm => "lstm",
        };
        write!(f, "{s}")
    }
}

impl FromStr for StrategyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(StrategyKey::Hot),
            "due" => Ok(StrategyKey::Due),
            "correlation" => Ok(StrategyKey::Correlation),
            "position" => Ok(StrategyKey::Position),
            "balanced" => Ok(StrategyKey::Balanced),
            "statistical" => Ok(StrategyKey::Statistical),
            "finales" => Ok(StrategyKey::Finales),
            "lstm" => Ok(StrategyKey::Lstm),
            other => Err(format!("unknown strategy key: {other}")),
        }
    }
}

impl Serialize for StrategyKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StrategyKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        StrategyKey::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

/// Strategy-key -> weight mapping, clamped to `[MIN_WEIGHT, MAX_WEIGHT]`
/// and L1-normalized after every mutation (spec §3 invariants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights(BTreeMap<StrategyKey, f64>);

impl Default for Weights {
    fn default() -> Self {
        // Equal split across the eight recognized keys.
        let even = 1.0 / StrategyKey::ALL.len() as f64;
        let mut map = BTreeMap::new();
        for key in StrategyKey::ALL {
            map.insert(key, even);
        }
        Weights(map).normalized()
    }
}

impl Weights {
    /// Build weights from an explicit set of (key, value) pairs, unclamped
    /// and unnormalized; keys absent from `pairs` read back as exactly 0
    /// via [`Weights::get`]. Used to exercise the scorer with a hand-picked
    /// weight vector, e.g. comparing two strategies head-to-head.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (StrategyKey, f64)>) -> Self {
        Weights(pairs.into_iter().collect())
    }

    pub fn get(&self, key: StrategyKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrategyKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Inject any default keys missing from a loaded blob, then
    /// re-normalize — the Brain migration step of spec §4.7.
    pub fn with_missing_keys_injected(mut self) -> (Self, bool) {
        let mut injected = false;
        for key in StrategyKey::ALL {
            self.0.entry(key).or_insert_with(|| {
                injected = true;
                MIN_WEIGHT
            });
        }
        if injected {
            self = self.normalized();
        }
        (self, injected)
    }

    /// Clamp every weight to `[MIN_WEIGHT, MAX_WEIGHT]`, then L1-normalize
    /// so the weights sum to 1.
    pub fn normalized(mut self) -> Self {
        for value in self.0.values_mut() {
            *value = value.clamp(MIN_WEIGHT, MAX_WEIGHT);
        }
        let sum: f64 = self.0.values().sum();
        if sum > 0.0 {
            for value in self.0.values_mut() {
                *value /= sum;
            }
        }
        self
    }

    /// Apply a per-key delta (e.g. from the reinforcement step), clamp,
    /// and re-normalize in one pass.
    pub fn adjusted(mut self, deltas: &HashMap<StrategyKey, f64>) -> Self {
        for (key, delta) in deltas {
            let entry = self.0.entry(*key).or_insert(MIN_WEIGHT);
            *entry += delta;
        }
        self.normalized()
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn rounded_to_two_decimals(mut self) -> Self {
        for value in self.0.values_mut() {
            *value = (*value * 100.0).round() / 100.0;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub total_draws: u64,
    pub total_hits: u64,
}

impl AccuracyStats {
    /// `totalHits / (totalDraws * 5)`, 0 when no draws have been scored.
    pub fn global_accuracy(&self) -> f64 {
        if self.total_draws == 0 {
            0.0
        } else {
            self.total_hits as f64 / (self.total_draws as f64 * 5.0)
        }
    }

    pub fn record(&mut self, hits: u32) {
        self.total_draws += 1;
        self.total_hits += hits as u64;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainHistoryEntry {
    pub date: DateTime<Utc>,
    pub draw: Draw,
    pub strat_scores: BTreeMap<StrategyKey, f64>,
    pub global_match: u8,
    pub new_weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainState {
    pub version: u32,
    pub last_tuned: Option<DateTime<Utc>>,
    pub weights: Weights,
    pub stats_global: AccuracyStats,
    pub stats_by_type: HashMap<DrawTypeId, AccuracyStats>,
    pub history: VecDeque<BrainHistoryEntry>,
    pub last_analyzed_draw: Option<Draw>,
}

impl Default for BrainState {
    fn default() -> Self {
        Self {
            version: 1,
            last_tuned: None,
            weights: Weights::default(),
            stats_global: AccuracyStats::default(),
            stats_by_type: HashMap::new(),
            history: VecDeque::new(),
            last_analyzed_draw: None,
        }
    }
}

impl BrainState {
    /// Run the default-key-injection migration this crate requires of any
    /// freshly loaded brain (spec §4.7 "Brain migration on load").
    pub fn migrated(mut self) -> Self {
        let (weights, injected) = self.weights.with_missing_keys_injected();
        self.weights = if injected { weights.rounded_to_two_decimals() } else { weights };
        self
    }

    pub fn push_history(&mut self, entry: BrainHistoryEntry) {
        self.history.push_back(entry);
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }
}
