//! Prediction engine and online-learning brain for a multi-tirage daily
//! lottery: eight scoring strategies, an ensemble scorer with neighbor
//! redistribution and a synergy amplifier, a decade-balanced selector, a
//! cross-stream correlation booster, and per-stream reinforcement-style
//! weight tuning ("the Brain"). Storage, scraping, and the HTTP façade are
//! external collaborators, specified here only as traits.

pub mod analysis;
pub mod booster;
pub mod brain;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod matching;
pub mod ml;
pub mod models;
pub mod scorer;
pub mod selector;
pub mod store;
pub mod strategies;
pub mod verification;

pub use engine::Engine;
pub use error::{EngineError, Result};
