//! Environment-driven configuration.
//!
//! Grounded on `config/types.rs` and `config/manager.rs` from the teacher,
//! trimmed to the surface this crate needs: the teacher's multi-source,
//! remote, and hot-reload machinery has no counterpart here (see
//! DESIGN.md). What survives is the same spirit — named, validated fields
//! instead of scattered magic numbers — loaded once from the process
//! environment per the CLI/env surface in the spec.

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Port the (out-of-scope) HTTP façade would bind to. The core doesn't
    /// listen on anything itself, but validates and carries the value on
    /// the façade's behalf.
    pub port: u16,
    /// Minutes between background refreshes; `0` disables the background
    /// refresh task entirely.
    pub refresh_interval_minutes: u32,
    /// Whether the periodic refresh should also run analyzer-backed
    /// pattern storage.
    pub run_analysis: bool,
    /// Correlation booster multiplier (spec §4.6), default 1.30.
    pub boost_factor: f64,
    /// Prediction cache TTL in seconds (spec §4.8), default 600 (10 min).
    pub cache_ttl_seconds: u64,
    /// Minimum seconds between verification loop ticks (spec §4.9).
    pub verification_min_interval_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            refresh_interval_minutes: 60,
            run_analysis: true,
            boost_factor: 1.30,
            cache_ttl_seconds: 600,
            verification_min_interval_seconds: 60,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment, falling back to
    /// defaults for anything unset. Never panics; an unparsable value is
    /// reported as `EngineError::InvalidInput` naming the offending key.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("PORT") {
            config.port = parse_env("PORT", &raw)?;
        }
        if let Ok(raw) = std::env::var("REFRESH_INTERVAL") {
            config.refresh_interval_minutes = parse_env("REFRESH_INTERVAL", &raw)?;
        }
        if let Ok(raw) = std::env::var("RUN_ANALYSIS") {
            config.run_analysis = parse_bool_env("RUN_ANALYSIS", &raw)?;
        }
        if let Ok(raw) = std::env::var("BOOST_FACTOR") {
            config.boost_factor = parse_env("BOOST_FACTOR", &raw)?;
        }
        if let Ok(raw) = std::env::var("CACHE_TTL_SECONDS") {
            config.cache_ttl_seconds = parse_env("CACHE_TTL_SECONDS", &raw)?;
        }
        if let Ok(raw) = std::env::var("VERIFICATION_MIN_INTERVAL_SECONDS") {
            config.verification_min_interval_seconds = parse_env("VERIFICATION_MIN_INTERVAL_SECONDS", &raw)?;
        }

        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.boost_factor <= 0.0 {
            return Err(EngineError::invalid_input("BOOST_FACTOR must be positive"));
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::invalid_input(format!("{key}: cannot parse {raw:?}")))
}

fn parse_bool_env(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EngineError::invalid_input(format!("{key}: cannot parse {raw:?} as bool"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.refresh_interval_minutes, 60);
        assert!(config.run_analysis);
        assert!((config.boost_factor - 1.30).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_boost_factor() {
        let mut config = EngineConfig::default();
        config.boost_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        assert_eq!(parse_bool_env("X", "true").unwrap(), true);
        assert_eq!(parse_bool_env("X", "0").unwrap(), false);
        assert!(parse_bool_env("X", "maybe").is_err());
    }
}
