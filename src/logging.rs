//! Structured logging bootstrap.
//!
//! The teacher carries a bespoke logging framework (`logging/logger.rs`,
//! `logging/appender.rs`, ...) that duplicates what `tracing` already does
//! and is never wired into its own `main.rs`. We skip reinventing it and
//! initialize `tracing-subscriber` directly instead, the way the teacher's
//! `Cargo.toml` dependency on `tracing`/`tracing-subscriber` and its scattered
//! `tracing::debug!`/`tracing::warn!` call sites (`database/query_optimizer.rs`,
//! `config/manager.rs`) imply it was meant to be used.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. Safe to call more than once
/// per process (subsequent calls are no-ops); call it once from `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
