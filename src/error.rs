//! Crate-wide error type.
//!
//! Grounded on the teacher's `errors/super_lotto_error.rs` and
//! `error/types.rs`: a single `thiserror`-derived enum with constructor
//! helpers, mapped to the error kinds of the spec's error-handling design
//! (`InvalidInput`, `Unavailable`, `Internal`, `StateConflict`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed request: wrong count, out-of-range number, duplicate.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Backing store unreachable, ml feature missing. Core degrades rather
    /// than failing the caller; this variant exists for logging, not for
    /// turning into a user-visible 5xx.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Programming error or persistence failure during a write.
    #[error("internal error: {0}")]
    Internal(String),

    /// Attempted to start a refresh/verification pass while one is running.
    #[error("state conflict: {0}")]
    StateConflict(String),
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::StateConflict(message.into())
    }

    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidInput(_) | EngineError::StateConflict(_))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Internal(format!("json error: {err}"))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Unavailable(format!("io error: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
