//! Prediction history log: append-only, bounded, externally persisted.
//!
//! Grounded on `repository/traits.rs`'s `Repository<T, ID>`. Per design
//! note §9, "file-based" is an implementation choice; this crate exposes
//! the trait plus an in-memory reference implementation, and treats a
//! real file-backed one as substitutable.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PredictionHistoryEntry;

pub const MAX_HISTORY_ENTRIES: usize = 1000;

#[async_trait]
pub trait PredictionLog: Send + Sync {
    /// Append a new entry, evicting the oldest once the log exceeds
    /// `MAX_HISTORY_ENTRIES`.
    async fn append(&self, entry: PredictionHistoryEntry) -> Result<()>;

    /// All entries whose verification is still pending, newest first.
    async fn pending(&self) -> Result<Vec<PredictionHistoryEntry>>;

    /// Every entry, verified or not, newest first.
    async fn all(&self) -> Result<Vec<PredictionHistoryEntry>>;

    /// In-place update of an existing entry (verification result).
    async fn update(&self, entry: PredictionHistoryEntry) -> Result<()>;

    async fn len(&self) -> Result<usize>;
}

#[derive(Default)]
pub struct InMemoryPredictionLog {
    entries: RwLock<Vec<PredictionHistoryEntry>>,
}

#[async_trait]
impl PredictionLog for InMemoryPredictionLog {
    async fn append(&self, entry: PredictionHistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().expect("prediction log lock poisoned");
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<PredictionHistoryEntry>> {
        Ok(self
            .entries
            .read()
            .expect("prediction log lock poisoned")
            .iter()
            .filter(|e| !e.status.is_verified())
            .cloned()
            .collect())
    }

    async fn update(&self, entry: PredictionHistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().expect("prediction log lock poisoned");
        if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PredictionHistoryEntry>> {
        Ok(self.entries.read().expect("prediction log lock poisoned").clone())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().expect("prediction log lock poisoned").len())
    }
}
