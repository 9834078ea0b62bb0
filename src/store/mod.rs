//! Draw storage: the external collaborator that owns draw history.
//!
//! Grounded on the teacher's `Repository<T, ID>` trait in
//! `repository/traits.rs` — narrowed from the teacher's generic
//! create/read/update/delete/count surface down to the handful of
//! read/write operations this crate's core actually needs, since
//! persistence itself is an external concern (spec §1 Non-goals).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Draw, DrawType, DrawTypeId};

/// Draw history, as seen by the prediction core. A single-writer (the
/// periodic refresh task) / many-readers resource; readers may observe a
/// slightly stale view between refreshes (spec §5), which this trait's
/// `async fn` surface does not prevent but the in-memory implementation
/// below honors via a reader/writer lock rather than per-call I/O.
#[async_trait]
pub trait DrawStore: Send + Sync {
    async fn draw_types(&self) -> Result<Vec<DrawType>>;

    async fn draw_type_by_name(&self, name: &str) -> Result<Option<DrawType>>;

    /// All known draws for a draw type, chronologically ordered oldest
    /// first. Returns an empty vector for a draw type with no history.
    async fn draws_for_type(&self, draw_type_id: DrawTypeId) -> Result<Vec<Draw>>;

    /// Append a newly observed draw. Idempotent: appending a draw whose
    /// numbers match the most recent stored draw for the same type is a
    /// no-op rather than a duplicate entry.
    async fn record_draw(&self, draw: Draw) -> Result<()>;

    /// Timestamp of the most recent successful refresh, if any has run.
    async fn last_refreshed_at(&self) -> Result<Option<DateTime<Utc>>>;

    async fn mark_refreshed(&self, at: DateTime<Utc>) -> Result<()>;
}

#[derive(Default)]
struct InMemoryState {
    types: Vec<DrawType>,
    draws: HashMap<DrawTypeId, Vec<Draw>>,
    last_refreshed_at: Option<DateTime<Utc>>,
}

/// Reference `DrawStore` used by tests and by the binary's demo wiring.
/// Real deployments substitute a database-backed implementation behind
/// the same trait; this crate's core never depends on which one is live.
pub struct InMemoryDrawStore {
    state: RwLock<InMemoryState>,
}

impl InMemoryDrawStore {
    pub fn new(types: Vec<DrawType>) -> Self {
        Self {
            state: RwLock::new(InMemoryState { types, draws: HashMap::new(), last_refreshed_at: None }),
        }
    }

    pub fn seed(&self, draw_type_id: DrawTypeId, draws: Vec<Draw>) {
        let mut state = self.state.write().expect("draw store lock poisoned");
        state.draws.insert(draw_type_id, draws);
    }
}

#[async_trait]
impl DrawStore for InMemoryDrawStore {
    async fn draw_types(&self) -> Result<Vec<DrawType>> {
        Ok(self.state.read().expect("draw store lock poisoned").types.clone())
    }

    async fn draw_type_by_name(&self, name: &str) -> Result<Option<DrawType>> {
        Ok(self
            .state
            .read()
            .expect("draw store lock poisoned")
            .types
            .iter()
            .find(|dt| dt.name_matches(name))
            .cloned())
    }

    async fn draws_for_type(&self, draw_type_id: DrawTypeId) -> Result<Vec<Draw>> {
        Ok(self
            .state
            .read()
            .expect("draw store lock poisoned")
            .draws
            .get(&draw_type_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_draw(&self, draw: Draw) -> Result<()> {
        let mut state = self.state.write().expect("draw store lock poisoned");
        let entries = state.draws.entry(draw.draw_type_id).or_default();
        if let Some(last) = entries.last() {
            if last.same_numbers(&draw) {
                return Ok(());
            }
        }
        entries.push(draw);
        Ok(())
    }

    async fn last_refreshed_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.state.read().expect("draw store lock poisoned").last_refreshed_at)
    }

    async fn mark_refreshed(&self, at: DateTime<Utc>) -> Result<()> {
        self.state.write().expect("draw store lock poisoned").last_refreshed_at = Some(at);
        Ok(())
    }
}
