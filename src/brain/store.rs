//! Brain persistence seam.
//!
//! Grounded on `repository/traits.rs`'s `Repository<T, ID>`, narrowed to
//! the two operations a per-stream blob actually needs: the spec's
//! `ai_memory` table is keyed by stream id, not by an arbitrary id type.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BrainState, Stream};

#[async_trait]
pub trait BrainStore: Send + Sync {
    async fn load(&self, stream: Stream) -> Result<Option<BrainState>>;
    async fn save(&self, stream: Stream, state: &BrainState) -> Result<()>;
}

/// Reference implementation used by tests and the binary's demo wiring.
#[derive(Default)]
pub struct InMemoryBrainStore {
    blobs: RwLock<HashMap<Stream, BrainState>>,
}

#[async_trait]
impl BrainStore for InMemoryBrainStore {
    async fn load(&self, stream: Stream) -> Result<Option<BrainState>> {
        Ok(self.blobs.read().expect("brain store lock poisoned").get(&stream).cloned())
    }

    async fn save(&self, stream: Stream, state: &BrainState) -> Result<()> {
        self.blobs.write().expect("brain store lock poisoned").insert(stream, state.clone());
        Ok(())
    }
}
