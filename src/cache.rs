//! Prediction Cache: short-TTL memoization keyed by (drawType, dayOfWeek).
//!
//! Grounded on the teacher's multi-tier cache manager
//! (`cache/manager.rs`/`cache/memory_cache.rs`), trimmed to the single
//! TTL tier this crate needs and built directly on `cached::TimedCache`
//! rather than the teacher's bespoke LRU/LFU/ARC policy machinery (see
//! DESIGN.md for what was dropped and why).

use std::sync::Mutex;

use cached::stores::TimedCache;
use cached::Cached;
use chrono::{DateTime, Utc};

use crate::models::{DrawTypeId, PredictionReport};

/// `None` in either slot means "all" (unfiltered), matching the spec's
/// `(drawTypeId or "all", dayOfWeek or "all")` key shape.
pub type CacheKey = (Option<DrawTypeId>, Option<u8>);

struct Entry {
    report: PredictionReport,
    inserted_at: DateTime<Utc>,
}

pub struct PredictionCache {
    inner: Mutex<TimedCache<CacheKey, Entry>>,
}

#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub report: PredictionReport,
    pub cached: bool,
    pub age_seconds: i64,
}

impl PredictionCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self { inner: Mutex::new(TimedCache::with_lifespan(ttl_seconds)) }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheLookup> {
        let mut guard = self.inner.lock().expect("prediction cache lock poisoned");
        guard.cache_get(key).map(|entry| CacheLookup {
            report: entry.report.clone(),
            cached: true,
            age_seconds: (Utc::now() - entry.inserted_at).num_seconds().max(0),
        })
    }

    /// Concurrent insert/replace, last-writer-wins (spec §5).
    pub fn put(&self, key: CacheKey, report: PredictionReport) {
        let mut guard = self.inner.lock().expect("prediction cache lock poisoned");
        guard.cache_set(key, Entry { report, inserted_at: Utc::now() });
    }

    /// New-data signal from the draw store adapter invalidates everything.
    pub fn invalidate_all(&self) {
        let mut guard = self.inner.lock().expect("prediction cache lock poisoned");
        guard.cache_clear();
    }
}
