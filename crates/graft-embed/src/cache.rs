//! Capacity-bounded LRU cache in front of the embedding provider.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use graft_core::{CacheConfig, EmbeddingProvider, Result};

/// Cache observability counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,

    /// Lookups that went to the provider.
    pub misses: u64,

    /// Entries evicted to make room.
    pub evictions: u64,
}

/// One cached vector with its recency tick.
struct Entry {
    vector: Vec<f32>,
    tick: u64,
}

/// Mutable cache interior, guarded by one lock.
struct Inner {
    entries: HashMap<String, Entry>,
    clock: u64,
    stats: CacheStats,
}

impl Inner {
    /// Bump the clock and return the new tick. Ticks are unique within a
    /// run, so least-recently-used is a strict order and eviction is
    /// deterministic.
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.tick)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

/// Memoizes `text -> vector` lookups in front of an external embedding
/// provider.
///
/// A hit returns the stored vector with no external call; the provider is
/// assumed deterministic for identical normalized input, so the stored
/// vector is bit-identical to what the provider would return. The cache
/// never retries a failed provider call; retry policy belongs to the
/// caller.
///
/// The cache holds no session-specific data and may be shared across
/// concurrent sessions behind an `Arc`.
pub struct EmbeddingCache<P> {
    provider: Arc<P>,
    capacity: usize,
    inner: Mutex<Inner>,
}

impl<P> EmbeddingCache<P>
where
    P: EmbeddingProvider,
{
    /// Create a cache over the given provider.
    pub fn new(provider: Arc<P>, config: &CacheConfig) -> Self {
        Self {
            provider,
            capacity: config.capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                clock: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Return the embedding for `text`, consulting the cache first.
    ///
    /// The lock is released around the provider call so a slow provider
    /// does not serialize unrelated lookups. Two concurrent misses on the
    /// same key both call the provider; determinism makes the duplicate
    /// insert harmless.
    pub async fn get_or_compute(&self, text: &str) -> Result<Vec<f32>> {
        let key = normalize_key(text);

        {
            let mut inner = self.inner.lock().await;
            if let Some(entry) = inner.entries.get(&key) {
                let vector = entry.vector.clone();
                let tick = inner.tick();
                if let Some(entry) = inner.entries.get_mut(&key) {
                    entry.tick = tick;
                }
                inner.stats.hits += 1;
                trace!(key = %key, "embedding cache hit");
                return Ok(vector);
            }
            inner.stats.misses += 1;
        }

        debug!(key = %key, "embedding cache miss");
        let vector = self.provider.embed(&key).await?;

        let mut inner = self.inner.lock().await;
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            inner.evict_lru();
        }
        let tick = inner.tick();
        inner.entries.insert(
            key,
            Entry {
                vector: vector.clone(),
                tick,
            },
        );

        Ok(vector)
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// True when nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    /// The embedding dimension of the underlying provider.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }
}

/// Normalize a cache key so trivially-different queries share a cache
/// line: trim surrounding whitespace and case-fold.
fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}
