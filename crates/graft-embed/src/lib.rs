//! graft-embed - Bounded embedding cache
//!
//! This crate memoizes text-to-vector lookups in front of an external
//! embedding provider so that repeated and trivially-different queries
//! share one provider call.
//!
//! # Features
//!
//! - Normalized cache keys (trim + case-fold)
//! - Capacity-bounded LRU eviction with deterministic order
//! - Shareable across concurrent sessions
//! - Hit/miss/eviction counters

mod cache;
mod provider;

pub use cache::{CacheStats, EmbeddingCache};
pub use provider::MockEmbeddingProvider;

// Re-export the provider trait for convenience
pub use graft_core::EmbeddingProvider;
