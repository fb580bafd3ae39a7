//! Core traits defining the collaborator boundaries.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RankedCandidate;

/// Search boundary onto the datastore hosting the lexical and vector
/// indexes. Both methods must return strict, duplicate-free, 1-based rank
/// order; the engine fuses on rank alone.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Term-match search over the full-text index.
    async fn lexical_search(&self, query: &str, limit: u32) -> Result<Vec<RankedCandidate>>;

    /// Similarity search over the vector index, ranked by ascending
    /// distance.
    async fn vector_search(&self, embedding: &[f32], limit: u32) -> Result<Vec<RankedCandidate>>;
}

/// External embedding provider. Must be deterministic for identical
/// input text; the embedding cache relies on this to return bit-identical
/// vectors on a hit.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a fixed-length vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}
