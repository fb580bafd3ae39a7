//! Deterministic mock embedding provider for tests.

use async_trait::async_trait;

use graft_core::{EmbeddingProvider, GraftError, Result};

/// Mock provider producing deterministic, L2-normalized vectors seeded
/// from the text's bytes. Identical input always yields an identical
/// vector, the same guarantee the cache expects from a real provider.
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail: bool,
}

impl MockEmbeddingProvider {
    /// Create a mock provider with the default dimension.
    pub fn new() -> Self {
        Self {
            dimension: 512,
            fail: false,
        }
    }

    /// Create a mock provider with a custom dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            fail: false,
        }
    }

    /// Create a provider whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            dimension: 512,
            fail: true,
        }
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(GraftError::embedding_provider("mock provider unavailable"));
        }

        let hash = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut embedding = vec![0.0f32; self.dimension];
        for (i, v) in embedding.iter_mut().enumerate() {
            *v = ((hash.wrapping_mul(i as u64 + 1)) as f32 % 1000.0) / 1000.0 - 0.5;
        }

        // L2 normalize
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
