//! Retrieval engine orchestrating one query end to end.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use graft_core::{
    ConfidenceTier, CuratedSet, EmbeddingProvider, GraftConfig, GraftError, Result,
    RetrievalOutcome, SearchIndex, WeightPair,
};
use graft_embed::EmbeddingCache;

use crate::analyzer::QueryAnalyzer;
use crate::context::ContextTracker;
use crate::curator::ResultCurator;
use crate::fusion;

/// Hybrid retrieval engine.
///
/// Resolves conversational references, classifies the query, runs the
/// lexical and vector searches in parallel, fuses the two rankings with
/// RRF, and curates the fused set. The engine holds no per-session state;
/// sessions pass their own [`ContextTracker`] in.
pub struct RetrievalEngine<S, P> {
    /// Search boundary onto the lexical and vector indexes.
    index: Arc<S>,

    /// Shared embedding cache in front of the embedding provider.
    cache: Arc<EmbeddingCache<P>>,

    analyzer: QueryAnalyzer,
    curator: ResultCurator,
    config: GraftConfig,
}

impl<S, P> RetrievalEngine<S, P>
where
    S: SearchIndex,
    P: EmbeddingProvider,
{
    /// Create a new retrieval engine.
    pub fn new(index: Arc<S>, cache: Arc<EmbeddingCache<P>>, config: GraftConfig) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(&config),
            curator: ResultCurator::new(&config),
            index,
            cache,
            config,
        }
    }

    /// Retrieve context for one query within a session.
    ///
    /// `count` overrides the configured default result count. The
    /// resolved query is recorded in the tracker only when retrieval
    /// succeeds, so failed turns do not feed later reference resolution.
    /// External failures propagate without retry; an empty candidate set
    /// from both methods is reported as an empty outcome with confidence
    /// 0.0, not as an error.
    pub async fn retrieve(
        &self,
        raw_query: &str,
        tracker: &mut ContextTracker,
        count: Option<usize>,
    ) -> Result<RetrievalOutcome> {
        let start = Instant::now();

        let resolved = tracker.resolve(raw_query);
        let profile = self.analyzer.analyze(raw_query, &resolved, count)?;

        info!(query = raw_query, class = %profile.class, "retrieving");

        let embedding = self.cache.get_or_compute(&resolved).await?;

        let fetch_k = (profile.requested_count as u32 * self.config.fusion.fetch_multiplier)
            .max(self.config.fusion.fetch_floor);

        let (lexical, semantic) = tokio::join!(
            self.index.lexical_search(&resolved, fetch_k),
            self.index.vector_search(&embedding, fetch_k)
        );
        let lexical = lexical?;
        let semantic = semantic?;

        debug!(
            lexical_hits = lexical.len(),
            semantic_hits = semantic.len(),
            "search methods returned"
        );

        let weights = WeightPair {
            lexical: profile.lexical_weight,
            semantic: profile.semantic_weight,
        };
        let curated = match fusion::fuse(
            &lexical,
            &semantic,
            weights,
            self.config.fusion.rrf_k,
            profile.requested_count,
        ) {
            Ok(fused) => self.curator.curate(fused, &profile),
            // Nothing matched anywhere: a normal no-context outcome.
            Err(GraftError::EmptyCandidateSet) => CuratedSet::empty(),
            Err(e) => return Err(e),
        };

        tracker.record(&resolved);

        let tier = ConfidenceTier::from_confidence(curated.confidence, &self.config.confidence);
        let latency_ms = start.elapsed().as_millis() as u64;

        info!(
            results = curated.results.len(),
            confidence = curated.confidence,
            tier = %tier,
            latency_ms,
            "retrieval completed"
        );

        Ok(RetrievalOutcome {
            profile,
            results: curated.results,
            confidence: curated.confidence,
            tier,
            latency_ms,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &GraftConfig {
        &self.config
    }
}
