//! End-to-end retrieval flow over an in-memory search index fake.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ulid::Ulid;

use graft_core::{
    ConfidenceTier, GraftConfig, GraftError, QueryClass, RankedCandidate, Result, SearchIndex,
};
use graft_embed::{EmbeddingCache, MockEmbeddingProvider};
use graft_query::{ContextTracker, RetrievalEngine, Session};

/// In-memory search index returning canned candidate lists.
struct MemoryIndex {
    lexical: Vec<RankedCandidate>,
    semantic: Vec<RankedCandidate>,
    fail: bool,
}

impl MemoryIndex {
    fn new(lexical: Vec<RankedCandidate>, semantic: Vec<RankedCandidate>) -> Self {
        Self {
            lexical,
            semantic,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            lexical: Vec::new(),
            semantic: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn lexical_search(&self, _query: &str, limit: u32) -> Result<Vec<RankedCandidate>> {
        if self.fail {
            return Err(GraftError::search_provider("lexical index offline"));
        }
        Ok(self.lexical.iter().take(limit as usize).cloned().collect())
    }

    async fn vector_search(&self, _embedding: &[f32], limit: u32) -> Result<Vec<RankedCandidate>> {
        if self.fail {
            return Err(GraftError::search_provider("vector index offline"));
        }
        Ok(self.semantic.iter().take(limit as usize).cloned().collect())
    }
}

fn ulid(n: u128) -> Ulid {
    Ulid::from(n)
}

fn candidate(id: u128, content: &str, rank: u32) -> RankedCandidate {
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), serde_json::json!("handbook.md"));
    RankedCandidate {
        chunk_id: ulid(id),
        content: content.to_string(),
        metadata,
        rank,
        raw_score: 1.0 / rank as f32,
    }
}

fn engine(index: MemoryIndex) -> RetrievalEngine<MemoryIndex, MockEmbeddingProvider> {
    let config = GraftConfig::default();
    let cache = Arc::new(EmbeddingCache::new(
        Arc::new(MockEmbeddingProvider::new()),
        &config.cache,
    ));
    RetrievalEngine::new(Arc::new(index), cache, config)
}

#[tokio::test]
async fn test_hybrid_retrieval_rewards_agreement() {
    let index = MemoryIndex::new(
        vec![
            candidate(1, "alpha cluster rollout notes", 1),
            candidate(2, "bravo deployment checklist", 2),
        ],
        vec![
            candidate(2, "bravo deployment checklist", 1),
            candidate(3, "charlie capacity planning", 2),
        ],
    );
    let engine = engine(index);
    let mut tracker = ContextTracker::new(&engine.config().context);

    let outcome = engine
        .retrieve("notes about the deployment checklist", &mut tracker, None)
        .await
        .unwrap();

    // Chunk 2 hit both methods and must lead.
    assert_eq!(outcome.results[0].chunk_id, ulid(2));
    assert_eq!(outcome.results[0].lexical_rank, Some(2));
    assert_eq!(outcome.results[0].semantic_rank, Some(1));
    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.confidence > 0.0);
    assert_eq!(outcome.profile.class, QueryClass::Balanced);
    // Metadata rides through fusion and curation untouched.
    assert_eq!(
        outcome.results[0].metadata.get("source").unwrap(),
        &serde_json::json!("handbook.md")
    );
}

#[tokio::test]
async fn test_no_candidates_is_a_normal_empty_outcome() {
    let engine = engine(MemoryIndex::new(Vec::new(), Vec::new()));
    let mut tracker = ContextTracker::new(&engine.config().context);

    let outcome = engine
        .retrieve("anything at all really", &mut tracker, None)
        .await
        .unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(outcome.tier, ConfidenceTier::Low);
}

#[tokio::test]
async fn test_single_method_degrades_gracefully() {
    let index = MemoryIndex::new(
        Vec::new(),
        vec![
            candidate(5, "entirely semantic hit", 1),
            candidate(6, "another semantic hit", 2),
        ],
    );
    let engine = engine(index);
    let mut tracker = ContextTracker::new(&engine.config().context);

    let outcome = engine
        .retrieve("broad exploratory question with no term matches", &mut tracker, None)
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].chunk_id, ulid(5));
    assert_eq!(outcome.results[1].chunk_id, ulid(6));
}

#[tokio::test]
async fn test_requested_count_truncates() {
    let index = MemoryIndex::new(
        (1..=8).map(|i| candidate(i, "lexical hit", i as u32)).collect(),
        (11..=18).map(|i| candidate(i, "semantic hit", (i - 10) as u32)).collect(),
    );
    let engine = Arc::new(engine(index));
    let mut session = Session::new(Arc::clone(&engine));

    let outcome = session.ask_for("deployment runbook details", 3).await.unwrap();
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.profile.requested_count, 3);
}

#[tokio::test]
async fn test_session_resolves_follow_up_queries() {
    let index = MemoryIndex::new(
        vec![candidate(1, "signing key rotation runbook", 1)],
        vec![candidate(1, "signing key rotation runbook", 1)],
    );
    let engine = Arc::new(engine(index));
    let mut session = Session::new(Arc::clone(&engine));

    session.ask("rotating the signing keys").await.unwrap();
    let outcome = session.ask("and what about staging?").await.unwrap();

    assert_eq!(
        outcome.profile.resolved_text,
        "rotating the signing keys and what about staging?"
    );
    assert_eq!(outcome.profile.raw_text, "and what about staging?");
    // Question-form resolved text classifies as conceptual.
    assert_eq!(outcome.profile.class, QueryClass::Conceptual);

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], "rotating the signing keys");
}

#[tokio::test]
async fn test_session_window_stays_bounded() {
    let index = MemoryIndex::new(
        vec![candidate(1, "some chunk", 1)],
        vec![candidate(1, "some chunk", 1)],
    );
    let engine = Arc::new(engine(index));
    let mut session = Session::new(Arc::clone(&engine));

    for i in 0..8 {
        session
            .ask(&format!("fresh standalone question number {}", i))
            .await
            .unwrap();
    }

    let window_size = engine.config().context.window_size;
    assert_eq!(session.history().len(), window_size);

    session.reset();
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_search_provider_failure_propagates() {
    let engine = engine(MemoryIndex::failing());
    let mut tracker = ContextTracker::new(&engine.config().context);

    let result = engine
        .retrieve("any query text here", &mut tracker, None)
        .await;

    assert!(matches!(result, Err(GraftError::SearchProvider { .. })));
    // Failed turns do not feed later reference resolution.
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn test_embedding_provider_failure_propagates() {
    let config = GraftConfig::default();
    let cache = Arc::new(EmbeddingCache::new(
        Arc::new(MockEmbeddingProvider::failing()),
        &config.cache,
    ));
    let index = MemoryIndex::new(
        vec![candidate(1, "some chunk", 1)],
        vec![candidate(1, "some chunk", 1)],
    );
    let engine = RetrievalEngine::new(Arc::new(index), cache, config);
    let mut tracker = ContextTracker::new(&engine.config().context);

    let result = engine
        .retrieve("any query text here", &mut tracker, None)
        .await;

    assert!(matches!(result, Err(GraftError::EmbeddingProvider { .. })));
}

#[tokio::test]
async fn test_repeated_queries_share_one_embedding_call() {
    let config = GraftConfig::default();
    let cache = Arc::new(EmbeddingCache::new(
        Arc::new(MockEmbeddingProvider::new()),
        &config.cache,
    ));
    let index = MemoryIndex::new(
        vec![candidate(1, "some chunk", 1)],
        vec![candidate(1, "some chunk", 1)],
    );
    let engine = RetrievalEngine::new(Arc::new(index), Arc::clone(&cache), config);
    let mut tracker = ContextTracker::new(&engine.config().context);

    engine
        .retrieve("Fusion Parameter Defaults", &mut tracker, None)
        .await
        .unwrap();
    engine
        .retrieve("  fusion parameter defaults  ", &mut tracker, None)
        .await
        .unwrap();

    let stats = cache.stats().await;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_invalid_query_rejected_before_any_search() {
    let engine = engine(MemoryIndex::failing());
    let mut tracker = ContextTracker::new(&engine.config().context);

    // The failing index would error if reached; the empty query must be
    // rejected first.
    let result = engine.retrieve("   ", &mut tracker, None).await;
    assert!(matches!(result, Err(GraftError::InvalidQuery { .. })));
}
