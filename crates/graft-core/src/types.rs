//! Core domain types for the retrieval engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ulid::Ulid;

/// One entry in a single-method result list, as returned by a search
/// provider. `rank` is the 1-based position in that method's ordering and
/// must be a strict total order within one list (no duplicate chunk id,
/// no duplicate rank).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Identifier of the matched chunk.
    pub chunk_id: Ulid,

    /// Chunk text content.
    pub content: String,

    /// Source metadata, opaque to the engine.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// 1-based rank in the source method's ordering.
    pub rank: u32,

    /// Method-native relevance score. Not comparable across methods;
    /// fusion operates on rank alone.
    pub raw_score: f32,
}

impl RankedCandidate {
    /// Create a candidate without metadata (common in tests and fakes).
    pub fn new(chunk_id: Ulid, content: &str, rank: u32, raw_score: f32) -> Self {
        Self {
            chunk_id,
            content: content.to_string(),
            metadata: HashMap::new(),
            rank,
            raw_score,
        }
    }
}

/// A fused result produced by rank fusion and refined by curation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedResult {
    /// Identifier of the chunk.
    pub chunk_id: Ulid,

    /// Chunk text content.
    pub content: String,

    /// Source metadata, opaque to the engine.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Fused relevance score (>= 0). Strictly determines output order,
    /// descending; ties broken by `chunk_id` ascending.
    pub fused_score: f32,

    /// Curation bonus currently folded into `fused_score`. Curation
    /// recomputes boosts from `fused_score - boost`, so re-running it on
    /// its own output does not stack bonuses.
    #[serde(default)]
    pub boost: f32,

    /// Rank this chunk held in the lexical list, if it appeared there.
    pub lexical_rank: Option<u32>,

    /// Rank this chunk held in the semantic list, if it appeared there.
    pub semantic_rank: Option<u32>,
}

impl FusedResult {
    /// Ordering rule shared by fusion and curation: score descending,
    /// ties by chunk id ascending.
    pub fn sort(results: &mut [FusedResult]) {
        results.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.chunk_id.cmp(&b.chunk_id))
        });
    }
}

/// Query classification, applied in order with first match winning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryClass {
    /// Contains a quoted span; the user wants literal matches.
    ExactTerm,
    /// Ends with a question mark; semantic search dominates.
    Conceptual,
    /// Short bare-term query; lexical search dominates.
    Keyword,
    /// Everything else.
    Balanced,
}

impl std::fmt::Display for QueryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ExactTerm => "exact-term",
            Self::Conceptual => "conceptual",
            Self::Keyword => "keyword",
            Self::Balanced => "balanced",
        };
        write!(f, "{}", s)
    }
}

/// Derived per-request query profile. Constructed per request and
/// discarded when the request completes; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryProfile {
    /// Query text as received.
    pub raw_text: String,

    /// Query text after conversational reference resolution.
    pub resolved_text: String,

    /// Classification of the resolved text.
    pub class: QueryClass,

    /// Multiplicative factor for lexical rank contributions.
    pub lexical_weight: f32,

    /// Multiplicative factor for semantic rank contributions.
    pub semantic_weight: f32,

    /// How many fused results to return.
    pub requested_count: usize,
}

/// Curated output: ordered results plus a confidence estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedSet {
    /// Post-boost results, ordered by fused score.
    pub results: Vec<FusedResult>,

    /// Clamped monotonic proxy for answer reliability, in [0, 1].
    /// Forced to 0.0 when `results` is empty.
    pub confidence: f32,
}

impl CuratedSet {
    /// An empty set with zero confidence (the "no relevant context
    /// found" outcome).
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Confidence tier used by the downstream generator to select an
/// instruction template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Map a confidence value to a tier given the configured cut-offs.
    pub fn from_confidence(confidence: f32, config: &crate::config::ConfidenceConfig) -> Self {
        if confidence >= config.high_threshold {
            Self::High
        } else if confidence >= config.medium_threshold {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Everything one retrieval produces: the derived profile, the curated
/// results, the confidence estimate and tier, and the wall-clock latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    /// Profile derived for this request.
    pub profile: QueryProfile,

    /// Curated, ordered results.
    pub results: Vec<FusedResult>,

    /// Confidence estimate in [0, 1].
    pub confidence: f32,

    /// Tier derived from `confidence`.
    pub tier: ConfidenceTier,

    /// Retrieval latency in milliseconds.
    pub latency_ms: u64,
}

impl RetrievalOutcome {
    /// True when no relevant context was found.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
