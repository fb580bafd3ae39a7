//! Configuration types for the retrieval engine.
//!
//! Every empirically chosen constant (RRF k, the weight table, boost
//! bonuses, thresholds, window and cache bounds) is a configuration
//! default here, not a fixed constant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GraftError, Result};

/// Main configuration for the retrieval engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraftConfig {
    /// Query analysis configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Rank fusion configuration.
    #[serde(default)]
    pub fusion: FusionConfig,

    /// Result curation configuration.
    #[serde(default)]
    pub curation: CurationConfig,

    /// Embedding cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Conversation context configuration.
    #[serde(default)]
    pub context: ContextConfig,

    /// Confidence tier cut-offs.
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

/// A lexical/semantic weight pair for one query class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightPair {
    /// Multiplier for lexical rank contributions.
    pub lexical: f32,

    /// Multiplier for semantic rank contributions.
    pub semantic: f32,
}

/// Query analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Maximum accepted query length in characters.
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    /// Token count at or below which a bare query is classified keyword.
    #[serde(default = "default_short_query_tokens")]
    pub short_query_tokens: usize,

    /// Lead words that escalate a conceptual query's semantic weight.
    #[serde(default = "default_question_lead_words")]
    pub question_lead_words: Vec<String>,

    /// Weights for queries containing a quoted span.
    #[serde(default = "default_exact_term_weights")]
    pub exact_term_weights: WeightPair,

    /// Weights for question-form queries.
    #[serde(default = "default_conceptual_weights")]
    pub conceptual_weights: WeightPair,

    /// Weights for question-form queries opening with a question lead word.
    #[serde(default = "default_conceptual_lead_weights")]
    pub conceptual_lead_weights: WeightPair,

    /// Weights for short bare-term queries.
    #[serde(default = "default_keyword_weights")]
    pub keyword_weights: WeightPair,

    /// Weights for everything else.
    #[serde(default = "default_balanced_weights")]
    pub balanced_weights: WeightPair,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_query_chars: default_max_query_chars(),
            short_query_tokens: default_short_query_tokens(),
            question_lead_words: default_question_lead_words(),
            exact_term_weights: default_exact_term_weights(),
            conceptual_weights: default_conceptual_weights(),
            conceptual_lead_weights: default_conceptual_lead_weights(),
            keyword_weights: default_keyword_weights(),
            balanced_weights: default_balanced_weights(),
        }
    }
}

/// Rank fusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// RRF smoothing constant. Dampens rank-1 dominance; must be large
    /// enough that rank differences beyond the top ~10 have negligible
    /// effect.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f32,

    /// Default number of fused results when the caller does not ask for
    /// a specific count.
    #[serde(default = "default_count")]
    pub default_count: usize,

    /// Maximum number of fused results.
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Each method is asked for `requested_count * fetch_multiplier`
    /// candidates (floor `fetch_floor`) so agreement between methods can
    /// surface results outside either method's top slice.
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: u32,

    /// Minimum candidates fetched per method.
    #[serde(default = "default_fetch_floor")]
    pub fetch_floor: u32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: default_rrf_k(),
            default_count: default_count(),
            max_count: default_max_count(),
            fetch_multiplier: default_fetch_multiplier(),
            fetch_floor: default_fetch_floor(),
        }
    }
}

/// Result curation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Results scoring below this are dropped (the single best result is
    /// kept when the filter would drop everything).
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Bonus added when a query token occurs verbatim in the content.
    #[serde(default = "default_exact_match_bonus")]
    pub exact_match_bonus: f32,

    /// Bonus added per token shared between query and content.
    #[serde(default = "default_overlap_bonus")]
    pub overlap_bonus: f32,

    /// Confidence is `min(1.0, top_score * confidence_scale)`.
    #[serde(default = "default_confidence_scale")]
    pub confidence_scale: f32,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            exact_match_bonus: default_exact_match_bonus(),
            overlap_bonus: default_overlap_bonus(),
            confidence_scale: default_confidence_scale(),
        }
    }
}

/// Embedding cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached embeddings.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// Conversation context configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Number of prior resolved queries retained per session.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Lead words/phrases that mark a query as referential.
    #[serde(default = "default_referential_lead_words")]
    pub referential_lead_words: Vec<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            referential_lead_words: default_referential_lead_words(),
        }
    }
}

/// Confidence tier cut-offs for the downstream generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Confidence at or above this is the high tier.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f32,

    /// Confidence at or above this (but below high) is the medium tier.
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

// Default value functions

fn default_max_query_chars() -> usize {
    2048
}

fn default_short_query_tokens() -> usize {
    3
}

fn default_question_lead_words() -> Vec<String> {
    [
        "how", "why", "what", "when", "where", "who", "which", "como", "por", "que",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exact_term_weights() -> WeightPair {
    WeightPair {
        lexical: 2.0,
        semantic: 0.5,
    }
}

fn default_conceptual_weights() -> WeightPair {
    WeightPair {
        lexical: 0.6,
        semantic: 1.6,
    }
}

fn default_conceptual_lead_weights() -> WeightPair {
    WeightPair {
        lexical: 0.6,
        semantic: 1.8,
    }
}

fn default_keyword_weights() -> WeightPair {
    WeightPair {
        lexical: 1.8,
        semantic: 0.5,
    }
}

fn default_balanced_weights() -> WeightPair {
    WeightPair {
        lexical: 1.0,
        semantic: 1.2,
    }
}

fn default_rrf_k() -> f32 {
    50.0
}

fn default_count() -> usize {
    10
}

fn default_max_count() -> usize {
    100
}

fn default_fetch_multiplier() -> u32 {
    2
}

fn default_fetch_floor() -> u32 {
    20
}

fn default_min_score() -> f32 {
    0.01
}

fn default_exact_match_bonus() -> f32 {
    0.01
}

fn default_overlap_bonus() -> f32 {
    0.005
}

fn default_confidence_scale() -> f32 {
    10.0
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_window_size() -> usize {
    5
}

fn default_referential_lead_words() -> Vec<String> {
    [
        "and what about",
        "what about",
        "how about",
        "and",
        "also",
        "e",
        "y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_high_threshold() -> f32 {
    0.7
}

fn default_medium_threshold() -> f32 {
    0.4
}

impl GraftConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| GraftError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("graft").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("graft.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Check cross-field invariants the serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.fusion.rrf_k <= 0.0 {
            return Err(GraftError::config("fusion.rrf_k must be positive"));
        }
        if self.fusion.default_count == 0 || self.fusion.max_count == 0 {
            return Err(GraftError::config("fusion result counts must be nonzero"));
        }
        if self.fusion.default_count > self.fusion.max_count {
            return Err(GraftError::config(
                "fusion.default_count exceeds fusion.max_count",
            ));
        }
        if self.curation.min_score < 0.0 {
            return Err(GraftError::config("curation.min_score must be >= 0"));
        }
        if self.cache.capacity == 0 {
            return Err(GraftError::config("cache.capacity must be nonzero"));
        }
        if self.context.window_size == 0 {
            return Err(GraftError::config("context.window_size must be nonzero"));
        }
        let high = self.confidence.high_threshold;
        let medium = self.confidence.medium_threshold;
        if !(0.0..=1.0).contains(&high) || !(0.0..=1.0).contains(&medium) {
            return Err(GraftError::config(
                "confidence thresholds must lie in [0, 1]",
            ));
        }
        if medium > high {
            return Err(GraftError::config(
                "confidence.medium_threshold exceeds confidence.high_threshold",
            ));
        }
        Ok(())
    }
}
