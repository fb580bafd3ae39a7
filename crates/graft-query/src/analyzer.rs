//! Query classification and fusion-weight derivation.

use tracing::debug;

use graft_core::{
    AnalyzerConfig, FusionConfig, GraftConfig, GraftError, QueryClass, QueryProfile, Result,
    WeightPair,
};

use crate::text;

/// Classifies a query and derives fusion weights and search parameters
/// from it. Pure: no side effects, no external calls.
pub struct QueryAnalyzer {
    config: AnalyzerConfig,
    fusion: FusionConfig,
}

impl QueryAnalyzer {
    /// Create an analyzer from the engine configuration.
    pub fn new(config: &GraftConfig) -> Self {
        Self {
            config: config.analyzer.clone(),
            fusion: config.fusion.clone(),
        }
    }

    /// Produce a query profile for a resolved query.
    ///
    /// `raw_text` is validated before any external call happens;
    /// classification reads `resolved_text`, the text the engine will
    /// actually search with.
    pub fn analyze(
        &self,
        raw_text: &str,
        resolved_text: &str,
        requested_count: Option<usize>,
    ) -> Result<QueryProfile> {
        if raw_text.trim().is_empty() {
            return Err(GraftError::invalid_query("query is empty"));
        }
        let chars = raw_text.chars().count();
        if chars > self.config.max_query_chars {
            return Err(GraftError::invalid_query(format!(
                "query length {} exceeds maximum of {}",
                chars, self.config.max_query_chars
            )));
        }

        let class = self.classify(resolved_text);
        let weights = self.weights_for(class, resolved_text);
        let requested_count = requested_count
            .unwrap_or(self.fusion.default_count)
            .clamp(1, self.fusion.max_count);

        debug!(
            class = %class,
            lexical_weight = weights.lexical,
            semantic_weight = weights.semantic,
            "classified query"
        );

        Ok(QueryProfile {
            raw_text: raw_text.to_string(),
            resolved_text: resolved_text.to_string(),
            class,
            lexical_weight: weights.lexical,
            semantic_weight: weights.semantic,
            requested_count,
        })
    }

    /// Ordered, total classification; first match wins.
    fn classify(&self, resolved_text: &str) -> QueryClass {
        if text::has_quoted_span(resolved_text) {
            QueryClass::ExactTerm
        } else if resolved_text.trim_end().ends_with('?') {
            QueryClass::Conceptual
        } else if text::tokenize(resolved_text).len() <= self.config.short_query_tokens {
            QueryClass::Keyword
        } else {
            QueryClass::Balanced
        }
    }

    fn weights_for(&self, class: QueryClass, resolved_text: &str) -> WeightPair {
        match class {
            QueryClass::ExactTerm => self.config.exact_term_weights,
            QueryClass::Conceptual => {
                if self.starts_with_question_lead(resolved_text) {
                    self.config.conceptual_lead_weights
                } else {
                    self.config.conceptual_weights
                }
            }
            QueryClass::Keyword => self.config.keyword_weights,
            QueryClass::Balanced => self.config.balanced_weights,
        }
    }

    fn starts_with_question_lead(&self, resolved_text: &str) -> bool {
        let first = match text::tokenize(resolved_text).into_iter().next() {
            Some(token) => token,
            None => return false,
        };
        self.config
            .question_lead_words
            .iter()
            .any(|lead| text::normalize(lead) == first)
    }
}
