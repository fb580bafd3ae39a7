//! Threshold filtering, boosting, and confidence estimation for fused
//! results.

use tracing::debug;

use graft_core::{CurationConfig, CuratedSet, FusedResult, GraftConfig, QueryProfile};

use crate::text;

/// Applies score thresholds, exact-match and term-overlap boosts, and
/// computes a confidence estimate for a fused result set.
pub struct ResultCurator {
    config: CurationConfig,
}

impl ResultCurator {
    /// Create a curator from the engine configuration.
    pub fn new(config: &GraftConfig) -> Self {
        Self {
            config: config.curation.clone(),
        }
    }

    /// Filter, boost, re-sort, and annotate the fused set.
    ///
    /// An empty input produces the empty set with confidence 0.0, the
    /// "no relevant context found" outcome, not an error. When the
    /// threshold would drop every result of a non-empty input, the single
    /// best result is kept instead.
    ///
    /// Boosts are recomputed from each result's pre-boost base score
    /// (`fused_score - boost`), so curating an already-curated set yields
    /// the same scores and order.
    pub fn curate(&self, results: Vec<FusedResult>, profile: &QueryProfile) -> CuratedSet {
        if results.is_empty() {
            return CuratedSet::empty();
        }

        let mut survivors = self.apply_threshold(results);
        let query_tokens = text::token_set(&profile.resolved_text);

        for result in &mut survivors {
            let base = result.fused_score - result.boost;
            let content_tokens = text::token_set(&result.content);

            let mut boost = 0.0;
            if query_tokens.iter().any(|t| content_tokens.contains(t)) {
                boost += self.config.exact_match_bonus;
            }
            let overlap = query_tokens.intersection(&content_tokens).count();
            boost += overlap as f32 * self.config.overlap_bonus;

            result.boost = boost;
            result.fused_score = base + boost;
        }

        // Boosts can reorder results.
        FusedResult::sort(&mut survivors);

        let confidence = (survivors[0].fused_score * self.config.confidence_scale).clamp(0.0, 1.0);

        debug!(
            kept = survivors.len(),
            confidence, "curated fused results"
        );

        CuratedSet {
            results: survivors,
            confidence,
        }
    }

    /// Drop results below the minimum score, keeping the single best
    /// result when the filter would otherwise empty a non-empty set.
    fn apply_threshold(&self, results: Vec<FusedResult>) -> Vec<FusedResult> {
        let min_score = self.config.min_score;
        // Compare on the pre-boost base so the fallback pick is stable
        // across repeated curation.
        let best = results
            .iter()
            .enumerate()
            .max_by(|(ai, a), (bi, b)| {
                (a.fused_score - a.boost)
                    .partial_cmp(&(b.fused_score - b.boost))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    // On equal scores prefer the earlier entry.
                    .then(bi.cmp(ai))
            })
            .map(|(i, _)| i);

        let survivors: Vec<FusedResult> = results
            .iter()
            .filter(|r| r.fused_score - r.boost >= min_score)
            .cloned()
            .collect();

        if survivors.is_empty() {
            match best {
                Some(i) => vec![results[i].clone()],
                None => Vec::new(),
            }
        } else {
            survivors
        }
    }
}
