//! Reciprocal Rank Fusion (RRF) over two ranked candidate lists.
//!
//! RRF operates purely on rank position, which sidesteps normalizing
//! lexical relevance scores against vector distances: the two methods'
//! raw scores are never compared.

use std::collections::HashMap;

use ulid::Ulid;

use graft_core::{FusedResult, GraftError, RankedCandidate, Result, WeightPair};

/// Fuse a lexical and a semantic candidate list into one deduplicated,
/// score-ordered list.
///
/// Each chunk scores
/// `lex_w / (k + lexical_rank) + sem_w / (k + semantic_rank)`, with a
/// method contributing zero when the chunk is absent from its list. A
/// chunk present in both lists sums both contributions, rewarding
/// agreement between methods. Content and metadata come from the lexical
/// copy when both sides hit.
///
/// Fails with `EmptyCandidateSet` only when both lists are empty; a
/// single empty list degrades to weighted single-method ranking.
pub fn fuse(
    lexical: &[RankedCandidate],
    semantic: &[RankedCandidate],
    weights: WeightPair,
    k: f32,
    limit: usize,
) -> Result<Vec<FusedResult>> {
    if lexical.is_empty() && semantic.is_empty() {
        return Err(GraftError::EmptyCandidateSet);
    }

    let mut fused: HashMap<Ulid, FusedResult> = HashMap::new();

    for candidate in lexical {
        let contribution = weights.lexical / (k + candidate.rank as f32);
        fused.insert(
            candidate.chunk_id,
            FusedResult {
                chunk_id: candidate.chunk_id,
                content: candidate.content.clone(),
                metadata: candidate.metadata.clone(),
                fused_score: contribution,
                boost: 0.0,
                lexical_rank: Some(candidate.rank),
                semantic_rank: None,
            },
        );
    }

    for candidate in semantic {
        let contribution = weights.semantic / (k + candidate.rank as f32);
        match fused.get_mut(&candidate.chunk_id) {
            Some(existing) => {
                // Lexical copy of content/metadata is kept.
                existing.fused_score += contribution;
                existing.semantic_rank = Some(candidate.rank);
            }
            None => {
                fused.insert(
                    candidate.chunk_id,
                    FusedResult {
                        chunk_id: candidate.chunk_id,
                        content: candidate.content.clone(),
                        metadata: candidate.metadata.clone(),
                        fused_score: contribution,
                        boost: 0.0,
                        lexical_rank: None,
                        semantic_rank: Some(candidate.rank),
                    },
                );
            }
        }
    }

    let mut results: Vec<FusedResult> = fused.into_values().collect();
    FusedResult::sort(&mut results);
    results.truncate(limit);

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQUAL: WeightPair = WeightPair {
        lexical: 1.0,
        semantic: 1.0,
    };

    fn ulid(n: u128) -> Ulid {
        Ulid::from(n)
    }

    fn candidates(ids: &[u128]) -> Vec<RankedCandidate> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                RankedCandidate::new(ulid(id), &format!("chunk {}", id), i as u32 + 1, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_both_empty_is_an_error() {
        let result = fuse(&[], &[], EQUAL, 50.0, 10);
        assert!(matches!(result, Err(GraftError::EmptyCandidateSet)));
    }

    #[test]
    fn test_single_list_degrades_gracefully() {
        let semantic = candidates(&[1, 2, 3]);
        let fused = fuse(&[], &semantic, EQUAL, 50.0, 10).unwrap();

        assert_eq!(fused.len(), 3);
        // Order follows the semantic ranking, scores are 1/(k + rank).
        assert_eq!(fused[0].chunk_id, ulid(1));
        assert!((fused[0].fused_score - 1.0 / 51.0).abs() < 1e-6);
        assert_eq!(fused[0].lexical_rank, None);
        assert_eq!(fused[0].semantic_rank, Some(1));
    }

    #[test]
    fn test_agreement_outranks_single_method_top() {
        // A chunk ranked 1st in both lists must outrank, with equal
        // weights, chunks ranked 1st in only one list.
        let lexical = candidates(&[7, 1]);
        let semantic = candidates(&[7, 2]);

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();
        assert_eq!(fused[0].chunk_id, ulid(7));
        assert!(fused[0].fused_score > fused[1].fused_score);
    }

    #[test]
    fn test_documented_fusion_example() {
        // lexical [(A,1),(B,2)], semantic [(B,1),(C,2)], k=50, equal
        // weights: B = 1/52 + 1/51 beats A = 1/51 beats C = 1/52.
        let a = 1u128;
        let b = 2u128;
        let c = 3u128;
        let lexical = vec![
            RankedCandidate::new(ulid(a), "alpha", 1, 9.0),
            RankedCandidate::new(ulid(b), "bravo", 2, 8.0),
        ];
        let semantic = vec![
            RankedCandidate::new(ulid(b), "bravo", 1, 0.1),
            RankedCandidate::new(ulid(c), "charlie", 2, 0.2),
        ];

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();

        assert_eq!(fused.len(), 3);
        assert_eq!(fused[0].chunk_id, ulid(b));
        let b_score = 1.0 / 52.0 + 1.0 / 51.0;
        assert!((fused[0].fused_score - b_score).abs() < 1e-6);

        // A at lexical rank 1 and C at semantic rank 2 score 1/51 and
        // 1/52; A comes second on score alone.
        assert_eq!(fused[1].chunk_id, ulid(a));
        assert_eq!(fused[2].chunk_id, ulid(c));
    }

    #[test]
    fn test_equal_scores_tie_break_by_id() {
        // Same rank in opposite lists with equal weights produces equal
        // scores; ascending chunk id decides.
        let lexical = vec![RankedCandidate::new(ulid(9), "lex", 1, 1.0)];
        let semantic = vec![RankedCandidate::new(ulid(4), "sem", 1, 1.0)];

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();
        assert_eq!(fused[0].chunk_id, ulid(4));
        assert_eq!(fused[1].chunk_id, ulid(9));
    }

    #[test]
    fn test_output_is_union_without_duplicates() {
        let lexical = candidates(&[1, 2, 3]);
        let semantic = candidates(&[3, 4, 5]);

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();
        assert_eq!(fused.len(), 5);

        let mut ids: Vec<u128> = fused.iter().map(|r| u128::from(r.chunk_id)).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lexical_copy_preferred_on_double_hit() {
        let lexical = vec![RankedCandidate::new(ulid(1), "lexical text", 1, 1.0)];
        let semantic = vec![RankedCandidate::new(ulid(1), "semantic text", 1, 1.0)];

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].content, "lexical text");
        assert_eq!(fused[0].lexical_rank, Some(1));
        assert_eq!(fused[0].semantic_rank, Some(1));
    }

    #[test]
    fn test_weight_monotonicity() {
        // Raising the lexical weight never drops a lexical-only hit
        // below a semantic-only hit of equal raw rank.
        let lexical = vec![RankedCandidate::new(ulid(1), "lex", 1, 1.0)];
        let semantic = vec![RankedCandidate::new(ulid(2), "sem", 1, 1.0)];

        let before = fuse(&lexical, &semantic, EQUAL, 50.0, 10).unwrap();
        let lex_pos_before = before.iter().position(|r| r.chunk_id == ulid(1)).unwrap();

        let heavier = WeightPair {
            lexical: 2.0,
            semantic: 1.0,
        };
        let after = fuse(&lexical, &semantic, heavier, 50.0, 10).unwrap();
        let lex_pos_after = after.iter().position(|r| r.chunk_id == ulid(1)).unwrap();

        assert!(lex_pos_after <= lex_pos_before);
        assert_eq!(after[0].chunk_id, ulid(1));
    }

    #[test]
    fn test_truncation_to_limit() {
        let lexical = candidates(&[1, 2, 3, 4]);
        let semantic = candidates(&[5, 6, 7, 8]);

        let fused = fuse(&lexical, &semantic, EQUAL, 50.0, 3).unwrap();
        assert_eq!(fused.len(), 3);
    }
}
