//! The incremental clustering pass

use crate::distance::DistanceMatrix;
use crate::error::EngineError;
use framescope_domain::{ChatMessage, ChatModel, Frame, FrameId, RelationEdge, RelationType};
use framescope_extractor::RelationClassifier;
use std::fmt;
use tracing::{debug, info, warn};

/// Additive penalty that pushes inactive frames out of the shortlist
const INACTIVE_PENALTY: f32 = 1e6;

/// Distance above which a shortlist slot is treated as "not active"
const ACTIVE_CUTOFF: f32 = 1e5;

/// Configuration for the clustering pass
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum candidate shortlist size per pending frame
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// Result of a completed clustering pass
#[derive(Debug)]
pub struct ClusterOutcome {
    /// Active-set mask over the unique frames, indexed by FrameId
    pub active: Vec<bool>,

    /// Every edge the classifier returned, in production order
    pub relations: Vec<RelationEdge>,

    /// Raw classifier replies, one per pending frame, for archival
    pub responses: Vec<ChatMessage>,
}

/// The incremental clustering engine
///
/// Owns the classifier adapter for the duration of a pass. The active-set
/// mask and edge list are exclusive to the single execution thread; the pass
/// runs to completion once started (the step boundary is the only safe
/// suspension point, and there is none here).
pub struct ClusterEngine<C: ChatModel> {
    classifier: RelationClassifier<C>,
    config: EngineConfig,
}

impl<C: ChatModel> ClusterEngine<C>
where
    C::Error: fmt::Display,
{
    /// Create an engine over a classifier adapter
    pub fn new(classifier: RelationClassifier<C>, config: EngineConfig) -> Self {
        Self { classifier, config }
    }

    /// Run the single forward pass over `frames` in input order.
    ///
    /// The first frame is pre-activated; every later frame triggers exactly
    /// one classifier call. Edges are recorded regardless of whether they
    /// change the mask.
    pub fn run(
        &self,
        frames: &[Frame],
        distances: &DistanceMatrix,
    ) -> Result<ClusterOutcome, EngineError> {
        if distances.len() != frames.len() {
            return Err(EngineError::EmbeddingCount {
                expected: frames.len(),
                got: distances.len(),
            });
        }

        let mut active = vec![false; frames.len()];
        if !frames.is_empty() {
            active[0] = true;
        }

        let mut relations: Vec<RelationEdge> = Vec::new();
        let mut responses: Vec<ChatMessage> = Vec::new();

        for current in 1..frames.len() {
            let candidates = self.shortlist(current, frames, distances, &active);
            debug!(
                "frame {}: {} candidates in shortlist",
                current,
                candidates.len()
            );

            let (edges, response) = self
                .classifier
                .classify(current, &frames[current].text, &candidates)
                .map_err(|e| EngineError::Classifier(e.to_string()))?;
            responses.push(response);

            if edges.is_empty() {
                // Novel (or unparseable - indistinguishable) claim.
                active[current] = true;
            }

            self.apply_first_match(&edges, current, frames, &mut active);
            relations.extend(edges);
        }

        info!(
            "clustering pass complete: {} frames, {} active, {} edges",
            frames.len(),
            active.iter().filter(|a| **a).count(),
            relations.len()
        );

        Ok(ClusterOutcome {
            active,
            relations,
            responses,
        })
    }

    /// Up to `top_k` nearest active frames, ties broken by ascending id.
    ///
    /// Inactive frames (including the pending frame itself) carry a large
    /// additive penalty and are then excluded by the cutoff, so a shortlist
    /// slot is never wasted on them.
    fn shortlist<'a>(
        &self,
        current: usize,
        frames: &'a [Frame],
        distances: &DistanceMatrix,
        active: &[bool],
    ) -> Vec<(FrameId, &'a str)> {
        let mut scored: Vec<(f32, usize)> = (0..frames.len())
            .map(|j| {
                let mut d = distances.get(current, j);
                if !active[j] {
                    d += INACTIVE_PENALTY;
                }
                (d, j)
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        scored
            .into_iter()
            .take(self.config.top_k)
            .filter(|(d, _)| *d <= ACTIVE_CUTOFF)
            .map(|(_, j)| (j, frames[j].text.as_str()))
            .collect()
    }

    /// Ordered dispatch over the closed relation set: act on the FIRST known
    /// type and stop. An unknown type is logged and skipped WITHOUT stopping,
    /// so a later known edge in the same response can still apply.
    fn apply_first_match(
        &self,
        edges: &[RelationEdge],
        current: usize,
        frames: &[Frame],
        active: &mut [bool],
    ) {
        let mut ordered: Vec<&RelationEdge> = edges.iter().collect();
        ordered.sort_by_key(|e| e.relation.priority());

        for edge in ordered {
            match &edge.relation {
                RelationType::Paraphrases => {
                    // Keep only the shorter text active, measured in
                    // characters, not bytes. On a tie (or when the
                    // already-active side is shorter) nothing changes: the
                    // pending frame's claim is absorbed, the frame object
                    // persists to carry the edge for reduction.
                    if frames[edge.x].text.chars().count() < frames[edge.y].text.chars().count() {
                        active[edge.x] = true;
                        active[edge.y] = false;
                    }
                    break;
                }
                RelationType::Specializes | RelationType::Contradicts => {
                    // Keep both sides in play.
                    active[current] = true;
                    break;
                }
                RelationType::Other(word) => {
                    warn!("Unknown relation type: {}", word);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framescope_llm::MockChatModel;

    fn frame(id: FrameId, text: &str) -> Frame {
        Frame::new(id, text, "")
    }

    /// Identity-ish matrix: frame i sits at coordinate (i, 0).
    fn line_matrix(n: usize) -> DistanceMatrix {
        let embeddings: Vec<Vec<f32>> = (0..n).map(|i| vec![i as f32, 0.0]).collect();
        DistanceMatrix::from_embeddings(&embeddings).unwrap()
    }

    fn engine_with(responses: &[&str], top_k: usize) -> ClusterEngine<MockChatModel> {
        let mut chat = MockChatModel::default();
        for response in responses {
            chat.push_response(*response);
        }
        ClusterEngine::new(
            RelationClassifier::new(chat, Vec::new()),
            EngineConfig { top_k },
        )
    }

    #[test]
    fn test_first_frame_pre_activated_and_novel_frames_join() {
        let frames = vec![frame(0, "A"), frame(1, "B")];
        let engine = engine_with(&[""], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![true, true]);
        assert!(outcome.relations.is_empty());
        assert_eq!(outcome.responses.len(), 1);
    }

    #[test]
    fn test_end_to_end_duplicate_scenario() {
        // ["A", "A", "B"] deduplicates to two unique frames; the classifier
        // reports no relation for frame 1, so it activates.
        use framescope_extractor::{dedup_frames, FrameDraft};
        let drafts: Vec<FrameDraft> = ["A", "A", "B"]
            .iter()
            .map(|t| FrameDraft { text: t.to_string(), reasoning: String::new() })
            .collect();
        let frames = dedup_frames(&drafts);
        assert_eq!(frames[0].count, 2);
        assert_eq!(frames[1].count, 1);

        let engine = engine_with(&[""], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();
        assert_eq!(outcome.active, vec![true, true]);
        assert!(outcome.relations.is_empty());
    }

    #[test]
    fn test_paraphrase_keeps_shorter_pending_frame() {
        // Frame 1's text is shorter than frame 0's: the classifier reply
        // maps prompt index 1 to frame 0 (candidate) and 2 to frame 1
        // (pending). Paraphrases(2,1) puts the pending frame first.
        let frames = vec![frame(0, "a much longer claim"), frame(1, "short")];
        let engine = engine_with(&["a: same claim\nb: Paraphrases(2,1)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![false, true]);
        assert_eq!(outcome.relations.len(), 1);
    }

    #[test]
    fn test_paraphrase_keeps_shorter_active_frame() {
        let frames = vec![frame(0, "short"), frame(1, "a much longer claim")];
        let engine = engine_with(&["a: same claim\nb: Paraphrases(2,1)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        // Pending frame's text is longer: it stays inactive, but the edge
        // is still recorded for the reducer.
        assert_eq!(outcome.active, vec![true, false]);
        assert_eq!(outcome.relations.len(), 1);
    }

    #[test]
    fn test_paraphrase_length_counts_characters_not_bytes() {
        // "ééé" is 3 characters but 6 bytes; it must beat the 4-character
        // (4-byte) active frame.
        let frames = vec![frame(0, "abcd"), frame(1, "ééé")];
        let engine = engine_with(&["b: Paraphrases(2,1)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![false, true]);
    }

    #[test]
    fn test_paraphrase_equal_length_keeps_active_side() {
        let frames = vec![frame(0, "claim"), frame(1, "maxim")];
        let engine = engine_with(&["b: Paraphrases(2,1)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![true, false]);
    }

    #[test]
    fn test_specializes_and_contradicts_keep_both() {
        let frames = vec![frame(0, "general"), frame(1, "specific"), frame(2, "counter")];
        let engine = engine_with(
            &[
                "a: narrower claim\nb: Specializes(2,1)",
                "a: incompatible\nb: Contradicts(3,1)",
            ],
            10,
        );
        let outcome = engine.run(&frames, &line_matrix(3)).unwrap();

        assert_eq!(outcome.active, vec![true, true, true]);
        assert_eq!(outcome.relations.len(), 2);
    }

    #[test]
    fn test_first_match_policy_paraphrase_outranks_contradicts() {
        // Both edges arrive in one response; paraphrases sorts first, acts,
        // and stops the walk, so the contradicts edge never activates the
        // pending frame.
        let frames = vec![frame(0, "tiny"), frame(1, "a very long pending claim")];
        let engine = engine_with(
            &["a: r1\nb: Contradicts(2,1)\na: r2\nb: Paraphrases(2,1)"],
            10,
        );
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![true, false]);
        // Both edges are still recorded, in production order.
        assert_eq!(outcome.relations.len(), 2);
        assert_eq!(outcome.relations[0].relation, RelationType::Contradicts);
        assert_eq!(outcome.relations[1].relation, RelationType::Paraphrases);
    }

    #[test]
    fn test_unknown_type_does_not_stop_the_walk() {
        // An unknown word sorts last but is also skipped without stopping
        // when encountered; the known edge after it still applies.
        let frames = vec![frame(0, "known"), frame(1, "pending")];
        let engine = engine_with(&["b: Implies(1,2)\nb: Contradicts(1,2)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        assert_eq!(outcome.active, vec![true, true]);
        assert_eq!(outcome.relations.len(), 2);
    }

    #[test]
    fn test_only_unknown_types_leave_mask_unchanged() {
        let frames = vec![frame(0, "known"), frame(1, "pending")];
        let engine = engine_with(&["b: Implies(1,2)"], 10);
        let outcome = engine.run(&frames, &line_matrix(2)).unwrap();

        // Edges were returned (non-empty), so the novel-frame path does not
        // fire either: the pending frame stays inactive.
        assert_eq!(outcome.active, vec![true, false]);
        assert_eq!(outcome.relations.len(), 1);
    }

    #[test]
    fn test_shortlist_excludes_inactive_and_respects_top_k() {
        // Frame 1 never activates (paraphrase of 0, longer text), so frame
        // 2's shortlist must contain only frame 0.
        let frames = vec![
            frame(0, "seed"),
            frame(1, "seed but longer"),
            frame(2, "third"),
        ];
        let mut chat = MockChatModel::default();
        chat.push_response("b: Paraphrases(2,1)");
        chat.push_response("");
        let engine = ClusterEngine::new(
            RelationClassifier::new(chat.clone(), Vec::new()),
            EngineConfig { top_k: 1 },
        );
        let outcome = engine.run(&frames, &line_matrix(3)).unwrap();

        assert_eq!(outcome.active, vec![true, false, true]);
        assert_eq!(chat.call_count(), 2);
    }

    #[test]
    fn test_pass_is_deterministic() {
        let frames = vec![frame(0, "one"), frame(1, "two"), frame(2, "three")];
        let script = ["b: Specializes(2,1)", "b: Contradicts(3,1)"];

        let run = |script: &[&str]| {
            let engine = engine_with(script, 10);
            engine.run(&frames, &line_matrix(3)).unwrap()
        };
        let a = run(&script);
        let b = run(&script);

        assert_eq!(a.active, b.active);
        assert_eq!(a.relations, b.relations);
    }

    #[test]
    fn test_empty_input() {
        let engine = engine_with(&[], 10);
        let outcome = engine.run(&[], &line_matrix(0)).unwrap();
        assert!(outcome.active.is_empty());
        assert!(outcome.relations.is_empty());
    }
}
