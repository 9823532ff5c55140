//! Relation prompt construction and reply parsing
//!
//! The classifier is prompted with a numbered shortlist of known frames
//! followed by the pending frame, and replies with `a:` reasoning lines and
//! `b:` relation calls of the form `TypeName(i,j)` where `i`/`j` are 1-based
//! indices into that numbering.

use crate::text::format_prompt;
use framescope_domain::{FrameId, RelationEdge, RelationType};
use std::collections::BTreeMap;

/// A built classifier prompt plus the index map needed to parse its reply
#[derive(Debug, Clone)]
pub struct RelationPrompt {
    /// Prompt text listing the numbered shortlist and the pending frame
    pub text: String,

    /// Prompt number -> FrameId, including the pending frame's final number
    pub index_map: BTreeMap<usize, FrameId>,
}

/// Build the numbered relation prompt for a pending frame and its candidate
/// shortlist. Candidates are listed first (1-based), the pending frame last.
pub fn build_relation_prompt(
    pending_id: FrameId,
    pending_text: &str,
    candidates: &[(FrameId, &str)],
) -> RelationPrompt {
    let mut lines = vec!["Similar known framings:".to_string()];
    let mut index_map = BTreeMap::new();
    let mut number = 1;

    for (id, text) in candidates {
        lines.push(format!("{}: {}", number, format_prompt(text)));
        index_map.insert(number, *id);
        number += 1;
    }

    lines.push("New framing:".to_string());
    index_map.insert(number, pending_id);
    lines.push(format!("{}: {}", number, format_prompt(pending_text)));

    RelationPrompt {
        text: format_prompt(&lines.join("\n")),
        index_map,
    }
}

/// Parse a classifier reply into relation edges.
///
/// `a:` lines carry reasoning for the `b:` relation calls that follow. The
/// first malformed `b` line (bad call shape, non-integer index, or an index
/// missing from the map) stops parsing; edges from earlier lines are kept.
/// Unknown relation words parse into `RelationType::Other` rather than
/// failing.
pub fn parse_relations(
    content: &str,
    index_map: &BTreeMap<usize, FrameId>,
) -> Vec<RelationEdge> {
    let mut relations = Vec::new();
    let mut reasoning: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tag = line.split(':').next().unwrap_or(line);
        let rest = line
            .get(tag.len() + 1..)
            .map(str::trim)
            .unwrap_or_default();

        match tag {
            "a" => reasoning = Some(rest.to_string()),
            "b" => {
                let Some((x, y, relation)) = parse_call(rest, index_map) else {
                    return relations;
                };
                relations.push(RelationEdge {
                    relation,
                    x,
                    y,
                    reasoning: reasoning.clone().unwrap_or_default(),
                });
            }
            _ => {}
        }
    }

    relations
}

// Parse "TypeName(i,j)" against the prompt numbering.
fn parse_call(
    call: &str,
    index_map: &BTreeMap<usize, FrameId>,
) -> Option<(FrameId, FrameId, RelationType)> {
    let mut parts = call.split('(');
    let word = parts.next()?;
    let args = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    // Drop the trailing ")" (the last char, whatever it is).
    let (last, _) = args.char_indices().last()?;
    let args = &args[..last];

    let mut pair = args.split(',');
    let (Some(i), Some(j), None) = (pair.next(), pair.next(), pair.next()) else {
        return None;
    };
    let i: usize = i.trim().parse().ok()?;
    let j: usize = j.trim().parse().ok()?;

    let x = *index_map.get(&i)?;
    let y = *index_map.get(&j)?;
    Some((x, y, RelationType::from_word(&word.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(usize, FrameId)]) -> BTreeMap<usize, FrameId> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_prompt_numbers_candidates_then_pending() {
        let prompt = build_relation_prompt(7, "the new claim", &[(2, "first"), (5, "second")]);
        assert_eq!(
            prompt.text,
            "Similar known framings:\n1: first\n2: second\nNew framing:\n3: the new claim"
        );
        assert_eq!(prompt.index_map, map(&[(1, 2), (2, 5), (3, 7)]));
    }

    #[test]
    fn test_prompt_with_empty_shortlist() {
        let prompt = build_relation_prompt(4, "only claim", &[]);
        assert_eq!(prompt.text, "Similar known framings:\nNew framing:\n1: only claim");
        assert_eq!(prompt.index_map, map(&[(1, 4)]));
    }

    #[test]
    fn test_parse_single_relation() {
        let content = "a: both state the same thing\nb: Paraphrases(1,2)";
        let edges = parse_relations(content, &map(&[(1, 3), (2, 9)]));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationType::Paraphrases);
        assert_eq!((edges[0].x, edges[0].y), (3, 9));
        assert_eq!(edges[0].reasoning, "both state the same thing");
    }

    #[test]
    fn test_parse_multiple_relations_share_reasoning_lines() {
        let content = "a: first reason\nb: Specializes(2,1)\na: second reason\nb: Contradicts(2,1)";
        let edges = parse_relations(content, &map(&[(1, 0), (2, 1)]));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].relation, RelationType::Specializes);
        assert_eq!(edges[0].reasoning, "first reason");
        assert_eq!(edges[1].relation, RelationType::Contradicts);
        assert_eq!(edges[1].reasoning, "second reason");
    }

    #[test]
    fn test_parse_unknown_relation_word_is_kept() {
        let edges = parse_relations("b: Implies(1,2)", &map(&[(1, 0), (2, 1)]));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationType::Other("implies".to_string()));
    }

    #[test]
    fn test_parse_failure_keeps_earlier_edges() {
        let content = "b: Paraphrases(1,2)\nb: Contradicts(9,1)\nb: Specializes(1,2)";
        // Index 9 is not in the map; parsing stops there.
        let edges = parse_relations(content, &map(&[(1, 0), (2, 1)]));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationType::Paraphrases);
    }

    #[test]
    fn test_parse_bad_call_shape_stops() {
        let edges = parse_relations("b: Paraphrases 1,2", &map(&[(1, 0), (2, 1)]));
        assert!(edges.is_empty());

        let edges = parse_relations("b: Paraphrases(1)", &map(&[(1, 0)]));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_parse_ignores_other_tags_and_blanks() {
        let content = "\nnote: preamble chatter\na: reason\nb: Contradicts(1,2)\n";
        let edges = parse_relations(content, &map(&[(1, 0), (2, 1)]));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_parse_relation_without_reasoning_line() {
        let edges = parse_relations("b: Paraphrases(1,2)", &map(&[(1, 0), (2, 1)]));
        assert_eq!(edges[0].reasoning, "");
    }
}
