//! Relate command: cluster unique frames and classify relations.

use crate::cli::{EmbedderArg, RelateArgs};
use crate::config::resolve_model_config;
use crate::error::Result;
use crate::io::{read_jsonl, write_jsonl};
use framescope_domain::{ChatMessage, Embedder, Frame, RelationEdge};
use framescope_engine::{ClusterEngine, DistanceMatrix, EngineConfig};
use framescope_extractor::text::format_reasoning;
use framescope_extractor::RelationClassifier;
use framescope_llm::{HashEmbedder, OpenAiChatModel, OpenAiEmbedder};
use std::collections::HashMap;
use tracing::info;

// Reasoning lines come back verbose; trim them before they hit disk.
fn clean_edges(relations: Vec<RelationEdge>) -> Vec<RelationEdge> {
    relations
        .into_iter()
        .map(|mut edge| {
            edge.reasoning = format_reasoning(&edge.reasoning);
            edge
        })
        .collect()
}

// Per-type edge counts, most frequent first, ties alphabetical.
fn count_by_type(relations: &[RelationEdge]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for edge in relations {
        *counts.entry(edge.relation.as_str().to_string()).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Run the relate stage end to end.
///
/// Frame ids are positions in the input file; any recorded ids are
/// overwritten so the distance matrix, the classifier prompts, and the
/// output edges all index the same order.
pub fn execute_relate(args: RelateArgs) -> Result<()> {
    let mut frames: Vec<Frame> = read_jsonl(&args.frames)?;
    for (position, frame) in frames.iter_mut().enumerate() {
        frame.id = position;
    }
    let preamble: Vec<ChatMessage> = read_jsonl(&args.prompt)?;
    info!("relating {} unique frames", frames.len());

    let config = resolve_model_config(&args.model, &args.output_dir.join("openai-cache"))?;

    let texts: Vec<String> = frames.iter().map(|f| f.text.clone()).collect();
    let embeddings = match args.embedder {
        EmbedderArg::Hash => HashEmbedder::new(args.embed_dim).encode(&texts)?,
        EmbedderArg::Openai => {
            OpenAiEmbedder::new(config.clone(), &args.embed_model, args.embed_dim)?
                .encode(&texts)?
        }
    };
    let distances = DistanceMatrix::from_embeddings(&embeddings)?;

    let chat = OpenAiChatModel::new(config)?;
    let classifier = RelationClassifier::new(chat, preamble);
    let engine = ClusterEngine::new(classifier, EngineConfig { top_k: args.top_k });
    let outcome = engine.run(&frames, &distances)?;

    let active = outcome.active.iter().filter(|a| **a).count();
    let relations = clean_edges(outcome.relations);
    for (word, count) in count_by_type(&relations) {
        info!("{}: {}", word, count);
    }
    info!("{} of {} frames active after clustering", active, frames.len());

    let predictions = args.output_dir.join("predictions");
    write_jsonl(&relations, &predictions.join("relations.jsonl"))?;
    write_jsonl(&outcome.responses, &predictions.join("responses.jsonl"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framescope_domain::RelationType;

    fn edge(relation: RelationType, reasoning: &str) -> RelationEdge {
        RelationEdge::new(relation, 0, 1, reasoning)
    }

    #[test]
    fn test_clean_edges_trims_reasoning() {
        let edges = vec![edge(
            RelationType::Paraphrases,
            "This is a paraphrase between framing 1 and framing 2, as both say the same",
        )];
        let cleaned = clean_edges(edges);
        assert_eq!(
            cleaned[0].reasoning,
            "This is a paraphrase, as both say the same"
        );
    }

    #[test]
    fn test_count_by_type_orders_descending() {
        let edges = vec![
            edge(RelationType::Specializes, ""),
            edge(RelationType::Specializes, ""),
            edge(RelationType::Paraphrases, ""),
            edge(RelationType::Contradicts, ""),
        ];
        let counts = count_by_type(&edges);
        assert_eq!(counts[0], ("specializes".to_string(), 2));
        // Ties fall back to alphabetical order.
        assert_eq!(counts[1], ("contradicts".to_string(), 1));
        assert_eq!(counts[2], ("paraphrases".to_string(), 1));
    }
}
