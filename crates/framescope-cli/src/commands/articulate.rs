//! Articulate command: extract frames from source documents.

use crate::cli::ArticulateArgs;
use crate::config::resolve_model_config;
use crate::error::Result;
use crate::io::{read_jsonl, write_jsonl};
use framescope_domain::{ChatMessage, ChatModel};
use framescope_extractor::text::format_text;
use framescope_extractor::{dedup_frames, parse_frames, FrameDraft};
use framescope_llm::OpenAiChatModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// A source document; anything beyond `id` and `text` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Source-assigned identifier, carried through to the annotations output
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    /// Document body
    pub text: String,
}

#[derive(Debug, Serialize)]
struct RawFrame {
    text: String,
    reasoning: String,
}

impl From<&FrameDraft> for RawFrame {
    fn from(draft: &FrameDraft) -> Self {
        Self {
            text: draft.text.clone(),
            reasoning: draft.reasoning.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DocumentFrames {
    id: Option<serde_json::Value>,
    articulations: Vec<RawFrame>,
}

struct Articulation {
    drafts: Vec<FrameDraft>,
    annotations: Vec<DocumentFrames>,
    responses: Vec<ChatMessage>,
}

// One chat call per document; raw extractions accumulate across documents in
// input order, which fixes the ids the deduplicator will assign.
fn articulate_documents<C>(
    documents: &[Document],
    preamble: &[ChatMessage],
    model: &C,
) -> Result<Articulation>
where
    C: ChatModel,
    C::Error: fmt::Display + Into<crate::error::CliError>,
{
    let mut drafts: Vec<FrameDraft> = Vec::new();
    let mut annotations = Vec::new();
    let mut responses = Vec::new();

    for (number, document) in documents.iter().enumerate() {
        let text = format_text(&document.text);
        let mut messages = preamble.to_vec();
        messages.push(ChatMessage::user(text));

        let response = model.send(&messages).map_err(Into::into)?;
        let found = parse_frames(&response.content);
        if found.is_empty() {
            warn!("document {}: no frames extracted", number);
        } else {
            debug!("document {}: {} frames", number, found.len());
        }

        annotations.push(DocumentFrames {
            id: document.id.clone(),
            articulations: found.iter().map(RawFrame::from).collect(),
        });
        drafts.extend(found);
        responses.push(response);
    }

    Ok(Articulation {
        drafts,
        annotations,
        responses,
    })
}

/// Run the articulate stage end to end.
pub fn execute_articulate(args: ArticulateArgs) -> Result<()> {
    let documents: Vec<Document> = read_jsonl(&args.input)?;
    let preamble: Vec<ChatMessage> = read_jsonl(&args.prompt)?;
    info!("articulating {} documents", documents.len());

    let config = resolve_model_config(&args.model, &args.output_dir.join("openai-cache"))?;
    let model = OpenAiChatModel::new(config)?;

    let result = articulate_documents(&documents, &preamble, &model)?;
    let unique = dedup_frames(&result.drafts);

    let predictions = args.output_dir.join("predictions");
    let raw: Vec<RawFrame> = result.drafts.iter().map(RawFrame::from).collect();
    write_jsonl(&raw, &predictions.join("frames-full.jsonl"))?;
    write_jsonl(&unique, &predictions.join("frames-unique.jsonl"))?;
    write_jsonl(&result.annotations, &predictions.join("frame-annotations.jsonl"))?;
    write_jsonl(&result.responses, &predictions.join("responses.jsonl"))?;

    info!(
        "articulated {} documents: {} frames, {} unique",
        documents.len(),
        result.drafts.len(),
        unique.len()
    );
    Ok(())
}
