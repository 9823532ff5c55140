//! Relation classifier adapter
//!
//! Wraps the chat-model collaborator behind the relation-classification
//! contract used by the clustering engine: one call per pending frame, a
//! fixed preamble of few-shot prompt messages, and best-effort parsing of
//! the reply into typed edges.

use crate::error::ExtractError;
use crate::relations::{build_relation_prompt, parse_relations};
use framescope_domain::{ChatMessage, ChatModel, FrameId, RelationEdge};
use std::fmt;
use tracing::debug;

/// Classifier over a chat model plus a fixed prompt preamble
pub struct RelationClassifier<C: ChatModel> {
    chat: C,
    preamble: Vec<ChatMessage>,
}

impl<C: ChatModel> RelationClassifier<C>
where
    C::Error: fmt::Display,
{
    /// Create a classifier with the given few-shot preamble messages
    pub fn new(chat: C, preamble: Vec<ChatMessage>) -> Self {
        Self { chat, preamble }
    }

    /// Classify the pending frame against its candidate shortlist.
    ///
    /// Returns the parsed edges (possibly empty: parse failure and genuine
    /// novelty are indistinguishable by design) together with the raw reply
    /// for archival. Only a collaborator failure is an error.
    pub fn classify(
        &self,
        pending_id: FrameId,
        pending_text: &str,
        candidates: &[(FrameId, &str)],
    ) -> Result<(Vec<RelationEdge>, ChatMessage), ExtractError> {
        let prompt = build_relation_prompt(pending_id, pending_text, candidates);
        debug!(
            "classifying frame {} against {} candidates",
            pending_id,
            candidates.len()
        );

        let mut messages = self.preamble.clone();
        messages.push(ChatMessage::user(prompt.text));

        let response = self
            .chat
            .send(&messages)
            .map_err(|e| ExtractError::Llm(e.to_string()))?;

        let edges = parse_relations(&response.content, &prompt.index_map);
        Ok((edges, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framescope_domain::RelationType;
    use framescope_llm::MockChatModel;

    #[test]
    fn test_classify_maps_prompt_indices_to_frame_ids() {
        let mut chat = MockChatModel::default();
        chat.push_response("a: same claim\nb: Paraphrases(1,2)");
        let classifier = RelationClassifier::new(chat, Vec::new());

        let (edges, response) = classifier
            .classify(6, "the pending claim", &[(3, "a known claim")])
            .unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationType::Paraphrases);
        // Prompt index 1 is the candidate, 2 the pending frame.
        assert_eq!((edges[0].x, edges[0].y), (3, 6));
        assert_eq!(response.role, "assistant");
    }

    #[test]
    fn test_classify_preamble_precedes_prompt() {
        let chat = MockChatModel::new("");
        let preamble = vec![
            ChatMessage::system("relation tagging rules"),
            ChatMessage::user("example"),
            ChatMessage::assistant("b: Paraphrases(1,2)"),
        ];
        let classifier = RelationClassifier::new(chat, preamble);

        let (edges, _) = classifier.classify(1, "claim", &[(0, "known")]).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn test_classify_unparseable_reply_is_empty_not_error() {
        let chat = MockChatModel::new("I am not sure what you mean.");
        let classifier = RelationClassifier::new(chat, Vec::new());

        let (edges, _) = classifier.classify(1, "claim", &[(0, "known")]).unwrap();
        assert!(edges.is_empty());
    }
}
