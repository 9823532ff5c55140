//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the frame-relation core and
//! infrastructure. Implementations live in other crates (framescope-llm).

use serde::{Deserialize, Serialize};

/// A single chat message exchanged with the language-model collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role ("system", "user", "assistant")
    pub role: String,

    /// Free-text message content
    pub content: String,
}

impl ChatMessage {
    /// Build a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Build an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Build a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Trait for the language-model collaborator
///
/// The core issues exactly one synchronous call per pending frame and waits
/// for it. Caching and retry policy belong to the implementation; the core
/// only requires eventual success and idempotence for identical messages.
pub trait ChatModel {
    /// Error type for chat operations
    type Error;

    /// Send an ordered message sequence and return the model's reply
    fn send(&self, messages: &[ChatMessage]) -> Result<ChatMessage, Self::Error>;
}

/// Trait for the embedding collaborator
///
/// Implementations must be order-preserving and deterministic for identical
/// input text so that distance matrices are reproducible across runs.
pub trait Embedder {
    /// Error type for embedding operations
    type Error;

    /// Encode texts into fixed-dimension vectors, one per input, in order
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error>;

    /// Dimension of the vectors produced by this embedder
    fn dimension(&self) -> usize;
}
