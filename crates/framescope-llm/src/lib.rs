//! Framescope LLM Provider Layer
//!
//! Implementations of the `ChatModel` and `Embedder` traits from
//! `framescope-domain`.
//!
//! # Providers
//!
//! - `MockChatModel`: deterministic scripted chat model for testing
//! - `OpenAiChatModel`: OpenAI-compatible chat endpoint with on-disk response
//!   caching, rate-limit delays, and retries
//! - `HashEmbedder`: deterministic hash-based embeddings for tests and
//!   offline runs
//! - `OpenAiEmbedder`: OpenAI-compatible embeddings endpoint
//!
//! # Examples
//!
//! ```
//! use framescope_llm::MockChatModel;
//! use framescope_domain::{ChatMessage, ChatModel};
//!
//! let model = MockChatModel::new("a: same claim\nb: Paraphrases(1,2)");
//! let reply = model.send(&[ChatMessage::user("prompt")]).unwrap();
//! assert_eq!(reply.role, "assistant");
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod openai;

use framescope_domain::{ChatMessage, ChatModel};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use embedding::HashEmbedder;
pub use openai::{OpenAiChatModel, OpenAiConfig, OpenAiEmbedder};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response cache I/O error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Failed to build the provider runtime
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock chat model for deterministic testing
///
/// Replies are served from a scripted queue first, then from per-prompt
/// responses keyed by the last message's content, then from a default
/// response. No network calls are made.
///
/// # Examples
///
/// ```
/// use framescope_llm::MockChatModel;
/// use framescope_domain::{ChatMessage, ChatModel};
///
/// let mut model = MockChatModel::new("default");
/// model.push_response("first");
/// model.push_response("second");
///
/// let msgs = [ChatMessage::user("anything")];
/// assert_eq!(model.send(&msgs).unwrap().content, "first");
/// assert_eq!(model.send(&msgs).unwrap().content, "second");
/// assert_eq!(model.send(&msgs).unwrap().content, "default");
/// ```
#[derive(Debug, Clone)]
pub struct MockChatModel {
    default_response: String,
    queue: Arc<Mutex<VecDeque<String>>>,
    by_prompt: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatModel {
    /// Create a mock with a fixed default response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            by_prompt: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a scripted response, served in FIFO order before anything else
    pub fn push_response(&mut self, response: impl Into<String>) {
        self.queue.lock().unwrap().push_back(response.into());
    }

    /// Add a response for a specific prompt (matched against the last
    /// message's content)
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.by_prompt
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Number of times `send` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new("")
    }
}

impl ChatModel for MockChatModel {
    type Error = LlmError;

    fn send(&self, messages: &[ChatMessage]) -> Result<ChatMessage, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(scripted) = self.queue.lock().unwrap().pop_front() {
            return Ok(ChatMessage::assistant(scripted));
        }

        if let Some(last) = messages.last() {
            let by_prompt = self.by_prompt.lock().unwrap();
            if let Some(response) = by_prompt.get(&last.content) {
                return Ok(ChatMessage::assistant(response.clone()));
            }
        }

        Ok(ChatMessage::assistant(self.default_response.clone()))
    }
}
