//! OpenAI-compatible provider implementation
//!
//! Talks to any endpoint exposing the `/chat/completions` and `/embeddings`
//! routes. Responses are cached on disk keyed by request content so identical
//! requests are idempotent across runs, which the clustering engine relies on
//! for reproducibility. A fixed delay after each successful request keeps the
//! request rate under provider limits.

use crate::LlmError;
use framescope_domain::{ChatMessage, ChatModel, Embedder};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Default public OpenAI endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default post-request rate-limit delay in seconds
pub const DEFAULT_DELAY_SECS: u64 = 6;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the OpenAI-compatible providers
///
/// Passed explicitly into constructors; there is no ambient global state for
/// credentials or endpoints. Fields omitted during deserialization take
/// their defaults, so a config file can set just the fields it cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Endpoint base URL (e.g. "https://api.openai.com/v1")
    pub base_url: String,

    /// Chat model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum completion tokens
    pub max_tokens: u32,

    /// Seconds to sleep after each successful request
    pub delay_secs: u64,

    /// Maximum retry attempts per request
    pub max_retries: u32,

    /// Directory for the on-disk response cache; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.0,
            max_tokens: 512,
            delay_secs: DEFAULT_DELAY_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_dir: None,
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// OpenAI-compatible chat model provider
pub struct OpenAiChatModel {
    config: OpenAiConfig,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl OpenAiChatModel {
    /// Create a new provider from an explicit configuration
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if let Some(dir) = &config.cache_dir {
            std::fs::create_dir_all(dir).map_err(|e| LlmError::Cache(e.to_string()))?;
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(e.to_string()))?;
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;

        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    fn cache_file(&self, messages: &[ChatMessage]) -> Result<Option<PathBuf>, LlmError> {
        let Some(dir) = &self.config.cache_dir else {
            return Ok(None);
        };
        let serialized = serde_json::to_string(messages)
            .map_err(|e| LlmError::Cache(e.to_string()))?;
        // DefaultHasher::new() uses fixed keys, so cache names are stable
        // across runs.
        let mut hasher = DefaultHasher::new();
        serialized.hash(&mut hasher);
        self.config.model.hash(&mut hasher);
        Ok(Some(dir.join(format!("{:016x}.json", hasher.finish()))))
    }

    /// Send messages to the chat endpoint
    pub async fn send_async(&self, messages: &[ChatMessage]) -> Result<ChatMessage, LlmError> {
        let cache_file = self.cache_file(messages)?;
        if let Some(path) = &cache_file {
            if path.exists() {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| LlmError::Cache(e.to_string()))?;
                let cached: ChatMessage = serde_json::from_str(&raw)
                    .map_err(|e| LlmError::Cache(e.to_string()))?;
                debug!("chat cache hit: {}", path.display());
                return Ok(cached);
            }
        }

        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut attempts = 0;
        let reply = loop {
            let error = match self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    let body: ChatCompletionResponse = response
                        .json()
                        .await
                        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                    let choice = body.choices.into_iter().next().ok_or_else(|| {
                        LlmError::InvalidResponse("Response carried no choices".to_string())
                    })?;
                    break choice.message;
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    warn!("chat request failed with HTTP {}", status);
                    LlmError::Communication(format!("HTTP {}: {}", status, text))
                }
                Err(e) => {
                    warn!("chat request failed: {}", e);
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            };

            attempts += 1;
            if attempts >= self.config.max_retries {
                return Err(error);
            }
            // Back off harder after each failure; rate-limit errors dominate.
            let backoff = (self.config.delay_secs * 5).max(30) * u64::from(attempts);
            tokio::time::sleep(Duration::from_secs(backoff)).await;
        };

        // Rate-limit successful requests; cache hits skip this path entirely.
        tokio::time::sleep(Duration::from_secs(self.config.delay_secs)).await;

        if let Some(path) = &cache_file {
            let raw = serde_json::to_string(&reply)
                .map_err(|e| LlmError::Cache(e.to_string()))?;
            std::fs::write(path, raw).map_err(|e| LlmError::Cache(e.to_string()))?;
        }

        Ok(reply)
    }
}

impl ChatModel for OpenAiChatModel {
    type Error = LlmError;

    fn send(&self, messages: &[ChatMessage]) -> Result<ChatMessage, Self::Error> {
        // Blocking wrapper around the async implementation; the pipeline core
        // is synchronous and single-threaded.
        self.runtime.block_on(self.send_async(messages))
    }
}

/// OpenAI-compatible embeddings provider
pub struct OpenAiEmbedder {
    config: OpenAiConfig,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl OpenAiEmbedder {
    /// Create a new embedder against the configured endpoint
    ///
    /// `model` is the embedding model name (e.g. "text-embedding-3-small")
    /// and `dimension` the vector width it produces.
    pub fn new(
        config: OpenAiConfig,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(e.to_string()))?;
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;

        Ok(Self {
            config,
            model: model.into(),
            dimension,
            client,
            runtime,
        })
    }

    /// Encode a batch of texts
    pub async fn encode_async(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let url = format!("{}/embeddings", self.config.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, text)));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if body.data.len() != texts.len() {
            return Err(LlmError::InvalidResponse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        // The API may return entries out of order; restore input order.
        let mut data = body.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    type Error = LlmError;

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error> {
        self.runtime.block_on(self.encode_async(texts))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
