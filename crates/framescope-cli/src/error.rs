//! Error types for the CLI

use thiserror::Error;

/// Errors surfaced at the command level
#[derive(Error, Debug)]
pub enum CliError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// LLM provider error
    #[error(transparent)]
    Llm(#[from] framescope_llm::LlmError),

    /// Clustering engine error
    #[error(transparent)]
    Engine(#[from] framescope_engine::EngineError),

    /// Graph reduction or ordering error
    #[error(transparent)]
    Graph(#[from] framescope_graph::GraphError),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the CLI
pub type Result<T> = std::result::Result<T, CliError>;
