//! Error types for the extraction layer

use thiserror::Error;

/// Errors that can occur while extracting frames or classifying relations
///
/// Parse failures are deliberately NOT errors: a malformed response yields an
/// empty (or partial) result instead, so the caller cannot distinguish parse
/// failure from genuine novelty. Only collaborator failures surface here.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Chat model collaborator failed
    #[error("LLM error: {0}")]
    Llm(String),
}
