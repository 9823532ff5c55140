//! Error types for the clustering engine

use thiserror::Error;

/// Errors that can occur while building distances or running the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Embedding vectors disagree on dimension
    #[error("Dimension mismatch: vector {index} has {got} components, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending vector
        index: usize,
        /// Its dimension
        got: usize,
        /// Dimension of the first vector
        expected: usize,
    },

    /// Embedding count does not match frame count
    #[error("Expected {expected} embeddings, got {got}")]
    EmbeddingCount {
        /// Number of frames
        expected: usize,
        /// Number of vectors supplied
        got: usize,
    },

    /// Relation classifier failed
    #[error("Classifier error: {0}")]
    Classifier(String),
}
