//! Deterministic hash-based embeddings
//!
//! Stands in for a real sentence-embedding model during tests and offline
//! runs. Vectors are derived from hashing the text with per-component seeds,
//! then normalized to unit length, so identical texts always land at distance
//! zero and distinct texts spread out over the sphere.

use crate::LlmError;
use framescope_domain::Embedder;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash-based deterministic embedder
///
/// # Examples
///
/// ```
/// use framescope_llm::HashEmbedder;
/// use framescope_domain::Embedder;
///
/// let embedder = HashEmbedder::new(64);
/// let texts = vec!["The sky is blue".to_string()];
/// let vectors = embedder.encode(&texts).unwrap();
/// assert_eq!(vectors[0].len(), 64);
///
/// // Same text always produces the same vector
/// assert_eq!(vectors, embedder.encode(&texts).unwrap());
/// ```
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn component(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let value = hasher.finish();

        // Map the hash into [-1, 1]
        ((value as f64 / u64::MAX as f64) * 2.0 - 1.0) as f32
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if text.is_empty() {
            return Err(LlmError::Other("Empty text cannot be embedded".to_string()));
        }

        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|seed| Self::component(text, seed as u64))
            .collect();

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

impl Embedder for HashEmbedder {
    type Error = LlmError;

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeddings_are_deterministic() {
        let embedder = HashEmbedder::new(32);
        let texts = vec!["claim one".to_string(), "claim two".to_string()];
        assert_eq!(
            embedder.encode(&texts).unwrap(),
            embedder.encode(&texts).unwrap()
        );
    }

    #[test]
    fn test_different_texts_differ() {
        let embedder = HashEmbedder::new(32);
        let vectors = embedder
            .encode(&["alpha".to_string(), "beta".to_string()])
            .unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let embedder = HashEmbedder::new(128);
        let vectors = embedder.encode(&["some claim".to_string()]).unwrap();
        let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_rejected() {
        let embedder = HashEmbedder::new(8);
        assert!(embedder.encode(&[String::new()]).is_err());
    }
}
