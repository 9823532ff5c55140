//! Pairwise embedding distance matrix

use crate::error::EngineError;

/// Dense pairwise squared Euclidean distances between embedding vectors
///
/// Computed once up front and read-only during clustering. Stored flat,
/// row-major, indexed by FrameId pairs.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f32>,
}

impl DistanceMatrix {
    /// Compute the matrix from one embedding vector per frame
    pub fn from_embeddings(embeddings: &[Vec<f32>]) -> Result<Self, EngineError> {
        let n = embeddings.len();
        let dim = embeddings.first().map(Vec::len).unwrap_or(0);
        for (index, vector) in embeddings.iter().enumerate() {
            if vector.len() != dim {
                return Err(EngineError::DimensionMismatch {
                    index,
                    got: vector.len(),
                    expected: dim,
                });
            }
        }

        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d: f32 = embeddings[i]
                    .iter()
                    .zip(&embeddings[j])
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { n, data })
    }

    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix is empty
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Squared distance between frames `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let embeddings = vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![1.0, 1.0],
        ];
        let matrix = DistanceMatrix::from_embeddings(&embeddings).unwrap();

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        // Squared Euclidean: 3^2 + 4^2
        assert_eq!(matrix.get(0, 1), 25.0);
        assert_eq!(matrix.get(0, 2), 2.0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let embeddings = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            DistanceMatrix::from_embeddings(&embeddings),
            Err(EngineError::DimensionMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let matrix = DistanceMatrix::from_embeddings(&[]).unwrap();
        assert!(matrix.is_empty());
    }
}
