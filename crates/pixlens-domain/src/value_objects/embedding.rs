//! Semantic Embedding Value Objects
//!
//! Vectors produced by embedding providers. Vectors are only comparable
//! within one embedding space; the `model` field identifies that space.

use serde::{Deserialize, Serialize};

/// Value Object: Embedding Vector
///
/// A fixed-dimension vector representation of an image or text in a shared
/// similarity space.
///
/// ## Business Rules
///
/// - `dimensions` always equals `vector.len()`
/// - `model` identifies the embedding space; vectors from different spaces
///   must never be compared
/// - Similarity is cosine over unit-normalized vectors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Identifier of the model that generated this embedding; doubles as
    /// the embedding-space identifier
    pub model: String,
    /// Dimensionality of the embedding vector
    pub dimensions: usize,
}

impl Embedding {
    /// Create an embedding from a raw vector, deriving `dimensions`.
    pub fn new<S: Into<String>>(vector: Vec<f32>, model: S) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            model: model.into(),
            dimensions,
        }
    }

    /// Euclidean norm of the vector.
    pub fn norm(&self) -> f32 {
        self.vector.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Return this embedding scaled to unit length.
    ///
    /// Zero vectors are returned unchanged; callers that require a
    /// meaningful direction must reject them separately.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.vector {
                *v /= norm;
            }
        }
        self
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.vector.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_dimensions() {
        let embedding = Embedding::new(vec![0.1, 0.2, 0.3], "nvidia/nvclip");
        assert_eq!(embedding.dimensions, 3);
        assert_eq!(embedding.model, "nvidia/nvclip");
    }

    #[test]
    fn normalization_produces_unit_vector() {
        let embedding = Embedding::new(vec![3.0, 4.0], "test").l2_normalized();
        assert!((embedding.norm() - 1.0).abs() < 1e-6);
        assert!((embedding.vector[0] - 0.6).abs() < 1e-6);
        assert!((embedding.vector[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_survives_normalization() {
        let embedding = Embedding::new(vec![0.0, 0.0], "test").l2_normalized();
        assert_eq!(embedding.vector, vec![0.0, 0.0]);
    }
}
