//! Null embedding provider for testing and development
//!
//! Provides deterministic, hash-based embeddings for testing purposes.
//! No external dependencies - always works offline.

use async_trait::async_trait;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{Capability, Embedding, ImageData};

use crate::constants::EMBEDDING_DIMENSION_NULL;

const CAPABILITIES: &[Capability] = &[Capability::EncodeText, Capability::EncodeImage];

/// Null embedding provider for testing
///
/// Returns fixed-size vectors filled with deterministic values based on an
/// input hash, for both text and images. Useful for unit tests and
/// development without requiring an actual embedding service.
///
/// # Example
///
/// ```rust
/// use pixlens_providers::embedding::NullEmbeddingProvider;
/// use pixlens_domain::ports::EmbeddingProvider;
///
/// let provider = NullEmbeddingProvider::new();
/// assert_eq!(provider.dimensions(), 384);
/// assert_eq!(provider.provider_name(), "null");
/// ```
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    /// Create a new null embedding provider
    pub fn new() -> Self {
        Self
    }

    /// Get the model name for this provider
    pub fn model(&self) -> &str {
        "null-test"
    }

    fn embedding_from_hash(&self, hash: u64) -> Embedding {
        let base_value = (hash % 1000) as f32 / 1000.0; // 0.0 to 1.0

        let vector = (0..EMBEDDING_DIMENSION_NULL)
            .map(|j| {
                let variation = (j as f32 * 0.01).sin();
                (base_value + variation * 0.1).clamp(0.0, 1.0)
            })
            .collect();

        Embedding::new(vector, self.model())
    }
}

impl Default for NullEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn encode_text(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(Error::invalid_input("text to embed must not be empty"));
        }
        let hash = text.chars().map(|c| c as u64).sum::<u64>();
        Ok(self.embedding_from_hash(hash))
    }

    async fn encode_image(&self, image: &ImageData) -> Result<Embedding> {
        let hash = image.bytes().iter().map(|b| u64::from(*b)).sum::<u64>();
        Ok(self.embedding_from_hash(hash))
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSION_NULL
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_yields_identical_vectors() {
        let provider = NullEmbeddingProvider::new();
        let a = provider.encode_text("a cat on a sofa").await.unwrap();
        let b = provider.encode_text("a cat on a sofa").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dimensions, EMBEDDING_DIMENSION_NULL);
    }

    #[tokio::test]
    async fn images_are_embedded_deterministically() {
        let provider = NullEmbeddingProvider::new();
        let image = ImageData::new(vec![9, 9, 9]).unwrap();
        let a = provider.encode_image(&image).await.unwrap();
        let b = provider.encode_image(&image).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let provider = NullEmbeddingProvider::new();
        assert!(matches!(
            provider.encode_text("").await,
            Err(Error::InvalidInput { .. })
        ));
    }
}
