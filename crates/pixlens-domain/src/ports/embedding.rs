//! Embedding Provider Port
//!
//! The capability of producing a fixed-dimension vector from an image or a
//! text string. Each backend implements this independently; callers are
//! polymorphic over the capability, never over the concrete variant.

use crate::error::{Error, Result};
use crate::value_objects::{Capability, Embedding, ImageData};
use async_trait::async_trait;

/// Embedding backend capability.
///
/// For a given provider and model configuration, `encode_text` and
/// `encode_image` return vectors in the same fixed-dimension space.
///
/// # Errors
///
/// - `Unavailable` when the backend cannot be reached or credentials are
///   missing or invalid
/// - `Timeout` when the backend does not respond within its deadline
/// - `InvalidInput` when the input cannot be encoded (corrupt image,
///   empty text)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text string.
    async fn encode_text(&self, text: &str) -> Result<Embedding>;

    /// Embed a raster image.
    ///
    /// Text-only backends keep the default implementation, which reports
    /// the missing capability as `Unavailable`.
    async fn encode_image(&self, image: &ImageData) -> Result<Embedding> {
        let _ = image;
        Err(Error::unavailable(
            self.provider_name(),
            "image encoding is not supported by this provider",
        ))
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Stable identifier of this backend (e.g. "nvclip", "openai").
    fn provider_name(&self) -> &str;

    /// Capability set of this backend.
    fn capabilities(&self) -> &[Capability];

    /// Whether this backend advertises a capability.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Health check (default implementation probes text encoding).
    async fn health_check(&self) -> Result<()> {
        self.encode_text("health check").await?;
        Ok(())
    }
}
