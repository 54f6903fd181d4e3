//! OpenAI Embedding Provider
//!
//! Implements the `EmbeddingProvider` port using OpenAI's embedding API.
//! Text-only: OpenAI's embedding models have no image input, so this
//! backend serves query-side encoding against an index built in the same
//! space.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{Capability, Embedding};

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OPENAI_ADA, EMBEDDING_DIMENSION_OPENAI_LARGE,
    EMBEDDING_DIMENSION_OPENAI_SMALL,
};
use crate::embedding::helpers::{constructor, map_request_error, prepare_text};
use crate::utils::HttpResponseUtils;

const CAPABILITIES: &[Capability] = &[Capability::EncodeText];

/// OpenAI embedding provider
///
/// ## Example
///
/// ```rust,no_run
/// use pixlens_providers::embedding::OpenAiEmbeddingProvider;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// let provider = OpenAiEmbeddingProvider::new(
///     "sk-your-api-key".to_string(),
///     None,
///     "text-embedding-3-small".to_string(),
///     Duration::from_secs(20),
///     Client::new(),
/// );
/// ```
pub struct OpenAiEmbeddingProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiEmbeddingProvider {
    /// Create a new OpenAI embedding provider
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `base_url` - Optional custom base URL (defaults to the OpenAI API)
    /// * `model` - Model name (e.g. "text-embedding-3-small")
    /// * `timeout` - Request timeout duration
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        let api_key = constructor::validate_api_key(&api_key);
        let base_url = constructor::validate_url(base_url);

        Self {
            api_key,
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    /// Get the base URL for this provider
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch_embedding(&self, text: &str) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "input": text,
            "model": self.model,
            "encoding_format": "float"
        });

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url()))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_request_error(self.provider_name(), self.timeout, e))?;

        HttpResponseUtils::check_and_parse(response, self.provider_name()).await
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn encode_text(&self, text: &str) -> Result<Embedding> {
        let text = prepare_text(text)?;
        let response_data = self.fetch_embedding(&text).await?;

        let vector = response_data["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| {
                Error::unavailable(
                    self.provider_name(),
                    "invalid response format: missing embedding array",
                )
            })?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect::<Vec<f32>>();

        Ok(Embedding::new(vector, self.model.clone()))
    }

    fn dimensions(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-small" => EMBEDDING_DIMENSION_OPENAI_SMALL,
            "text-embedding-3-large" => EMBEDDING_DIMENSION_OPENAI_LARGE,
            "text-embedding-ada-002" => EMBEDDING_DIMENSION_OPENAI_ADA,
            _ => EMBEDDING_DIMENSION_OPENAI_SMALL,
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }
}
