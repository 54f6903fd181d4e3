//! Gemini Embedding Provider
//!
//! Implements the `EmbeddingProvider` port using Google's Gemini embedding
//! API. Text-only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{Capability, Embedding};

use crate::constants::{CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_GEMINI};
use crate::embedding::helpers::{constructor, map_request_error, prepare_text};
use crate::utils::HttpResponseUtils;

const CAPABILITIES: &[Capability] = &[Capability::EncodeText];

/// Gemini embedding provider
///
/// ## Example
///
/// ```rust,no_run
/// use pixlens_providers::embedding::GeminiEmbeddingProvider;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// let provider = GeminiEmbeddingProvider::new(
///     "AIza-your-api-key".to_string(),
///     None,
///     "text-embedding-004".to_string(),
///     Duration::from_secs(20),
///     Client::new(),
/// );
/// ```
pub struct GeminiEmbeddingProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl GeminiEmbeddingProvider {
    /// Create a new Gemini embedding provider
    ///
    /// # Arguments
    /// * `api_key` - Google AI API key
    /// * `base_url` - Optional custom base URL (defaults to the Google AI API)
    /// * `model` - Model name (e.g. "text-embedding-004")
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

    /// Get the effective base URL
    fn effective_base_url(&self) -> String {
        constructor::get_effective_url(
            self.base_url.as_deref(),
            "https://generativelanguage.googleapis.com",
        )
    }

    /// Get the model name for API calls (strip the "models/" prefix if present)
    pub fn api_model_name(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch_embedding(&self, text: &str) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "content": { "parts": [{ "text": text }] }
        });

        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.effective_base_url(),
            self.api_model_name()
        );

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_request_error(self.provider_name(), self.timeout, e))?;

        HttpResponseUtils::check_and_parse(response, self.provider_name()).await
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn encode_text(&self, text: &str) -> Result<Embedding> {
        let text = prepare_text(text)?;
        let response_data = self.fetch_embedding(&text).await?;

        let vector = response_data["embedding"]["values"]
            .as_array()
            .ok_or_else(|| {
                Error::unavailable(
                    self.provider_name(),
                    "invalid response format: missing embedding values",
                )
            })?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect::<Vec<f32>>();

        Ok(Embedding::new(vector, self.model.clone()))
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSION_GEMINI
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }
}
