//! NVIDIA NIM Embedding Provider
//!
//! Implements the `EmbeddingProvider` port against NVIDIA NIM's
//! OpenAI-compatible embeddings endpoint. The nvclip family embeds images
//! and text into the same space, so this is the backend used to build
//! image indexes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{Capability, Embedding, ImageData};

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_NVCLIP, EMBEDDING_DIMENSION_NV_DINOV2,
};
use crate::embedding::helpers::{constructor, image_to_data_url, map_request_error, prepare_text};
use crate::utils::HttpResponseUtils;

const CAPABILITIES: &[Capability] = &[Capability::EncodeText, Capability::EncodeImage];

/// NVIDIA NIM embedding provider
///
/// ## Example
///
/// ```rust,no_run
/// use pixlens_providers::embedding::NvclipEmbeddingProvider;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// let provider = NvclipEmbeddingProvider::new(
///     "nvapi-your-api-key".to_string(),
///     None,
///     "nvidia/nvclip".to_string(),
///     Duration::from_secs(20),
///     Client::new(),
/// );
/// ```
pub struct NvclipEmbeddingProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl NvclipEmbeddingProvider {
    /// Create a new NVIDIA NIM embedding provider
    ///
    /// # Arguments
    /// * `api_key` - NVIDIA NIM API key
    /// * `base_url` - Optional custom base URL (defaults to the hosted NIM API)
    /// * `model` - Model name (e.g. "nvidia/nvclip")
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
            .unwrap_or("https://integrate.api.nvidia.com/v1")
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send an embedding request for pre-serialized inputs (plain text or
    /// `data:` URLs) and get the response body
    async fn fetch_embeddings(&self, inputs: &[String]) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "input": inputs,
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

    /// Extract the first embedding vector from a response body
    fn parse_first_embedding(&self, response_data: &serde_json::Value) -> Result<Embedding> {
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

        if vector.len() != self.dimensions() {
            return Err(Error::unavailable(
                self.provider_name(),
                format!(
                    "backend returned {} dimensions, expected {}",
                    vector.len(),
                    self.dimensions()
                ),
            ));
        }

        Ok(Embedding::new(vector, self.model.clone()))
    }

    async fn encode_one(&self, input: String) -> Result<Embedding> {
        let response_data = self.fetch_embeddings(std::slice::from_ref(&input)).await?;
        self.parse_first_embedding(&response_data)
    }
}

#[async_trait]
impl EmbeddingProvider for NvclipEmbeddingProvider {
    async fn encode_text(&self, text: &str) -> Result<Embedding> {
        let text = prepare_text(text)?;
        self.encode_one(text.into_owned()).await
    }

    async fn encode_image(&self, image: &ImageData) -> Result<Embedding> {
        let data_url = image_to_data_url(image)?;
        self.encode_one(data_url).await
    }

    fn dimensions(&self) -> usize {
        if self.model.contains("dinov2") {
            EMBEDDING_DIMENSION_NV_DINOV2
        } else {
            EMBEDDING_DIMENSION_NVCLIP
        }
    }

    fn provider_name(&self) -> &str {
        "nvclip"
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }
}
