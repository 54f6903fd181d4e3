//! HTTP response handling shared by remote embedding providers
//!
//! Maps transport-level and HTTP-level failures onto the domain error
//! taxonomy so the orchestrator can treat them uniformly.

use pixlens_domain::error::{Error, Result};
use reqwest::Response;

/// Longest error body excerpt carried into an error message
const ERROR_BODY_EXCERPT: usize = 200;

fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(ERROR_BODY_EXCERPT)
        .map_or(body.len(), |(i, _)| i);
    &body[..end]
}

/// Common HTTP response utilities for embedding providers
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON.
    ///
    /// Every non-success status maps to `Unavailable` for the named
    /// provider; the orchestrator then moves on to the next backend.
    pub async fn check_and_parse(
        response: Response,
        provider_name: &str,
    ) -> Result<serde_json::Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let code = status.as_u16();

            return Err(match code {
                401 | 403 => Error::unavailable(
                    provider_name,
                    format!("authentication failed: {}", excerpt(&error_text)),
                ),
                429 => Error::unavailable(
                    provider_name,
                    format!("rate limit exceeded: {}", excerpt(&error_text)),
                ),
                500..=599 => Error::unavailable(
                    provider_name,
                    format!("server error ({code}): {}", excerpt(&error_text)),
                ),
                _ => Error::unavailable(
                    provider_name,
                    format!("request failed ({code}): {}", excerpt(&error_text)),
                ),
            });
        }

        response.json().await.map_err(|e| {
            Error::unavailable(provider_name, format!("invalid JSON response: {e}"))
        })
    }
}
