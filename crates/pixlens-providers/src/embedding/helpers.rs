//! Common helpers for embedding providers
//!
//! Shared functionality and patterns used across multiple embedding
//! provider implementations to reduce code duplication.

use std::borrow::Cow;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pixlens_domain::error::{Error, Result};
use pixlens_domain::value_objects::ImageData;

use crate::constants::{ERROR_MSG_REQUEST_TIMEOUT, MAX_INPUT_CHARS};

/// Common constructor patterns used by embedding providers
pub mod constructor {
    use std::time::Duration;

    /// Validate and normalize an API key
    pub fn validate_api_key(api_key: &str) -> String {
        api_key.trim().to_string()
    }

    /// Validate and normalize an optional base URL
    pub fn validate_url(url: Option<String>) -> Option<String> {
        url.map(|u| u.trim().trim_end_matches('/').to_string())
    }

    /// Default timeout when not specified
    pub fn default_timeout() -> Duration {
        Duration::from_secs(20)
    }

    /// Get effective URL with fallback to default
    pub fn get_effective_url(provided_url: Option<&str>, default_url: &str) -> String {
        provided_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_url.to_string())
    }
}

/// Default timeout for embedding API requests
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(20);

/// Validate query/input text and truncate it to the provider limit.
///
/// Empty (after trimming) text is `InvalidInput`; overlong text is cut at
/// a char boundary rather than rejected.
pub fn prepare_text(text: &str) -> Result<Cow<'_, str>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("text to embed must not be empty"));
    }
    match trimmed.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => Ok(Cow::Owned(trimmed[..cut].to_string())),
        None => Ok(Cow::Borrowed(trimmed)),
    }
}

/// Convert raster bytes into a `data:` URL for embedding APIs that accept
/// inline images.
///
/// The bytes are decoded first; payloads that do not parse as a supported
/// raster format are `InvalidInput`, not a provider failure.
pub fn image_to_data_url(image: &ImageData) -> Result<String> {
    let format = image::guess_format(image.bytes())
        .map_err(|_| Error::invalid_input("unrecognized image format"))?;
    image::load_from_memory(image.bytes())
        .map_err(|e| Error::invalid_input(format!("cannot decode image: {e}")))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        BASE64.encode(image.bytes())
    ))
}

/// Map a reqwest transport error onto the domain taxonomy for a named
/// provider.
pub fn map_request_error(provider: &str, timeout: Duration, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(provider, format!("{ERROR_MSG_REQUEST_TIMEOUT} {timeout:?}"))
    } else {
        Error::unavailable(provider, format!("HTTP request failed: {err}"))
    }
}
