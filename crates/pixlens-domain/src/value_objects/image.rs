//! Image Identity and Payload Value Objects
//!
//! [`ImageRecord`] is what the vector index owns per entry: a stable
//! identifier plus enough metadata to serve a search hit without touching
//! the original image source. [`ImageData`] is the transient raster payload
//! handed to an embedding provider at build time.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Upper bound on raster payloads accepted by embedding providers.
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Where an indexed image originally came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Local filesystem path
    Path(PathBuf),
    /// Remote URL
    Url(String),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Value Object: Indexed Image Record
///
/// ## Business Rules
///
/// - `id` is the stable key; two records with the same id refer to the same
///   image
/// - metadata (`filename`, `description`, `tags`) must be sufficient for
///   keyword fallback ranking without re-reading the image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    /// Stable identifier of the image
    pub id: String,
    /// Source reference (file path or URL)
    pub source: ImageSource,
    /// Original file name
    pub filename: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Descriptive tags
    pub tags: Vec<String>,
}

impl ImageRecord {
    /// Create a record with no description or tags.
    pub fn new<I: Into<String>, F: Into<String>>(id: I, source: ImageSource, filename: F) -> Self {
        Self {
            id: id.into(),
            source,
            filename: filename.into(),
            description: None,
            tags: Vec::new(),
        }
    }

    /// Attach tags, builder style.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Attach a description, builder style.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Raw raster bytes for an embedding provider.
///
/// Construction enforces the size bound; whether the bytes actually decode
/// as an image is checked by the provider that consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap raster bytes, rejecting empty or oversized payloads.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_input("image payload is empty"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::invalid_input(format!(
                "image payload of {} bytes exceeds the {} byte limit",
                bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }
        Ok(Self { bytes })
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty payloads are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            ImageData::new(Vec::new()),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            ImageData::new(bytes),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn record_builder_attaches_metadata() {
        let record = ImageRecord::new(
            "animals/cat.jpg",
            ImageSource::Path(PathBuf::from("/data/animals/cat.jpg")),
            "cat.jpg",
        )
        .with_tags(vec!["animals".to_string()])
        .with_description("orange tabby cat");
        assert_eq!(record.tags, vec!["animals"]);
        assert_eq!(record.description.as_deref(), Some("orange tabby cat"));
    }
}
