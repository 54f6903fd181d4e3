//! Error handling types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// One provider's failure inside an auto-mode resolution attempt.
///
/// Collected in order of attempt so that an [`Error::AllProvidersFailed`]
/// report is reproducible for identical configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    /// Name of the provider that failed
    pub provider: String,
    /// Human-readable reason for the failure
    pub reason: String,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

fn format_failures(failures: &[ProviderFailure]) -> String {
    if failures.is_empty() {
        return "no providers were available".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for PixLens
#[derive(Error, Debug)]
pub enum Error {
    /// Bad caller data; surfaced to the caller, never retried
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },

    /// Backend cannot be reached or credentials are missing/invalid;
    /// triggers fallback to the next provider
    #[error("provider '{provider}' unavailable: {message}")]
    Unavailable {
        /// Name of the unavailable provider
        provider: String,
        /// Description of the unavailability
        message: String,
    },

    /// Backend did not respond within the configured deadline;
    /// triggers fallback to the next provider
    #[error("provider '{provider}' timed out: {message}")]
    Timeout {
        /// Name of the provider that timed out
        provider: String,
        /// Description of the timeout
        message: String,
    },

    /// Every configured provider failed; carries the ordered per-provider
    /// failure reasons
    #[error("all providers failed: {}", format_failures(.failures))]
    AllProvidersFailed {
        /// Per-provider failures in attempt order
        failures: Vec<ProviderFailure>,
    },

    /// A vector's length does not match the index's established
    /// dimensionality; fatal for the operation, never coerced
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality established by the index
        expected: usize,
        /// Dimensionality of the offending vector
        found: usize,
    },

    /// A persisted index is unreadable or missing its metadata
    #[error("corrupt index: {message}")]
    CorruptIndex {
        /// Description of the corruption
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an unavailable error for a named provider
    pub fn unavailable<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error for a named provider
    pub fn timeout<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Create a corrupt index error
    pub fn corrupt_index<S: Into<String>>(message: S) -> Self {
        Self::CorruptIndex {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this failure should move the orchestrator to the next
    /// provider instead of aborting the resolution.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::InvalidInput { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_providers_failed_lists_reasons_in_order() {
        let err = Error::AllProvidersFailed {
            failures: vec![
                ProviderFailure {
                    provider: "nvclip".to_string(),
                    reason: "connection refused".to_string(),
                },
                ProviderFailure {
                    provider: "openai".to_string(),
                    reason: "timed out".to_string(),
                },
            ],
        };
        let text = err.to_string();
        let nvclip = text.find("nvclip").expect("nvclip in message");
        let openai = text.find("openai").expect("openai in message");
        assert!(nvclip < openai);
    }

    #[test]
    fn provider_failures_trigger_fallback() {
        assert!(Error::unavailable("openai", "down").is_provider_failure());
        assert!(Error::timeout("openai", "slow").is_provider_failure());
        assert!(Error::invalid_input("empty text").is_provider_failure());
        assert!(!Error::dimension_mismatch(512, 768).is_provider_failure());
        assert!(!Error::corrupt_index("bad manifest").is_provider_failure());
    }
}
