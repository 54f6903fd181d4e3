//! Provider Description Value Objects
//!
//! Immutable, process-lifetime descriptions of embedding backends. The
//! ordered list of descriptors defines the auto-mode fallback order; order
//! is configuration, never derived, so behavior is reproducible across
//! identical configurations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// What a provider can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Can embed a text string
    EncodeText,
    /// Can embed a raster image
    EncodeImage,
}

/// Value Object: Provider Descriptor
///
/// Immutable for the process lifetime once registered with the
/// orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderDescriptor {
    /// Provider name as referenced by configuration and `provider_used`
    pub name: String,
    /// Capability set
    pub capabilities: Vec<Capability>,
    /// Fallback rank; lower values are attempted first
    pub priority: u32,
    /// Model identifier used by the backend
    pub model: String,
    /// Per-attempt timeout for this backend
    pub timeout: Duration,
}

impl ProviderDescriptor {
    /// Whether the descriptor advertises a capability.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// How the caller selects a provider for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderMode {
    /// Try providers in configured priority order until one succeeds
    #[default]
    Auto,
    /// Use exactly the named provider; its failure fails the operation
    Manual(String),
}

impl FromStr for ProviderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("provider selector must not be empty"));
        }
        if name.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            Ok(Self::Manual(name.to_string()))
        }
    }
}
