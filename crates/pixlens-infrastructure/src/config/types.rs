//! Configuration types
//!
//! Every field has a default so a bare process starts with no config file
//! at all; credentials then come from the conventional environment
//! variables (`NVIDIA_API_KEY`, `OPENAI_API_KEY`, `GEMINI_API_KEY`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default per-attempt timeout for remote providers, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 20;

/// Default number of results per search.
pub const DEFAULT_TOP_K: usize = 6;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Embedding backends and their auto-mode order
    pub providers: ProvidersConfig,
    /// Vector index location
    pub index: IndexConfig,
    /// Search behavior
    pub search: SearchConfig,
    /// Logging behavior
    pub logging: LoggingConfig,
}

/// Embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Auto-mode fallback order; position in this list is the priority
    pub order: Vec<String>,
    /// NVIDIA NIM (text and image)
    pub nvclip: RemoteProviderConfig,
    /// OpenAI embeddings (text only)
    pub openai: RemoteProviderConfig,
    /// Google Gemini embeddings (text only)
    pub gemini: RemoteProviderConfig,
    /// Local ONNX inference (text only, feature-gated)
    pub local: LocalProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: vec![
                "nvclip".to_string(),
                "openai".to_string(),
                "gemini".to_string(),
            ],
            nvclip: RemoteProviderConfig::with_model("nvidia/nvclip"),
            openai: RemoteProviderConfig::with_model("text-embedding-3-small"),
            gemini: RemoteProviderConfig::with_model("text-embedding-004"),
            local: LocalProviderConfig::default(),
        }
    }
}

/// One remote embedding backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteProviderConfig {
    /// Whether the backend may be used at all
    pub enabled: bool,
    /// API key; falls back to the backend's conventional environment
    /// variable when absent
    pub api_key: Option<String>,
    /// Custom endpoint; the hosted API when absent
    pub base_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteProviderConfig {
    fn with_model(model: &str) -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            model: model.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl Default for RemoteProviderConfig {
    fn default() -> Self {
        Self::with_model("")
    }
}

/// Local embedding backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LocalProviderConfig {
    /// Whether local inference may be used (requires the
    /// `embedding-fastembed` build feature)
    pub enabled: bool,
}

/// Vector index location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the persisted index
    pub path: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/index"),
        }
    }
}

/// Search behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned when the caller does not say how many
    pub default_top_k: usize,
    /// Global deadline over one whole resolution chain, in milliseconds;
    /// absent means per-provider timeouts only
    pub deadline_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            deadline_ms: None,
        }
    }
}

/// Logging behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON instead of human-readable lines
    pub json_format: bool,
    /// Optional log file; rotated daily
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
