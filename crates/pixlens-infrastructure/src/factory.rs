//! Provider factory
//!
//! Builds the embedding orchestrator from configuration. Each name in
//! `providers.order` becomes one registered backend; its position is its
//! auto-mode priority. A backend without credentials is skipped with a
//! warning rather than failing startup, since the search path can degrade
//! to keyword ranking.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use pixlens_application::orchestrator::{EmbeddingOrchestrator, RegisteredProvider};
use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::ProviderDescriptor;
use pixlens_providers::embedding::{
    GeminiEmbeddingProvider, NullEmbeddingProvider, NvclipEmbeddingProvider,
    OpenAiEmbeddingProvider,
};

use crate::config::types::DEFAULT_PROVIDER_TIMEOUT_SECS;
use crate::config::{AppConfig, RemoteProviderConfig};

/// Environment variable consulted for the NVIDIA NIM API key.
pub const NVIDIA_API_KEY_ENV: &str = "NVIDIA_API_KEY";
/// Environment variable consulted for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable consulted for the Google AI API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Build the embedding orchestrator from configuration.
///
/// Fails only on configuration mistakes (an unknown provider name);
/// unusable backends are skipped. The result can be empty, in which case
/// every search degrades to keyword ranking.
pub fn build_orchestrator(config: &AppConfig) -> Result<EmbeddingOrchestrator> {
    let http_client = Client::new();
    let mut registered = Vec::new();

    for (position, name) in config.providers.order.iter().enumerate() {
        let priority = u32::try_from(position)
            .map_err(|_| Error::config("providers.order is implausibly long"))?;
        let built = match name.as_str() {
            "nvclip" => build_remote(
                name,
                &config.providers.nvclip,
                NVIDIA_API_KEY_ENV,
                &http_client,
                |key, cfg, timeout, client| {
                    Arc::new(NvclipEmbeddingProvider::new(
                        key,
                        cfg.base_url.clone(),
                        cfg.model.clone(),
                        timeout,
                        client,
                    ))
                },
            ),
            "openai" => build_remote(
                name,
                &config.providers.openai,
                OPENAI_API_KEY_ENV,
                &http_client,
                |key, cfg, timeout, client| {
                    Arc::new(OpenAiEmbeddingProvider::new(
                        key,
                        cfg.base_url.clone(),
                        cfg.model.clone(),
                        timeout,
                        client,
                    ))
                },
            ),
            "gemini" => build_remote(
                name,
                &config.providers.gemini,
                GEMINI_API_KEY_ENV,
                &http_client,
                |key, cfg, timeout, client| {
                    Arc::new(GeminiEmbeddingProvider::new(
                        key,
                        cfg.base_url.clone(),
                        cfg.model.clone(),
                        timeout,
                        client,
                    ))
                },
            ),
            "local" => build_local(config),
            "null" => {
                let provider = NullEmbeddingProvider::new();
                let model = provider.model().to_string();
                Some((Arc::new(provider) as Arc<dyn EmbeddingProvider>, model))
            }
            unknown => {
                return Err(Error::config(format!(
                    "unknown provider '{unknown}' in providers.order"
                )));
            }
        };

        if let Some((provider, model)) = built {
            let timeout = provider_timeout(config, name);
            registered.push(RegisteredProvider {
                descriptor: ProviderDescriptor {
                    name: name.clone(),
                    capabilities: provider.capabilities().to_vec(),
                    priority,
                    model,
                    timeout,
                },
                provider,
            });
        }
    }

    if registered.is_empty() {
        warn!("no embedding provider is usable; searches will degrade to keyword ranking");
    }

    Ok(EmbeddingOrchestrator::new(registered))
}

type BuiltProvider = (Arc<dyn EmbeddingProvider>, String);

fn build_remote<F>(
    name: &str,
    cfg: &RemoteProviderConfig,
    key_env: &str,
    http_client: &Client,
    construct: F,
) -> Option<BuiltProvider>
where
    F: FnOnce(String, &RemoteProviderConfig, Duration, Client) -> Arc<dyn EmbeddingProvider>,
{
    if !cfg.enabled {
        debug!(provider = name, "provider disabled by configuration");
        return None;
    }
    let Some(api_key) = resolve_api_key(cfg, key_env) else {
        warn!(
            provider = name,
            env = key_env,
            "no API key configured, skipping provider"
        );
        return None;
    };
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let provider = construct(api_key, cfg, timeout, http_client.clone());
    Some((provider, cfg.model.clone()))
}

fn resolve_api_key(cfg: &RemoteProviderConfig, key_env: &str) -> Option<String> {
    cfg.api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var(key_env).ok().filter(|key| !key.trim().is_empty()))
}

#[cfg(feature = "embedding-fastembed")]
fn build_local(config: &AppConfig) -> Option<BuiltProvider> {
    use pixlens_providers::embedding::LocalEmbeddingProvider;

    if !config.providers.local.enabled {
        debug!(provider = "local", "provider disabled by configuration");
        return None;
    }
    let provider = LocalEmbeddingProvider::new();
    let model = provider.model().to_string();
    Some((Arc::new(provider) as Arc<dyn EmbeddingProvider>, model))
}

#[cfg(not(feature = "embedding-fastembed"))]
fn build_local(config: &AppConfig) -> Option<BuiltProvider> {
    if config.providers.local.enabled {
        warn!(
            provider = "local",
            "built without the embedding-fastembed feature, skipping provider"
        );
    }
    None
}

fn provider_timeout(config: &AppConfig, name: &str) -> Duration {
    let secs = match name {
        "nvclip" => config.providers.nvclip.timeout_secs,
        "openai" => config.providers.openai.timeout_secs,
        "gemini" => config.providers.gemini.timeout_secs,
        _ => DEFAULT_PROVIDER_TIMEOUT_SECS,
    };
    Duration::from_secs(secs)
}
