//! Configuration loader
//!
//! Merges configuration sources with figment; later sources override
//! earlier ones: defaults, then an optional TOML file, then environment
//! variables.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use pixlens_domain::error::{Error, Result};

use crate::config::AppConfig;
use crate::logging::parse_log_level;

/// Environment variable prefix.
pub const CONFIG_ENV_PREFIX: &str = "PIXLENS";

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "pixlens.toml";

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if it exists)
    /// 3. Environment variables with prefix, nested keys separated by a
    ///    double underscore (e.g. `PIXLENS_SEARCH__DEFAULT_TOP_K`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                info!("Configuration loaded from {}", config_path.display());
            } else {
                warn!("Configuration file not found: {}", config_path.display());
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            info!("Configuration loaded from {}", default_path.display());
        }

        // Double underscore as the nesting separator so keys containing
        // single underscores (api_key, default_top_k) stay intact.
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("failed to extract configuration: {e}")))?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("failed to serialize config to TOML: {e}")))?;

        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| Error::io_with_source("failed to write config file", e))?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;
        let candidate = current_dir.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_providers_config(config)?;
    validate_search_config(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_providers_config(config: &AppConfig) -> Result<()> {
    if config.providers.order.is_empty() {
        return Err(Error::config("providers.order cannot be empty"));
    }
    for (i, name) in config.providers.order.iter().enumerate() {
        if config.providers.order[..i].contains(name) {
            return Err(Error::config(format!(
                "provider '{name}' appears more than once in providers.order"
            )));
        }
    }
    for (name, timeout_secs) in [
        ("nvclip", config.providers.nvclip.timeout_secs),
        ("openai", config.providers.openai.timeout_secs),
        ("gemini", config.providers.gemini.timeout_secs),
    ] {
        if timeout_secs == 0 {
            return Err(Error::config(format!(
                "providers.{name}.timeout_secs cannot be 0"
            )));
        }
    }
    Ok(())
}

fn validate_search_config(config: &AppConfig) -> Result<()> {
    if config.search.default_top_k == 0 {
        return Err(Error::config("search.default_top_k cannot be 0"));
    }
    if config.search.deadline_ms == Some(0) {
        return Err(Error::config("search.deadline_ms cannot be 0 when set"));
    }
    Ok(())
}
