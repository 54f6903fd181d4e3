//! Configuration
//!
//! Typed configuration for the whole system, loaded by [`ConfigLoader`]
//! from defaults, an optional TOML file, and `PIXLENS_`-prefixed
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, IndexConfig, LocalProviderConfig, LoggingConfig, ProvidersConfig,
    RemoteProviderConfig, SearchConfig,
};
