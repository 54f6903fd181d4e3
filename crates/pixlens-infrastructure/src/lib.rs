//! # PixLens Infrastructure
//!
//! Cross-cutting technical concerns that support the application and
//! domain layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`logging`] | Structured logging with tracing |
//! | [`factory`] | Builds the embedding orchestrator from configuration |

pub mod config;
pub mod factory;
pub mod logging;

pub use config::{AppConfig, ConfigLoader};
pub use factory::build_orchestrator;
pub use logging::init_logging;
