//! # PixLens Domain
//!
//! Core types for text-to-image retrieval: the error taxonomy, the value
//! objects shared across layers, and the ports (traits) implemented by the
//! provider crate.
//!
//! ## Layers
//!
//! - [`error`] - the single error taxonomy used everywhere
//! - [`value_objects`] - embeddings, image records, search results
//! - [`ports`] - capability traits for embedding backends, vector indexes,
//!   and the keyword fallback ranker

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
