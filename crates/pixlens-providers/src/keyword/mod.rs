//! Keyword fallback ranking
//!
//! Metadata-based ranking used when no embedding provider can produce a
//! query vector. Not a semantic search: a deterministic, weighted token
//! overlap against stored tags, descriptions, and file names.

pub mod scorer;

pub use scorer::{KeywordParams, KeywordScorer};
