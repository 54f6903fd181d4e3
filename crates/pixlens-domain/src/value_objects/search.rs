//! Search-Related Value Objects
//!
//! Transient per-query results; never persisted.

use crate::value_objects::ImageRecord;
use serde::{Deserialize, Serialize};

/// How a result set was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Ranked by embedding similarity
    Embedding,
    /// Ranked by keyword overlap against stored metadata (degraded mode)
    Keyword,
}

/// Value Object: Ranked Search Result
///
/// ## Business Rules
///
/// - `score` is comparable across results of the same query, higher is
///   better; embedding scores are cosine similarity in `[-1, 1]`, keyword
///   scores are overlap ratios in `[0, 1]`
/// - `origin` makes degraded keyword results distinguishable from genuine
///   embedding-based results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The matched image
    pub record: ImageRecord,
    /// Similarity score, higher is better
    pub score: f32,
    /// Whether the score came from embeddings or keyword fallback
    pub origin: ResultOrigin,
}

/// Full response of one search operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOutcome {
    /// Ranked results, best first
    pub results: Vec<SearchResult>,
    /// Name of the provider that produced the query embedding, or
    /// `"fallback"` for degraded results
    pub provider_used: String,
    /// True when the results were produced without embedding similarity
    pub degraded: bool,
}
