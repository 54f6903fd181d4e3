//! Keyword Fallback Ranking Port
//!
//! Used by the retrieval engine when no embedding can be produced at all:
//! a best-effort ranked list derived from stored metadata instead of a
//! user-visible failure.

use crate::value_objects::{ImageRecord, SearchResult};

/// Deterministic metadata-based ranking.
///
/// For identical records and query the output must be identical; ties
/// break by record order.
pub trait FallbackRanker: Send + Sync {
    /// Rank `records` against `query`, returning at most `top_k` results
    /// flagged with a non-embedding origin.
    fn rank(&self, records: &[ImageRecord], query: &str, top_k: usize) -> Vec<SearchResult>;
}
