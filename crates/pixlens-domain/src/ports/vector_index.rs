//! Vector Index Port
//!
//! A durable, queryable store of (record, embedding) pairs. Supports many
//! concurrent readers; building and persisting is a distinct single-writer
//! phase that never mutates an artifact readers may be using.

use crate::error::Result;
use crate::value_objects::{Embedding, ImageRecord};
use async_trait::async_trait;
use std::path::Path;

/// Durable, queryable store of embeddings.
///
/// # Example
///
/// ```ignore
/// index.insert(record, embedding).await?;
/// let hits = index.query(&query_vector, 10).await?;
/// index.persist(Path::new("./data/index")).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add one entry.
    ///
    /// The first insertion establishes the index's dimensionality and
    /// embedding space; later insertions that disagree fail with
    /// `DimensionMismatch` and leave the index unchanged.
    async fn insert(&self, record: ImageRecord, embedding: Embedding) -> Result<()>;

    /// Return up to `top_k` entries ranked by cosine similarity,
    /// descending. Ties break by insertion order of the tied entries.
    ///
    /// A `top_k` larger than the index returns all entries ranked; a query
    /// vector of the wrong length fails with `DimensionMismatch`.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<(ImageRecord, f32)>>;

    /// Finalize the index to durable storage at `path`.
    ///
    /// The artifact is staged and swapped into place, never mutated
    /// in-place, so concurrent readers of a previous artifact are safe.
    async fn persist(&self, path: &Path) -> Result<()>;

    /// Number of indexed entries.
    async fn len(&self) -> usize;

    /// Whether the index holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Established dimensionality, if any entry has been inserted.
    async fn dimensions(&self) -> Option<usize>;

    /// Established embedding-space identifier, if any entry has been
    /// inserted.
    async fn space(&self) -> Option<String>;

    /// All records in insertion order; input for keyword fallback ranking.
    async fn records(&self) -> Vec<ImageRecord>;
}
