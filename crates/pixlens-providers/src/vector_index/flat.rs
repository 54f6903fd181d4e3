//! Flat vector index with exact cosine search
//!
//! Stores unit-normalized vectors in insertion order behind a read-write
//! lock: many concurrent readers, single writer during builds. Persistence
//! writes a staging directory (JSON manifest + little-endian f32 blob) and
//! swaps it into place so readers of a previous artifact never observe a
//! partial write.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::VectorIndex;
use pixlens_domain::value_objects::{Embedding, ImageRecord};

use crate::constants::{
    INDEX_BYTES_PER_DIMENSION, INDEX_FORMAT_VERSION, INDEX_MANIFEST_FILE, INDEX_VECTORS_FILE,
};

/// Manifest stored next to the vector blob.
///
/// Carries everything needed to reconstruct records without re-accessing
/// the original image sources, plus the dimensionality and embedding-space
/// identifier so incompatible queries are rejected instead of silently
/// mis-ranked.
#[derive(Debug, Serialize, Deserialize)]
struct IndexManifest {
    format_version: u32,
    dimensions: usize,
    space: String,
    count: usize,
    checksum: u64,
    created_at: DateTime<Utc>,
    records: Vec<ImageRecord>,
}

#[derive(Debug, Default)]
struct IndexState {
    dimensions: Option<usize>,
    space: Option<String>,
    /// Unit-normalized vectors, in insertion order, parallel to records
    vectors: Vec<Vec<f32>>,
    records: Vec<ImageRecord>,
}

/// Candidate during top-k selection.
///
/// Ordered so a max-heap's peek is the worst candidate: lowest score, and
/// among equal scores the latest-inserted entry. That makes eviction keep
/// earlier insertions on ties, which is the documented tie-break.
struct ScoredItem {
    score: f32,
    index: usize,
}

impl PartialEq for ScoredItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredItem {}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Exact-search vector index over unit-normalized embeddings.
///
/// Cosine similarity reduces to a dot product because both the stored and
/// the query vectors are normalized to unit length.
#[derive(Debug)]
pub struct FlatVectorIndex {
    inner: RwLock<IndexState>,
}

impl FlatVectorIndex {
    /// Create an empty index; the first insertion establishes its
    /// dimensionality and embedding space.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexState::default()),
        }
    }

    /// Open a previously persisted index read-only.
    ///
    /// Fails with `CorruptIndex` when the stored structure is unreadable
    /// or its metadata is missing or inconsistent.
    pub async fn load(path: &Path) -> Result<Self> {
        let manifest_path = path.join(INDEX_MANIFEST_FILE);
        let vectors_path = path.join(INDEX_VECTORS_FILE);

        let manifest_bytes = tokio::fs::read(&manifest_path).await.map_err(|e| {
            Error::corrupt_index(format!(
                "cannot read manifest {}: {e}",
                manifest_path.display()
            ))
        })?;
        let manifest: IndexManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| Error::corrupt_index(format!("manifest does not parse: {e}")))?;

        if manifest.format_version != INDEX_FORMAT_VERSION {
            return Err(Error::corrupt_index(format!(
                "unsupported format version {} (expected {})",
                manifest.format_version, INDEX_FORMAT_VERSION
            )));
        }
        if manifest.dimensions == 0 {
            return Err(Error::corrupt_index("manifest is missing dimensionality"));
        }
        if manifest.space.is_empty() {
            return Err(Error::corrupt_index(
                "manifest is missing the embedding-space identifier",
            ));
        }
        if manifest.records.len() != manifest.count {
            return Err(Error::corrupt_index(format!(
                "manifest lists {} records but declares a count of {}",
                manifest.records.len(),
                manifest.count
            )));
        }

        let blob = tokio::fs::read(&vectors_path).await.map_err(|e| {
            Error::corrupt_index(format!(
                "cannot read vector blob {}: {e}",
                vectors_path.display()
            ))
        })?;

        let expected_len = manifest.count * manifest.dimensions * INDEX_BYTES_PER_DIMENSION;
        if blob.len() != expected_len {
            return Err(Error::corrupt_index(format!(
                "vector blob is {} bytes, expected {expected_len}",
                blob.len()
            )));
        }
        if seahash::hash(&blob) != manifest.checksum {
            return Err(Error::corrupt_index("vector blob checksum mismatch"));
        }

        let stride = manifest.dimensions * INDEX_BYTES_PER_DIMENSION;
        let vectors = blob
            .chunks_exact(stride)
            .map(|chunk| {
                chunk
                    .chunks_exact(INDEX_BYTES_PER_DIMENSION)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect::<Vec<f32>>()
            })
            .collect::<Vec<_>>();

        info!(
            path = %path.display(),
            entries = manifest.count,
            dimensions = manifest.dimensions,
            space = %manifest.space,
            "loaded vector index"
        );

        Ok(Self {
            inner: RwLock::new(IndexState {
                dimensions: Some(manifest.dimensions),
                space: Some(manifest.space),
                vectors,
                records: manifest.records,
            }),
        })
    }

    fn normalize_query(vector: &[f32]) -> Result<Vec<f32>> {
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid_input(
                "query vector contains non-finite values",
            ));
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm <= 0.0 {
            return Err(Error::invalid_input("query vector must not be zero"));
        }
        Ok(vector.iter().map(|v| v / norm).collect())
    }
}

impl Default for FlatVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for FlatVectorIndex {
    async fn insert(&self, record: ImageRecord, embedding: Embedding) -> Result<()> {
        if embedding.vector.is_empty() {
            return Err(Error::invalid_input("embedding vector must not be empty"));
        }
        if !embedding.is_finite() {
            return Err(Error::invalid_input(
                "embedding vector contains non-finite values",
            ));
        }

        let mut state = self.inner.write().await;

        // Validate before any mutation so a failed insert leaves the
        // index unchanged.
        if let Some(expected) = state.dimensions {
            if embedding.vector.len() != expected {
                return Err(Error::dimension_mismatch(expected, embedding.vector.len()));
            }
        }
        if let Some(space) = &state.space {
            if *space != embedding.model {
                return Err(Error::invalid_input(format!(
                    "embedding space mismatch: index holds '{space}', got '{}'",
                    embedding.model
                )));
            }
        }

        if state.dimensions.is_none() {
            state.dimensions = Some(embedding.vector.len());
            state.space = Some(embedding.model.clone());
        }

        let normalized = embedding.l2_normalized();
        debug!(id = %record.id, "indexed image");
        state.vectors.push(normalized.vector);
        state.records.push(record);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<(ImageRecord, f32)>> {
        let state = self.inner.read().await;

        if state.records.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = state.dimensions {
            if vector.len() != expected {
                return Err(Error::dimension_mismatch(expected, vector.len()));
            }
        }

        let query = Self::normalize_query(vector)?;

        let limit = top_k.min(state.records.len());
        let mut heap: BinaryHeap<ScoredItem> = BinaryHeap::with_capacity(limit + 1);

        for (i, stored) in state.vectors.iter().enumerate() {
            let score = stored.iter().zip(&query).map(|(a, b)| a * b).sum::<f32>();

            if heap.len() < limit {
                heap.push(ScoredItem { score, index: i });
            } else if let Some(worst) = heap.peek() {
                // Strict comparison: an equal score never evicts an
                // earlier insertion.
                if score > worst.score {
                    heap.pop();
                    heap.push(ScoredItem { score, index: i });
                }
            }
        }

        let mut items = heap.into_vec();
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        Ok(items
            .into_iter()
            .map(|item| (state.records[item.index].clone(), item.score))
            .collect())
    }

    async fn persist(&self, path: &Path) -> Result<()> {
        let state = self.inner.read().await;

        let (Some(dimensions), Some(space)) = (state.dimensions, state.space.clone()) else {
            return Err(Error::invalid_input(
                "cannot persist an index with no entries",
            ));
        };

        let mut blob =
            Vec::with_capacity(state.vectors.len() * dimensions * INDEX_BYTES_PER_DIMENSION);
        for vector in &state.vectors {
            for value in vector {
                blob.extend_from_slice(&value.to_le_bytes());
            }
        }

        let manifest = IndexManifest {
            format_version: INDEX_FORMAT_VERSION,
            dimensions,
            space,
            count: state.records.len(),
            checksum: seahash::hash(&blob),
            created_at: Utc::now(),
            records: state.records.clone(),
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;

        // Stage into a sibling directory, then swap. Readers holding the
        // previous artifact keep a consistent view.
        let staging = staging_path(path);
        if tokio::fs::metadata(&staging).await.is_ok() {
            tokio::fs::remove_dir_all(&staging).await?;
        }
        tokio::fs::create_dir_all(&staging).await?;
        tokio::fs::write(staging.join(INDEX_VECTORS_FILE), &blob).await?;
        tokio::fs::write(staging.join(INDEX_MANIFEST_FILE), &manifest_bytes).await?;

        // Retire the previous artifact aside before moving the staged one
        // in, so the target path never goes through a state with nothing
        // at it.
        let retired = retired_path(path);
        if tokio::fs::metadata(&retired).await.is_ok() {
            tokio::fs::remove_dir_all(&retired).await?;
        }
        let had_previous = tokio::fs::metadata(path).await.is_ok();
        if had_previous {
            tokio::fs::rename(path, &retired).await?;
        }
        tokio::fs::rename(&staging, path).await?;
        if had_previous {
            tokio::fs::remove_dir_all(&retired).await?;
        }

        info!(
            path = %path.display(),
            entries = manifest.count,
            dimensions,
            "persisted vector index"
        );
        Ok(())
    }

    async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    async fn dimensions(&self) -> Option<usize> {
        self.inner.read().await.dimensions
    }

    async fn space(&self) -> Option<String> {
        self.inner.read().await.space.clone()
    }

    async fn records(&self) -> Vec<ImageRecord> {
        self.inner.read().await.records.clone()
    }
}

fn staging_path(path: &Path) -> PathBuf {
    sibling_path(path, "staging")
}

fn retired_path(path: &Path) -> PathBuf {
    sibling_path(path, "old")
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    path.with_file_name(format!(".{name}.{suffix}"))
}
