//! Index Building Service
//!
//! Walks a directory of images, embeds each one through the orchestrator,
//! and inserts it into the vector index. Discovery order is sorted by file
//! name so identical directories always produce identical indexes (tie
//! breaking at query time depends on insertion order).
//!
//! Per-file problems (unreadable file, oversized payload) are recorded and
//! skipped; losing every embedding provider aborts the build, since the
//! remaining files could never be embedded either.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use walkdir::WalkDir;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::VectorIndex;
use pixlens_domain::value_objects::{ImageData, ImageRecord, ImageSource};

use crate::orchestrator::{EmbeddingOrchestrator, ResolveOptions};

/// Raster formats accepted during directory discovery.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["bmp", "gif", "jpeg", "jpg", "png", "tiff", "webp"];

/// Outcome of one build run.
#[derive(Debug, Default, Clone)]
pub struct IndexingReport {
    /// Images embedded and inserted
    pub files_indexed: usize,
    /// Entries without a supported raster extension
    pub files_skipped: usize,
    /// Per-file failures, in discovery order
    pub errors: Vec<(PathBuf, String)>,
}

impl IndexingReport {
    fn record_error(&mut self, path: &Path, err: &Error) {
        warn!(path = %path.display(), error = %err, "skipping file");
        self.errors.push((path.to_path_buf(), err.to_string()));
    }
}

/// Builds a vector index from a directory of images.
pub struct IndexingService {
    orchestrator: Arc<EmbeddingOrchestrator>,
    index: Arc<dyn VectorIndex>,
}

impl IndexingService {
    /// Compose an indexing service from its ports.
    pub fn new(orchestrator: Arc<EmbeddingOrchestrator>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            orchestrator,
            index,
        }
    }

    /// Embed and insert every supported image under `dir`.
    pub async fn index_directory(
        &self,
        dir: &Path,
        options: &ResolveOptions,
    ) -> Result<IndexingReport> {
        if !dir.is_dir() {
            return Err(Error::invalid_input(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }

        let mut report = IndexingReport::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::io(format!("cannot walk directory {}: {e}", dir.display()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !has_supported_extension(path) {
                report.files_skipped += 1;
                continue;
            }

            match self.index_file(dir, path, options).await {
                Ok(()) => report.files_indexed += 1,
                // Losing every provider dooms the rest of the build too.
                Err(err @ Error::AllProvidersFailed { .. }) => return Err(err),
                Err(err @ Error::DimensionMismatch { .. }) => return Err(err),
                Err(err) => report.record_error(path, &err),
            }
        }

        info!(
            indexed = report.files_indexed,
            skipped = report.files_skipped,
            errors = report.errors.len(),
            dir = %dir.display(),
            "directory indexed"
        );
        Ok(report)
    }

    /// Build from `dir` and persist the index at `out`.
    pub async fn index_and_persist(
        &self,
        dir: &Path,
        out: &Path,
        options: &ResolveOptions,
    ) -> Result<IndexingReport> {
        let report = self.index_directory(dir, options).await?;
        if self.index.is_empty().await {
            return Err(Error::invalid_input(format!(
                "no images could be indexed under '{}'",
                dir.display()
            )));
        }
        self.index.persist(out).await?;
        Ok(report)
    }

    async fn index_file(&self, root: &Path, path: &Path, options: &ResolveOptions) -> Result<()> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::io(format!("cannot read image {}: {e}", path.display()))
        })?;
        let image = ImageData::new(bytes)?;

        let resolved = self.orchestrator.resolve_image(&image, options).await?;

        let record = build_record(root, path);
        self.index.insert(record, resolved.embedding).await
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Record identity and metadata derived from the file's location: the id
/// is the root-relative path, tags are the intermediate directory names.
fn build_record(root: &Path, path: &Path) -> ImageRecord {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let id = relative.to_string_lossy().replace('\\', "/");
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());
    let tags: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    ImageRecord::new(id, ImageSource::Path(path.to_path_buf()), filename).with_tags(tags)
}
