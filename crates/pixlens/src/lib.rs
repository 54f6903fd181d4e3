//! # PixLens
//!
//! Text-to-image retrieval: images and free-text queries are embedded into
//! a shared vector space by interchangeable providers, image embeddings are
//! persisted in a durable flat index, and queries rank candidates by cosine
//! similarity. When every embedding provider is down, searches degrade to
//! keyword ranking over stored metadata instead of failing.
//!
//! ## Example
//!
//! ```ignore
//! use pixlens::{AppConfig, PixLens};
//!
//! let mut config = AppConfig::default();
//! config.index.path = "./data/index".into();
//!
//! let engine = PixLens::build(config, "./photos".as_ref()).await?;
//! let outcome = engine.search("a sunset over the ocean", None).await?;
//! for result in &outcome.results {
//!     println!("{}  {:.3}", result.record.id, result.score);
//! }
//! ```
//!
//! ## Architecture
//!
//! The workspace follows Clean Architecture layering:
//!
//! - `domain` - errors, value objects, and port traits
//! - `application` - provider orchestration and use-case services
//! - `providers` - embedding backends, the flat vector index, keyword
//!   fallback
//! - `infrastructure` - configuration, logging, and wiring

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use pixlens_application::orchestrator::{EmbeddingOrchestrator, ResolveOptions};
use pixlens_application::use_cases::{IndexingReport, IndexingService, SearchService};
use pixlens_domain::ports::VectorIndex;
use pixlens_infrastructure::factory::build_orchestrator;
use pixlens_providers::{FlatVectorIndex, KeywordScorer};

/// Domain layer - errors, value objects, and port traits
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use pixlens_domain::*;
}

/// Application layer - orchestration and use-case services
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use pixlens_application::*;
}

/// Provider implementations - embedding backends, index, fallback
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use pixlens_providers::*;
}

/// Infrastructure layer - configuration, logging, and wiring
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use pixlens_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use pixlens_domain::error::{Error, Result};
pub use pixlens_domain::value_objects::{
    ProviderMode, ResultOrigin, SearchOutcome, SearchResult,
};
pub use pixlens_infrastructure::config::{AppConfig, ConfigLoader};
pub use pixlens_infrastructure::logging::init_logging;

/// High-level retrieval engine over one indexed image collection.
///
/// Wires the configured providers, the flat index, and the keyword
/// fallback into a ready-to-use search surface.
pub struct PixLens {
    config: AppConfig,
    orchestrator: Arc<EmbeddingOrchestrator>,
    index: Arc<FlatVectorIndex>,
    search: SearchService,
}

impl std::fmt::Debug for PixLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixLens")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PixLens {
    /// Open a previously built index at `config.index.path`.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let index = Arc::new(FlatVectorIndex::load(&config.index.path).await?);
        Self::assemble(config, index)
    }

    /// Build an index from every supported image under `dir`, persist it
    /// at `config.index.path`, and return an engine ready to search it.
    pub async fn build(config: AppConfig, dir: &Path) -> Result<Self> {
        let index = Arc::new(FlatVectorIndex::new());
        let orchestrator = Arc::new(build_orchestrator(&config)?);

        let indexing = IndexingService::new(
            Arc::clone(&orchestrator),
            Arc::clone(&index) as Arc<dyn VectorIndex>,
        );
        let report = indexing
            .index_and_persist(dir, &config.index.path, &resolve_options(&config))
            .await?;
        info!(
            indexed = report.files_indexed,
            skipped = report.files_skipped,
            errors = report.errors.len(),
            "index built"
        );

        Self::assemble_with(config, index, orchestrator)
    }

    fn assemble(config: AppConfig, index: Arc<FlatVectorIndex>) -> Result<Self> {
        let orchestrator = Arc::new(build_orchestrator(&config)?);
        Self::assemble_with(config, index, orchestrator)
    }

    fn assemble_with(
        config: AppConfig,
        index: Arc<FlatVectorIndex>,
        orchestrator: Arc<EmbeddingOrchestrator>,
    ) -> Result<Self> {
        let search = SearchService::new(
            Arc::clone(&orchestrator),
            Arc::clone(&index) as Arc<dyn VectorIndex>,
            Arc::new(KeywordScorer::new()),
        );
        Ok(Self {
            config,
            orchestrator,
            index,
            search,
        })
    }

    /// Search the index; `top_k` defaults to `search.default_top_k`.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<SearchOutcome> {
        let top_k = top_k.unwrap_or(self.config.search.default_top_k);
        self.search
            .search(query, top_k, &resolve_options(&self.config))
            .await
    }

    /// Search with explicit resolution options (manual provider selection,
    /// custom deadline, cancellation).
    pub async fn search_with(
        &self,
        query: &str,
        top_k: usize,
        options: &ResolveOptions,
    ) -> Result<SearchOutcome> {
        self.search.search(query, top_k, options).await
    }

    /// Re-index `dir` from scratch and persist the result. The running
    /// engine keeps serving its current snapshot; reopen to pick up the
    /// rebuilt artifact.
    pub async fn rebuild(&self, dir: &Path) -> Result<IndexingReport> {
        let fresh = Arc::new(FlatVectorIndex::new());
        let indexing = IndexingService::new(
            Arc::clone(&self.orchestrator),
            Arc::clone(&fresh) as Arc<dyn VectorIndex>,
        );
        indexing
            .index_and_persist(dir, &self.config.index.path, &resolve_options(&self.config))
            .await
    }

    /// Number of indexed images.
    pub async fn len(&self) -> usize {
        self.index.len().await
    }

    /// Whether the index holds no images.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn resolve_options(config: &AppConfig) -> ResolveOptions {
    let mut options = ResolveOptions::default();
    if let Some(deadline_ms) = config.search.deadline_ms {
        options = options.with_deadline(Duration::from_millis(deadline_ms));
    }
    options
}
