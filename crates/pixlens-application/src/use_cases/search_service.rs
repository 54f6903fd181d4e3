//! Text-to-Image Search Service
//!
//! Resolves the query to an embedding through the orchestrator and ranks
//! index entries by cosine similarity. When every embedding provider is
//! down the service degrades to keyword ranking over stored metadata
//! instead of failing the search; degraded outcomes are always flagged.

use std::sync::Arc;

use tracing::{debug, warn};

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::{FallbackRanker, VectorIndex};
use pixlens_domain::value_objects::{ResultOrigin, SearchOutcome, SearchResult};

use crate::orchestrator::{EmbeddingOrchestrator, ResolveOptions};

/// Provider name reported for degraded keyword outcomes.
pub const FALLBACK_PROVIDER_NAME: &str = "fallback";

/// Longest accepted query, in characters.
const MAX_QUERY_CHARS: usize = 8192;

/// Free-text search over an indexed image collection.
pub struct SearchService {
    orchestrator: Arc<EmbeddingOrchestrator>,
    index: Arc<dyn VectorIndex>,
    fallback: Arc<dyn FallbackRanker>,
}

impl SearchService {
    /// Compose a search service from its ports.
    pub fn new(
        orchestrator: Arc<EmbeddingOrchestrator>,
        index: Arc<dyn VectorIndex>,
        fallback: Arc<dyn FallbackRanker>,
    ) -> Self {
        Self {
            orchestrator,
            index,
            fallback,
        }
    }

    /// Search the index for the `top_k` images best matching `query`.
    ///
    /// An empty index yields an empty outcome, not an error. Exhaustion of
    /// every embedding provider yields a degraded keyword outcome; any
    /// other failure is the operation's failure.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        options: &ResolveOptions,
    ) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("search query must not be empty"));
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(Error::invalid_input(format!(
                "search query exceeds {MAX_QUERY_CHARS} characters"
            )));
        }
        if top_k == 0 {
            return Err(Error::invalid_input("top_k must be at least 1"));
        }

        match self.orchestrator.resolve_text(query, options).await {
            Ok(resolved) => {
                if let Some(space) = self.index.space().await {
                    if space != resolved.embedding.model {
                        return Err(Error::invalid_input(format!(
                            "embedding space mismatch: index holds '{space}', \
                             query was embedded in '{}'",
                            resolved.embedding.model
                        )));
                    }
                }

                let hits = self.index.query(&resolved.embedding.vector, top_k).await?;
                debug!(
                    provider = %resolved.provider,
                    hits = hits.len(),
                    "search resolved via embeddings"
                );
                Ok(SearchOutcome {
                    results: hits
                        .into_iter()
                        .map(|(record, score)| SearchResult {
                            record,
                            score,
                            origin: ResultOrigin::Embedding,
                        })
                        .collect(),
                    provider_used: resolved.provider,
                    degraded: false,
                })
            }
            Err(Error::AllProvidersFailed { failures }) => {
                warn!(
                    failed_providers = failures.len(),
                    "every embedding provider failed, degrading to keyword ranking"
                );
                let records = self.index.records().await;
                let results = self.fallback.rank(&records, query, top_k);
                Ok(SearchOutcome {
                    results,
                    provider_used: FALLBACK_PROVIDER_NAME.to_string(),
                    degraded: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}
