//! Tests for the search service
//!
//! These use real providers (NullEmbeddingProvider, FlatVectorIndex,
//! KeywordScorer) to validate actual search behavior through the
//! architecture, not mocked responses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use pixlens_application::orchestrator::{
    EmbeddingOrchestrator, RegisteredProvider, ResolveOptions,
};
use pixlens_application::use_cases::SearchService;
use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::{EmbeddingProvider, VectorIndex};
use pixlens_domain::value_objects::{
    Capability, Embedding, ImageRecord, ImageSource, ProviderDescriptor, ResultOrigin,
};
use pixlens_providers::embedding::NullEmbeddingProvider;
use pixlens_providers::{FlatVectorIndex, KeywordScorer};

/// A provider that is always down, for degraded-mode tests.
struct DownProvider;

#[async_trait]
impl EmbeddingProvider for DownProvider {
    async fn encode_text(&self, _text: &str) -> Result<Embedding> {
        Err(Error::unavailable("down", "connection refused"))
    }

    fn dimensions(&self) -> usize {
        384
    }

    fn provider_name(&self) -> &str {
        "down"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::EncodeText, Capability::EncodeImage]
    }
}

fn register(name: &str, provider: Arc<dyn EmbeddingProvider>) -> RegisteredProvider {
    RegisteredProvider {
        descriptor: ProviderDescriptor {
            name: name.to_string(),
            capabilities: provider.capabilities().to_vec(),
            priority: 0,
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
        },
        provider,
    }
}

fn record(id: &str, tags: &[&str], description: &str) -> ImageRecord {
    ImageRecord::new(
        id,
        ImageSource::Path(format!("/photos/{id}").into()),
        id.rsplit('/').next().unwrap_or(id),
    )
    .with_tags(tags.iter().map(|t| (*t).to_string()).collect())
    .with_description(description)
}

/// Index a few records embedded by the null provider, so query embeddings
/// from the same provider live in the same space.
async fn seeded_index(provider: &NullEmbeddingProvider) -> Arc<FlatVectorIndex> {
    let index = Arc::new(FlatVectorIndex::new());
    for (id, tags, description) in [
        ("animals/cat.jpg", &["animals"][..], "an orange cat"),
        ("animals/dog.jpg", &["animals"][..], "a brown dog"),
        ("places/beach.jpg", &["places"][..], "sunset at the beach"),
    ] {
        let embedding = provider.encode_text(description).await.unwrap();
        index
            .insert(record(id, tags, description), embedding)
            .await
            .unwrap();
    }
    index
}

fn search_service(
    providers: Vec<RegisteredProvider>,
    index: Arc<FlatVectorIndex>,
) -> SearchService {
    SearchService::new(
        Arc::new(EmbeddingOrchestrator::new(providers)),
        index,
        Arc::new(KeywordScorer::new()),
    )
}

#[tokio::test]
async fn search_returns_embedding_ranked_results() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(
        vec![register("null", Arc::new(NullEmbeddingProvider::new()))],
        index,
    );

    let outcome = service
        .search("an orange cat", 3, &ResolveOptions::default())
        .await
        .unwrap();

    assert!(!outcome.degraded);
    assert_eq!(outcome.provider_used, "null");
    assert_eq!(outcome.results.len(), 3);
    // Identical text embeds identically, so the exact description is the
    // top hit with maximum similarity.
    assert_eq!(outcome.results[0].record.id, "animals/cat.jpg");
    assert!((outcome.results[0].score - 1.0).abs() < 1e-5);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.origin == ResultOrigin::Embedding));
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(
        vec![register("null", Arc::new(NullEmbeddingProvider::new()))],
        index,
    );

    let err = service
        .search("   ", 3, &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn zero_top_k_is_rejected() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(
        vec![register("null", Arc::new(NullEmbeddingProvider::new()))],
        index,
    );

    let err = service
        .search("cat", 0, &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn empty_index_yields_empty_outcome() {
    let index = Arc::new(FlatVectorIndex::new());
    let service = search_service(
        vec![register("null", Arc::new(NullEmbeddingProvider::new()))],
        index,
    );

    let outcome = service
        .search("anything", 5, &ResolveOptions::default())
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
    assert!(!outcome.degraded);
}

#[tokio::test]
async fn provider_exhaustion_degrades_to_keyword_ranking() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(vec![register("down", Arc::new(DownProvider))], index);

    let outcome = service
        .search("sunset beach", 5, &ResolveOptions::default())
        .await
        .unwrap();

    assert!(outcome.degraded);
    assert_eq!(outcome.provider_used, "fallback");
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].record.id, "places/beach.jpg");
    assert_eq!(outcome.results[0].origin, ResultOrigin::Keyword);
}

#[tokio::test]
async fn no_registered_providers_also_degrades() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(Vec::new(), index);

    let outcome = service
        .search("animals", 5, &ResolveOptions::default())
        .await
        .unwrap();
    assert!(outcome.degraded);
    assert_eq!(outcome.results.len(), 2);
}

#[tokio::test]
async fn embedding_space_mismatch_is_rejected() {
    let index = Arc::new(FlatVectorIndex::new());
    index
        .insert(
            record("a.jpg", &[], "something"),
            Embedding::new(vec![1.0; 384], "other-space"),
        )
        .await
        .unwrap();
    let service = search_service(
        vec![register("null", Arc::new(NullEmbeddingProvider::new()))],
        index,
    );

    let err = service
        .search("cat", 3, &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn manual_mode_reports_the_named_provider() {
    let null = NullEmbeddingProvider::new();
    let index = seeded_index(&null).await;
    let service = search_service(
        vec![
            register("down", Arc::new(DownProvider)),
            register("null", Arc::new(NullEmbeddingProvider::new())),
        ],
        index,
    );

    let outcome = service
        .search("a brown dog", 2, &ResolveOptions::manual("null"))
        .await
        .unwrap();
    assert!(!outcome.degraded);
    assert_eq!(outcome.provider_used, "null");
}
