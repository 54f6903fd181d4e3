//! Tests for the indexing service
//!
//! Directory fixtures live in a tempdir; embeddings come from the real
//! NullEmbeddingProvider so builds are deterministic and offline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use pixlens_application::orchestrator::{
    EmbeddingOrchestrator, RegisteredProvider, ResolveOptions,
};
use pixlens_application::use_cases::IndexingService;
use pixlens_domain::error::Error;
use pixlens_domain::ports::{EmbeddingProvider, VectorIndex};
use pixlens_domain::value_objects::ProviderDescriptor;
use pixlens_providers::embedding::NullEmbeddingProvider;
use pixlens_providers::FlatVectorIndex;

fn null_orchestrator() -> Arc<EmbeddingOrchestrator> {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(NullEmbeddingProvider::new());
    Arc::new(EmbeddingOrchestrator::new(vec![RegisteredProvider {
        descriptor: ProviderDescriptor {
            name: "null".to_string(),
            capabilities: provider.capabilities().to_vec(),
            priority: 0,
            model: "null-test".to_string(),
            timeout: Duration::from_secs(5),
        },
        provider,
    }]))
}

fn write_fixture(dir: &Path) {
    std::fs::create_dir_all(dir.join("animals")).unwrap();
    std::fs::create_dir_all(dir.join("places")).unwrap();
    std::fs::write(dir.join("animals/cat.jpg"), [10u8, 20, 30]).unwrap();
    std::fs::write(dir.join("places/beach.png"), [40u8, 50, 60]).unwrap();
    std::fs::write(dir.join("notes.txt"), b"not an image").unwrap();
}

#[tokio::test]
async fn directory_build_indexes_supported_images_only() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(
        null_orchestrator(),
        Arc::clone(&index) as Arc<dyn VectorIndex>,
    );

    let report = service
        .index_directory(dir.path(), &ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 2);
    assert_eq!(report.files_skipped, 1);
    assert!(report.errors.is_empty());
    assert_eq!(index.len().await, 2);

    let records = index.records().await;
    // walkdir sorts by file name, so insertion order is reproducible
    assert_eq!(records[0].id, "animals/cat.jpg");
    assert_eq!(records[0].tags, vec!["animals"]);
    assert_eq!(records[1].id, "places/beach.png");
    assert_eq!(records[1].tags, vec!["places"]);
}

#[tokio::test]
async fn unreadable_payload_is_recorded_and_skipped() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    // Zero-byte payloads are rejected by ImageData::new.
    std::fs::write(dir.path().join("animals/empty.jpg"), []).unwrap();

    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(
        null_orchestrator(),
        Arc::clone(&index) as Arc<dyn VectorIndex>,
    );

    let report = service
        .index_directory(dir.path(), &ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].0.ends_with("empty.jpg"));
}

#[tokio::test]
async fn missing_directory_is_invalid_input() {
    let dir = tempdir().unwrap();
    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(null_orchestrator(), index);

    let err = service
        .index_directory(&dir.path().join("nope"), &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn provider_exhaustion_aborts_the_build() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(
        Arc::new(EmbeddingOrchestrator::new(Vec::new())),
        Arc::clone(&index) as Arc<dyn VectorIndex>,
    );

    let err = service
        .index_directory(dir.path(), &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AllProvidersFailed { .. }));
}

#[tokio::test]
async fn build_and_persist_round_trips() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = tempdir().unwrap();
    let index_path = out.path().join("index");

    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(null_orchestrator(), index);

    let report = service
        .index_and_persist(dir.path(), &index_path, &ResolveOptions::default())
        .await
        .unwrap();
    assert_eq!(report.files_indexed, 2);

    let reloaded = FlatVectorIndex::load(&index_path).await.unwrap();
    assert_eq!(reloaded.len().await, 2);
    assert_eq!(reloaded.space().await.as_deref(), Some("null-test"));
}

#[tokio::test]
async fn persisting_an_empty_build_is_rejected() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"no images here").unwrap();
    let out = tempdir().unwrap();

    let index = Arc::new(FlatVectorIndex::new());
    let service = IndexingService::new(null_orchestrator(), index);

    let err = service
        .index_and_persist(dir.path(), &out.path().join("index"), &ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}
