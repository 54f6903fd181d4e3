//! Embedding Provider Orchestrator
//!
//! Presents an ordered set of embedding backends as one capability. In auto
//! mode providers are attempted strictly sequentially in priority order
//! until one succeeds; in manual mode exactly the named provider is used
//! and its failure is the operation's failure.
//!
//! One global deadline covers the whole resolution: each attempt gets the
//! smaller of the provider's own timeout and whatever remains of the
//! deadline, and providers reached after exhaustion are recorded as failed
//! without being attempted.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pixlens_domain::error::{Error, ProviderFailure, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{
    Capability, Embedding, ImageData, ProviderDescriptor, ProviderMode,
};

/// A backend registered with the orchestrator: the immutable descriptor
/// plus the shared implementation.
pub struct RegisteredProvider {
    /// Name, capabilities, priority, and per-attempt timeout
    pub descriptor: ProviderDescriptor,
    /// The backend implementation
    pub provider: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Per-request resolution options.
#[derive(Clone, Default)]
pub struct ResolveOptions {
    /// Provider selection: auto fallback chain or one named backend
    pub mode: ProviderMode,
    /// Global deadline over the whole resolution, all attempts included
    pub deadline: Option<Duration>,
    /// Caller-side cancellation; aborts the in-flight attempt and the rest
    /// of the chain
    pub cancel: Option<CancellationToken>,
}

impl ResolveOptions {
    /// Options for one named provider, no deadline.
    pub fn manual<S: Into<String>>(name: S) -> Self {
        Self {
            mode: ProviderMode::Manual(name.into()),
            ..Self::default()
        }
    }

    /// Set the global deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// A successfully resolved embedding plus the backend that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEmbedding {
    /// The embedding vector
    pub embedding: Embedding,
    /// Name of the provider that produced it
    pub provider: String,
}

enum EncodeInput<'a> {
    Text(&'a str),
    Image(&'a ImageData),
}

impl EncodeInput<'_> {
    fn required_capability(&self) -> Capability {
        match self {
            Self::Text(_) => Capability::EncodeText,
            Self::Image(_) => Capability::EncodeImage,
        }
    }
}

/// Sequential multi-provider embedding resolution.
///
/// Registration order does not matter; providers are kept sorted by
/// priority (stable, so registration order breaks priority ties). The set
/// is immutable after construction, which keeps auto-mode behavior
/// reproducible for a given configuration.
#[derive(Debug)]
pub struct EmbeddingOrchestrator {
    providers: Vec<RegisteredProvider>,
}

impl EmbeddingOrchestrator {
    /// Create an orchestrator over the given backends.
    pub fn new(mut providers: Vec<RegisteredProvider>) -> Self {
        providers.sort_by_key(|p| p.descriptor.priority);
        Self { providers }
    }

    /// Descriptors in attempt order.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers.iter().map(|p| p.descriptor.clone()).collect()
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolve a text embedding.
    pub async fn resolve_text(
        &self,
        text: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedEmbedding> {
        self.resolve(EncodeInput::Text(text), options).await
    }

    /// Resolve an image embedding.
    pub async fn resolve_image(
        &self,
        image: &ImageData,
        options: &ResolveOptions,
    ) -> Result<ResolvedEmbedding> {
        self.resolve(EncodeInput::Image(image), options).await
    }

    async fn resolve(
        &self,
        input: EncodeInput<'_>,
        options: &ResolveOptions,
    ) -> Result<ResolvedEmbedding> {
        match &options.mode {
            ProviderMode::Manual(name) => self.resolve_manual(name, &input, options).await,
            ProviderMode::Auto => self.resolve_auto(&input, options).await,
        }
    }

    async fn resolve_manual(
        &self,
        name: &str,
        input: &EncodeInput<'_>,
        options: &ResolveOptions,
    ) -> Result<ResolvedEmbedding> {
        let registered = self
            .providers
            .iter()
            .find(|p| p.descriptor.name == name)
            .ok_or_else(|| Error::invalid_input(format!("unknown provider '{name}'")))?;

        let capability = input.required_capability();
        if !registered.descriptor.supports(capability) {
            return Err(Error::invalid_input(format!(
                "provider '{name}' does not support {capability:?}"
            )));
        }

        let budget = effective_timeout(&registered.descriptor, options.deadline);
        let embedding = self.attempt(registered, input, budget, options).await?;
        Ok(ResolvedEmbedding {
            embedding,
            provider: registered.descriptor.name.clone(),
        })
    }

    async fn resolve_auto(
        &self,
        input: &EncodeInput<'_>,
        options: &ResolveOptions,
    ) -> Result<ResolvedEmbedding> {
        let capability = input.required_capability();
        let started = Instant::now();
        let mut failures: Vec<ProviderFailure> = Vec::new();

        for registered in &self.providers {
            if !registered.descriptor.supports(capability) {
                continue;
            }
            let name = &registered.descriptor.name;

            // Spend down the global deadline; providers reached after it
            // is gone count as failed, not silently dropped.
            let remaining = options.deadline.map(|d| d.saturating_sub(started.elapsed()));
            if remaining == Some(Duration::ZERO) {
                failures.push(ProviderFailure {
                    provider: name.clone(),
                    reason: "global deadline exhausted before attempt".to_string(),
                });
                continue;
            }

            let budget = per_attempt_timeout(registered.descriptor.timeout, remaining);
            match self.attempt(registered, input, budget, options).await {
                Ok(embedding) => {
                    debug!(provider = %name, attempts = failures.len() + 1, "embedding resolved");
                    return Ok(ResolvedEmbedding {
                        embedding,
                        provider: name.clone(),
                    });
                }
                Err(err) if err.is_provider_failure() => {
                    // A cancelled caller gets the abort error, not the
                    // tail of the chain and a degraded answer.
                    if options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                        return Err(err);
                    }
                    warn!(provider = %name, error = %err, "provider failed, trying next");
                    failures.push(ProviderFailure {
                        provider: name.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Err(Error::AllProvidersFailed { failures })
    }

    /// One bounded attempt against one backend.
    async fn attempt(
        &self,
        registered: &RegisteredProvider,
        input: &EncodeInput<'_>,
        budget: Duration,
        options: &ResolveOptions,
    ) -> Result<Embedding> {
        let name = &registered.descriptor.name;
        let encode = async {
            match input {
                EncodeInput::Text(text) => registered.provider.encode_text(text).await,
                EncodeInput::Image(image) => registered.provider.encode_image(image).await,
            }
        };
        let bounded = tokio::time::timeout(budget, encode);

        match &options.cancel {
            Some(cancel) => {
                tokio::select! {
                    () = cancel.cancelled() => {
                        Err(Error::timeout(name.clone(), "cancelled by caller"))
                    }
                    outcome = bounded => flatten_timeout(name, budget, outcome),
                }
            }
            None => flatten_timeout(name, budget, bounded.await),
        }
    }
}

fn effective_timeout(descriptor: &ProviderDescriptor, deadline: Option<Duration>) -> Duration {
    per_attempt_timeout(descriptor.timeout, deadline)
}

fn per_attempt_timeout(provider_timeout: Duration, remaining: Option<Duration>) -> Duration {
    match remaining {
        Some(remaining) => provider_timeout.min(remaining),
        None => provider_timeout,
    }
}

fn flatten_timeout(
    provider: &str,
    budget: Duration,
    outcome: std::result::Result<Result<Embedding>, tokio::time::error::Elapsed>,
) -> Result<Embedding> {
    match outcome {
        Ok(result) => result,
        Err(_) => Err(Error::timeout(
            provider,
            format!("no response within {budget:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEXT_ONLY: &[Capability] = &[Capability::EncodeText];
    const TEXT_AND_IMAGE: &[Capability] = &[Capability::EncodeText, Capability::EncodeImage];

    enum Behavior {
        Succeed,
        Unavailable,
        Hang,
    }

    struct StubProvider {
        name: String,
        behavior: Behavior,
        capabilities: &'static [Capability],
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(name: &str, behavior: Behavior, capabilities: &'static [Capability]) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                behavior,
                capabilities,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond(&self) -> Result<Embedding> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(Embedding::new(vec![1.0, 0.0], self.name.clone())),
                Behavior::Unavailable => Err(Error::unavailable(self.name.clone(), "down")),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(Error::internal("unreachable"))
                }
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        async fn encode_text(&self, _text: &str) -> Result<Embedding> {
            self.respond().await
        }

        async fn encode_image(&self, _image: &ImageData) -> Result<Embedding> {
            if !self.supports(Capability::EncodeImage) {
                return Err(Error::unavailable(
                    self.name.clone(),
                    "image encoding is not supported by this provider",
                ));
            }
            self.respond().await
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn provider_name(&self) -> &str {
            &self.name
        }

        fn capabilities(&self) -> &[Capability] {
            self.capabilities
        }
    }

    fn register(
        provider: &Arc<StubProvider>,
        priority: u32,
        timeout: Duration,
    ) -> RegisteredProvider {
        RegisteredProvider {
            descriptor: ProviderDescriptor {
                name: provider.name.clone(),
                capabilities: provider.capabilities.to_vec(),
                priority,
                model: format!("{}-model", provider.name),
                timeout,
            },
            provider: Arc::clone(provider) as Arc<dyn EmbeddingProvider>,
        }
    }

    const ATTEMPT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn auto_mode_falls_through_to_next_provider() {
        let down = StubProvider::new("down", Behavior::Unavailable, TEXT_AND_IMAGE);
        let up = StubProvider::new("up", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&down, 0, ATTEMPT),
            register(&up, 1, ATTEMPT),
        ]);

        let resolved = orchestrator
            .resolve_text("a cat", &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(resolved.provider, "up");
        assert_eq!(down.calls(), 1);
        assert_eq!(up.calls(), 1);
    }

    #[tokio::test]
    async fn providers_are_attempted_in_priority_order() {
        let second = StubProvider::new("second", Behavior::Succeed, TEXT_AND_IMAGE);
        let first = StubProvider::new("first", Behavior::Succeed, TEXT_AND_IMAGE);
        // Registered out of order; priority decides.
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&second, 5, ATTEMPT),
            register(&first, 1, ATTEMPT),
        ]);

        let resolved = orchestrator
            .resolve_text("a cat", &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(resolved.provider, "first");
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn exhaustion_reports_failures_in_attempt_order() {
        let a = StubProvider::new("a", Behavior::Unavailable, TEXT_AND_IMAGE);
        let b = StubProvider::new("b", Behavior::Unavailable, TEXT_AND_IMAGE);
        let orchestrator =
            EmbeddingOrchestrator::new(vec![register(&a, 0, ATTEMPT), register(&b, 1, ATTEMPT)]);

        let err = orchestrator
            .resolve_text("a cat", &ResolveOptions::default())
            .await
            .unwrap_err();
        match err {
            Error::AllProvidersFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].provider, "a");
                assert_eq!(failures[1].provider, "b");
            }
            other => panic!("expected AllProvidersFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn image_resolution_skips_text_only_providers() {
        let text_only = StubProvider::new("text-only", Behavior::Succeed, TEXT_ONLY);
        let multimodal = StubProvider::new("multimodal", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&text_only, 0, ATTEMPT),
            register(&multimodal, 1, ATTEMPT),
        ]);

        let image = ImageData::new(vec![1, 2, 3]).unwrap();
        let resolved = orchestrator
            .resolve_image(&image, &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(resolved.provider, "multimodal");
        assert_eq!(text_only.calls(), 0);
    }

    #[tokio::test]
    async fn manual_mode_uses_exactly_the_named_provider() {
        let a = StubProvider::new("a", Behavior::Succeed, TEXT_AND_IMAGE);
        let b = StubProvider::new("b", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator =
            EmbeddingOrchestrator::new(vec![register(&a, 0, ATTEMPT), register(&b, 1, ATTEMPT)]);

        let resolved = orchestrator
            .resolve_text("a cat", &ResolveOptions::manual("b"))
            .await
            .unwrap();
        assert_eq!(resolved.provider, "b");
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn manual_mode_failure_is_not_masked() {
        let down = StubProvider::new("down", Behavior::Unavailable, TEXT_AND_IMAGE);
        let up = StubProvider::new("up", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&down, 0, ATTEMPT),
            register(&up, 1, ATTEMPT),
        ]);

        let err = orchestrator
            .resolve_text("a cat", &ResolveOptions::manual("down"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
        assert_eq!(up.calls(), 0);
    }

    #[tokio::test]
    async fn manual_mode_rejects_unknown_provider() {
        let a = StubProvider::new("a", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![register(&a, 0, ATTEMPT)]);

        let err = orchestrator
            .resolve_text("a cat", &ResolveOptions::manual("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn manual_mode_rejects_missing_capability() {
        let text_only = StubProvider::new("text-only", Behavior::Succeed, TEXT_ONLY);
        let orchestrator = EmbeddingOrchestrator::new(vec![register(&text_only, 0, ATTEMPT)]);

        let image = ImageData::new(vec![1, 2, 3]).unwrap();
        let err = orchestrator
            .resolve_image(&image, &ResolveOptions::manual("text-only"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn global_deadline_bounds_the_whole_chain() {
        let slow = StubProvider::new("slow", Behavior::Hang, TEXT_AND_IMAGE);
        let up = StubProvider::new("up", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&slow, 0, Duration::from_secs(60)),
            register(&up, 1, ATTEMPT),
        ]);

        tokio::time::pause();
        let options = ResolveOptions::default().with_deadline(Duration::from_millis(100));
        let err = orchestrator.resolve_text("a cat", &options).await.unwrap_err();

        match err {
            Error::AllProvidersFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].provider, "slow");
                assert!(failures[1].reason.contains("deadline"));
            }
            other => panic!("expected AllProvidersFailed, got {other}"),
        }
        // The second provider was never actually called.
        assert_eq!(up.calls(), 0);
    }

    #[tokio::test]
    async fn slow_provider_times_out_and_chain_continues() {
        let slow = StubProvider::new("slow", Behavior::Hang, TEXT_AND_IMAGE);
        let up = StubProvider::new("up", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&slow, 0, Duration::from_millis(50)),
            register(&up, 1, ATTEMPT),
        ]);

        tokio::time::pause();
        let resolved = orchestrator
            .resolve_text("a cat", &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(resolved.provider, "up");
    }

    #[tokio::test]
    async fn cancellation_aborts_resolution() {
        let slow = StubProvider::new("slow", Behavior::Hang, TEXT_AND_IMAGE);
        let up = StubProvider::new("up", Behavior::Succeed, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&slow, 0, Duration::from_secs(60)),
            register(&up, 1, ATTEMPT),
        ]);

        let cancel = CancellationToken::new();
        let options = ResolveOptions::default().with_cancel(cancel.clone());
        let handle = tokio::spawn(async move {
            orchestrator.resolve_text("a cat", &options).await
        });

        tokio::task::yield_now().await;
        cancel.cancel();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert_eq!(up.calls(), 0);
    }

    #[tokio::test]
    async fn cancellation_does_not_walk_the_rest_of_the_chain() {
        let slow = StubProvider::new("slow", Behavior::Hang, TEXT_AND_IMAGE);
        let backup = StubProvider::new("backup", Behavior::Unavailable, TEXT_AND_IMAGE);
        let orchestrator = EmbeddingOrchestrator::new(vec![
            register(&slow, 0, Duration::from_secs(60)),
            register(&backup, 1, ATTEMPT),
        ]);

        let cancel = CancellationToken::new();
        let options = ResolveOptions::default().with_cancel(cancel.clone());
        let handle = tokio::spawn(async move {
            let result = orchestrator.resolve_text("a cat", &options).await;
            (result, backup.calls())
        });

        tokio::task::yield_now().await;
        cancel.cancel();

        // The abort surfaces directly; the second provider is never
        // attempted and no exhaustion report is assembled.
        let (result, backup_calls) = handle.await.unwrap();
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert_eq!(backup_calls, 0);
    }
}
