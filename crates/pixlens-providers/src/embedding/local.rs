//! Local Embedding Provider
//!
//! Implements the `EmbeddingProvider` port using the fastembed library for
//! local ONNX inference without external API calls. Text-only.
//!
//! The model is loaded lazily inside a dedicated actor task on first use,
//! so process startup never pays the model-load cost and concurrent first
//! callers trigger exactly one load.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use pixlens_domain::error::{Error, Result};
use pixlens_domain::ports::EmbeddingProvider;
use pixlens_domain::value_objects::{Capability, Embedding};

use crate::embedding::helpers::prepare_text;

const CAPABILITIES: &[Capability] = &[Capability::EncodeText];

/// Dimensions of the default AllMiniLML6V2 model
const LOCAL_DIMENSIONS_DEFAULT: usize = 384;

/// Messages for the local embedding actor
enum LocalEmbedMessage {
    Embed {
        text: String,
        tx: oneshot::Sender<Result<Embedding>>,
    },
}

/// Local embedding provider using the actor pattern
///
/// The actor owns the ONNX model, eliminating locks; requests flow through
/// a channel and are answered on oneshot channels. The model itself is
/// created on the first request, not at construction.
pub struct LocalEmbeddingProvider {
    sender: mpsc::Sender<LocalEmbedMessage>,
    model_name: String,
}

impl LocalEmbeddingProvider {
    /// Create a provider for the default model (AllMiniLML6V2)
    pub fn new() -> Self {
        Self::with_model(EmbeddingModel::AllMiniLML6V2)
    }

    /// Create a provider for a specific fastembed model
    pub fn with_model(model: EmbeddingModel) -> Self {
        let model_name = format!("{model:?}");

        let (tx, rx) = mpsc::channel(100);
        let mut actor = LocalEmbedActor::new(rx, model, model_name.clone());
        tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            sender: tx,
            model_name,
        }
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model_name
    }
}

impl Default for LocalEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn encode_text(&self, text: &str) -> Result<Embedding> {
        let text = prepare_text(text)?.into_owned();
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LocalEmbedMessage::Embed { text, tx })
            .await
            .map_err(|_| Error::unavailable("local", "embedding actor channel closed"))?;

        rx.await
            .unwrap_or_else(|_| Err(Error::unavailable("local", "embedding actor closed")))
    }

    fn dimensions(&self) -> usize {
        LOCAL_DIMENSIONS_DEFAULT
    }

    fn provider_name(&self) -> &str {
        "local"
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }
}

impl Clone for LocalEmbeddingProvider {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

/// Internal actor that owns the model and processes embedding requests
struct LocalEmbedActor {
    receiver: mpsc::Receiver<LocalEmbedMessage>,
    model_kind: EmbeddingModel,
    model_name: String,
    model: Option<TextEmbedding>,
}

impl LocalEmbedActor {
    fn new(
        receiver: mpsc::Receiver<LocalEmbedMessage>,
        model_kind: EmbeddingModel,
        model_name: String,
    ) -> Self {
        Self {
            receiver,
            model_kind,
            model_name,
            model: None,
        }
    }

    async fn run(&mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LocalEmbedMessage::Embed { text, tx } => {
                    let result = self.embed(&text);
                    let _ = tx.send(result);
                }
            }
        }
    }

    fn embed(&mut self, text: &str) -> Result<Embedding> {
        let model_name = self.model_name.clone();
        let model = self.model_or_load()?;
        let mut vectors = model
            .embed(vec![text], None)
            .map_err(|e| Error::unavailable("local", format!("local inference failed: {e}")))?;
        let vector = vectors
            .pop()
            .ok_or_else(|| Error::unavailable("local", "local model returned no embedding"))?;
        Ok(Embedding::new(vector, model_name))
    }

    /// One-time lazy model load; subsequent calls reuse the loaded model.
    fn model_or_load(&mut self) -> Result<&mut TextEmbedding> {
        if self.model.is_none() {
            info!(model = %self.model_name, "loading local embedding model");
            let options =
                InitOptions::new(self.model_kind.clone()).with_show_download_progress(false);
            let loaded = TextEmbedding::try_new(options).map_err(|e| {
                Error::unavailable("local", format!("failed to initialize local model: {e}"))
            })?;
            self.model = Some(loaded);
        }
        match self.model {
            Some(ref mut model) => Ok(model),
            None => Err(Error::internal("local model missing after load")),
        }
    }
}
