//! Embedding Provider Implementations
//!
//! Converts images and text into dense vector embeddings in a shared
//! similarity space. Each provider offers different tradeoffs between
//! quality, cost, and privacy.
//!
//! ## Available Providers
//!
//! | Provider | Type | Capabilities |
//! |----------|------|--------------|
//! | NullEmbeddingProvider | Testing | text + image |
//! | NvclipEmbeddingProvider | Cloud (NVIDIA NIM) | text + image |
//! | OpenAiEmbeddingProvider | Cloud | text |
//! | GeminiEmbeddingProvider | Cloud | text |
//! | LocalEmbeddingProvider | Local ML | text (requires `embedding-fastembed`) |
//!
//! ## Provider Selection Guide
//!
//! ### Development/Testing
//! - **Default**: Use `NullEmbeddingProvider` for unit tests
//!
//! ### Cloud/Production
//! - **nvclip**: the only cloud backend that embeds images and text into
//!   one space; required for building image indexes
//! - **OpenAI / Gemini**: text-side query encoding against an index whose
//!   space they share
//!
//! ### Local/Privacy-First
//! - **Local**: ONNX inference without network calls (feature-gated)

pub mod gemini;
pub mod helpers;
#[cfg(feature = "embedding-fastembed")]
pub mod local;
pub mod null;
pub mod nvclip;
pub mod openai;

pub use gemini::GeminiEmbeddingProvider;
#[cfg(feature = "embedding-fastembed")]
pub use local::LocalEmbeddingProvider;
pub use null::NullEmbeddingProvider;
pub use nvclip::NvclipEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
