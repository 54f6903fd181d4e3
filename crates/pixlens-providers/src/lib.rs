//! # PixLens Providers
//!
//! Concrete implementations of the domain ports: embedding backends (local
//! and remote), the flat vector index with durable persistence, and the
//! keyword fallback ranker used when every embedding backend is down.

pub mod constants;
pub mod embedding;
pub mod keyword;
pub mod utils;
pub mod vector_index;

#[cfg(feature = "embedding-fastembed")]
pub use embedding::LocalEmbeddingProvider;
pub use embedding::{
    GeminiEmbeddingProvider, NullEmbeddingProvider, NvclipEmbeddingProvider,
    OpenAiEmbeddingProvider,
};
pub use keyword::KeywordScorer;
pub use vector_index::FlatVectorIndex;
