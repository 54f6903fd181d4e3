//! Domain Ports
//!
//! Traits at the seams of the system. Providers implement them; the
//! application layer depends only on these traits, never on concrete
//! backends, so new backends can be added without touching orchestration
//! logic.
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`EmbeddingProvider`] | local model and remote API backends |
//! | [`VectorIndex`] | durable, queryable embedding stores |
//! | [`FallbackRanker`] | keyword ranking for degraded mode |

/// Embedding backend port
pub mod embedding;
/// Keyword fallback ranking port
pub mod fallback;
/// Vector index port
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use fallback::FallbackRanker;
pub use vector_index::VectorIndex;
