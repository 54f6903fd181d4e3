//! # PixLens Application
//!
//! Application layer: the embedding orchestrator that turns an ordered set
//! of provider backends into one reliable capability, and the use-case
//! services (search, index building) composed from the domain ports.
//!
//! This crate depends only on `pixlens-domain`; concrete providers are
//! injected by the infrastructure layer.

pub mod orchestrator;
pub mod use_cases;

pub use orchestrator::{
    EmbeddingOrchestrator, RegisteredProvider, ResolveOptions, ResolvedEmbedding,
};
pub use use_cases::{IndexingReport, IndexingService, SearchService};
