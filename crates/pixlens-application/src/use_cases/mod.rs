//! Use-Case Services
//!
//! The operations PixLens exposes: searching an index by free text and
//! building an index from a directory of images. Services are composed
//! from domain ports plus the orchestrator; they own the validation and
//! degradation policy, not the backends.

pub mod indexing_service;
pub mod search_service;

pub use indexing_service::{IndexingReport, IndexingService};
pub use search_service::SearchService;
