//! Domain Value Objects
//!
//! Immutable value objects that represent concepts in the retrieval domain
//! without identity. Value objects are defined by their attributes and can
//! be compared for equality.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Embedding`] | Fixed-dimension vector in a named embedding space |
//! | [`ImageRecord`] | Identity and metadata of an indexed image |
//! | [`ImageData`] | Raw raster bytes handed to an embedding provider |
//! | [`ProviderDescriptor`] | Name, capabilities, and priority of a backend |
//! | [`SearchResult`] | One ranked hit from a search operation |
//! | [`SearchOutcome`] | Full response of a search, including provenance |

/// Semantic embedding value objects
pub mod embedding;
/// Image identity and payload value objects
pub mod image;
/// Provider description value objects
pub mod provider;
/// Search-related value objects
pub mod search;

pub use embedding::Embedding;
pub use image::{ImageData, ImageRecord, ImageSource, MAX_IMAGE_BYTES};
pub use provider::{Capability, ProviderDescriptor, ProviderMode};
pub use search::{ResultOrigin, SearchOutcome, SearchResult};
