//! Vector Index Implementations
//!
//! Durable, queryable stores of (record, embedding) pairs implementing the
//! `VectorIndex` port.
//!
//! | Index | Search | Persistence |
//! |-------|--------|-------------|
//! | [`FlatVectorIndex`] | exact cosine over unit vectors | manifest + raw f32 blob, swap-on-persist |

pub mod flat;

pub use flat::FlatVectorIndex;
