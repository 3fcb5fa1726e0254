//! # parcela-vector
//!
//! The two nearest-neighbor indices (semantic 512-dim, structural
//! 256-dim) behind the [`parcela_core::traits::VectorIndex`] seam, the
//! dual-index wrapper with the over-fetch filtering contract, and the
//! embedding provider chain.

pub mod dual;
pub mod index;
pub mod provider;

pub use dual::{DualVectorIndex, StructuralSeed};
pub use index::{InMemoryIndexFactory, InMemoryVectorIndex};
pub use provider::{create_provider, CachedEmbedder, HashingEmbeddingProvider, HttpEmbeddingProvider};
