use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::{SEMANTIC_DIMS, STRUCTURAL_DIMS};

/// Dual vector index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Semantic (free-text) embedding dimension.
    pub semantic_dims: usize,
    /// Structural (graph) embedding dimension.
    pub structural_dims: usize,
    /// Over-fetch inflation for backends without native pre-filtering.
    pub overfetch_factor: usize,
    /// Hits below this cosine similarity are dropped.
    pub min_similarity: f64,
    /// Query-embedding cache capacity.
    pub embed_cache_entries: u64,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            semantic_dims: SEMANTIC_DIMS,
            structural_dims: STRUCTURAL_DIMS,
            overfetch_factor: defaults::DEFAULT_OVERFETCH_FACTOR,
            min_similarity: defaults::DEFAULT_MIN_SIMILARITY,
            embed_cache_entries: defaults::DEFAULT_EMBED_CACHE_ENTRIES,
        }
    }
}
