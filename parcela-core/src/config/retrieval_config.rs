use serde::{Deserialize, Serialize};

use super::defaults;

/// Pipeline and fusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// RRF smoothing constant `k` in `1 / (rank + k)`.
    pub rrf_k: u32,
    /// Timeout applied independently to each external branch call.
    pub branch_timeout_ms: u64,
    /// Candidates fetched per vector branch.
    pub vector_k: usize,
    /// Minimum share of the fused score a source needs for a highlight.
    pub min_salience: f64,
    /// Free teaser entries per response.
    pub teaser_size: usize,
    /// Ranked ids per response page.
    pub page_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            branch_timeout_ms: defaults::DEFAULT_BRANCH_TIMEOUT_MS,
            vector_k: defaults::DEFAULT_VECTOR_K,
            min_salience: defaults::DEFAULT_MIN_SALIENCE,
            teaser_size: defaults::DEFAULT_TEASER_SIZE,
            page_size: defaults::DEFAULT_PAGE_SIZE,
        }
    }
}
