//! Embedding providers: remote HTTP primary, deterministic hashing
//! fallback, and a cache wrapper shared by both.

mod cache;
mod hashing;
mod http;

pub use cache::CachedEmbedder;
pub use hashing::HashingEmbeddingProvider;
pub use http::HttpEmbeddingProvider;

use std::sync::Arc;

use tracing::info;

use parcela_core::config::VectorConfig;
use parcela_core::traits::EmbeddingProvider;

/// Build the provider for a deployment: the remote endpoint when one is
/// configured, the hashing fallback otherwise, both behind the cache.
pub fn create_provider(
    endpoint: Option<String>,
    config: &VectorConfig,
) -> Arc<dyn EmbeddingProvider> {
    let inner: Arc<dyn EmbeddingProvider> = match endpoint {
        Some(endpoint) => Arc::new(HttpEmbeddingProvider::new(endpoint, config.semantic_dims)),
        None => Arc::new(HashingEmbeddingProvider::new(config.semantic_dims)),
    };
    info!(provider = inner.name(), dims = config.semantic_dims, "embedding provider ready");
    Arc::new(CachedEmbedder::new(inner, config.embed_cache_entries))
}
