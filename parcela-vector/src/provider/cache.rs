//! Query-embedding cache wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::debug;

use parcela_core::errors::ParcelaResult;
use parcela_core::traits::EmbeddingProvider;

/// Wraps any provider with an in-memory cache keyed by the blake3 hash
/// of the text. Repeated free-text queries skip the network round-trip.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Cache<String, Vec<f32>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed(&self, text: &str) -> ParcelaResult<Vec<f32>> {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(vector) = self.cache.get(&key) {
            debug!(hash = %key, "embedding cache hit");
            return Ok(vector);
        }
        let vector = self.inner.embed(text).await?;
        self.cache.insert(key, vector.clone());
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HashingEmbeddingProvider;

    #[tokio::test]
    async fn cached_result_matches_inner_provider() {
        let inner = Arc::new(HashingEmbeddingProvider::new(32));
        let cached = CachedEmbedder::new(inner.clone(), 16);
        let direct = inner.embed("osowa forest plot").await.unwrap();
        let first = cached.embed("osowa forest plot").await.unwrap();
        let second = cached.embed("osowa forest plot").await.unwrap();
        assert_eq!(direct, first);
        assert_eq!(first, second);
    }
}
