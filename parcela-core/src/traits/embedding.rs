use async_trait::async_trait;

use crate::errors::ParcelaResult;

/// External free-text embedding call. Failure here degrades the semantic
/// branch; it never fails the whole request.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Output dimension, matching the semantic index.
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> ParcelaResult<Vec<f32>>;
}
