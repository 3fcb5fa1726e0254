//! Remote embedding provider over HTTP.

use async_trait::async_trait;
use serde::Deserialize;

use parcela_core::errors::{ParcelaError, ParcelaResult};
use parcela_core::traits::EmbeddingProvider;

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Calls an external embedding service: `POST {endpoint}` with
/// `{"input": text}`, expecting `{"embedding": [..]}`.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    dims: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(endpoint: String, dims: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            dims,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> ParcelaResult<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "input": text }))
            .send()
            .await
            .map_err(|e| ParcelaError::Embedding {
                reason: format!("request failed: {e}"),
            })?
            .error_for_status()
            .map_err(|e| ParcelaError::Embedding {
                reason: format!("provider returned error status: {e}"),
            })?;

        let body: EmbedResponse = response.json().await.map_err(|e| ParcelaError::Embedding {
            reason: format!("malformed response: {e}"),
        })?;

        if body.embedding.len() != self.dims {
            return Err(ParcelaError::Embedding {
                reason: format!(
                    "provider returned {} dims, expected {}",
                    body.embedding.len(),
                    self.dims
                ),
            });
        }
        Ok(body.embedding)
    }
}
