//! Deterministic last-resort embedding provider.
//!
//! Derives a unit vector from the blake3 extended output of the text.
//! No semantic power, but stable across processes, which keeps the
//! pipeline exercisable when no remote provider is configured.

use async_trait::async_trait;

use parcela_core::errors::ParcelaResult;
use parcela_core::traits::EmbeddingProvider;

pub struct HashingEmbeddingProvider {
    dims: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashing-fallback"
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> ParcelaResult<Vec<f32>> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(text.trim().to_lowercase().as_bytes());
        let mut reader = hasher.finalize_xof();

        let mut bytes = vec![0u8; self.dims * 4];
        reader.fill(&mut bytes);

        let mut vector: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                // Spread over [-1, 1].
                (raw as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect();

        let norm: f64 = vector.iter().map(|v| (*v as f64).powi(2)).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v = (*v as f64 / norm) as f32;
            }
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deterministic_across_calls() {
        let provider = HashingEmbeddingProvider::new(64);
        let a = provider.embed("quiet parcel near the forest").await.unwrap();
        let b = provider.embed("quiet parcel near the forest").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn normalization_and_case_fold_agree() {
        let provider = HashingEmbeddingProvider::new(64);
        let a = provider.embed("Quiet Parcel").await.unwrap();
        let b = provider.embed("  quiet parcel ").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn output_is_unit_length() {
        let provider = HashingEmbeddingProvider::new(128);
        let v = provider.embed("anything").await.unwrap();
        let norm: f64 = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }
}
