//! The dual-index wrapper: one semantic index, one structural index,
//! shared filtering discipline.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use parcela_core::config::VectorConfig;
use parcela_core::errors::{ParcelaError, ParcelaResult, VectorError};
use parcela_core::parcel::ParcelId;
use parcela_core::traits::VectorIndex;

/// Seed for a structural similarity query: an explicit vector or a
/// parcel whose stored vector is looked up first.
pub enum StructuralSeed<'a> {
    Vector(&'a [f32]),
    Parcel(ParcelId),
}

/// Both indices of one snapshot generation.
///
/// Queries here never trust the backend's permitted-set support: with a
/// permitted set present the wrapper fetches `k * overfetch_factor`
/// candidates and post-filters, so a backend that ignores the filter
/// still yields an exact cut.
pub struct DualVectorIndex {
    semantic: Arc<dyn VectorIndex>,
    structural: Arc<dyn VectorIndex>,
    config: VectorConfig,
}

impl DualVectorIndex {
    pub fn new(
        semantic: Arc<dyn VectorIndex>,
        structural: Arc<dyn VectorIndex>,
        config: VectorConfig,
    ) -> ParcelaResult<Self> {
        if semantic.dimensions() != config.semantic_dims {
            return Err(ParcelaError::Vector(VectorError::DimensionMismatch {
                expected: config.semantic_dims,
                got: semantic.dimensions(),
            }));
        }
        if structural.dimensions() != config.structural_dims {
            return Err(ParcelaError::Vector(VectorError::DimensionMismatch {
                expected: config.structural_dims,
                got: structural.dimensions(),
            }));
        }
        Ok(Self {
            semantic,
            structural,
            config,
        })
    }

    /// Query the semantic index with a free-text embedding.
    pub async fn query_semantic(
        &self,
        vector: &[f32],
        k: usize,
        permitted: Option<&BTreeSet<ParcelId>>,
    ) -> ParcelaResult<Vec<(ParcelId, f64)>> {
        self.query_one(&self.semantic, vector, k, permitted).await
    }

    /// Query the structural index from a seed. A seed parcel without a
    /// stored vector yields an empty result, not an error — it has no
    /// structural neighborhood to speak of. The seed parcel itself is
    /// excluded from the hits.
    pub async fn query_structural(
        &self,
        seed: StructuralSeed<'_>,
        k: usize,
        permitted: Option<&BTreeSet<ParcelId>>,
    ) -> ParcelaResult<Vec<(ParcelId, f64)>> {
        match seed {
            StructuralSeed::Vector(vector) => {
                self.query_one(&self.structural, vector, k, permitted).await
            }
            StructuralSeed::Parcel(id) => {
                let Some(vector) = self.structural.vector_of(id).await? else {
                    debug!(parcel = %id, "seed parcel has no structural vector");
                    return Ok(Vec::new());
                };
                let mut hits = self
                    .query_one(&self.structural, &vector, k + 1, permitted)
                    .await?;
                hits.retain(|(hit, _)| *hit != id);
                hits.truncate(k);
                Ok(hits)
            }
        }
    }

    async fn query_one(
        &self,
        index: &Arc<dyn VectorIndex>,
        vector: &[f32],
        k: usize,
        permitted: Option<&BTreeSet<ParcelId>>,
    ) -> ParcelaResult<Vec<(ParcelId, f64)>> {
        let fetch_k = match permitted {
            Some(_) => k.saturating_mul(self.config.overfetch_factor.max(1)),
            None => k,
        };
        let mut hits = index.query(vector, fetch_k, permitted).await?;
        if let Some(set) = permitted {
            hits.retain(|(id, _)| set.contains(id));
        }
        hits.retain(|(_, similarity)| *similarity >= self.config.min_similarity);
        hits.truncate(k);
        Ok(hits)
    }
}
