//! Brute-force in-memory cosine index.
//!
//! Snapshot generations are small enough (tens of thousands of parcels)
//! that an exact scan beats an approximate structure; the trait seam is
//! what matters — an external ANN service plugs in behind the same
//! interface without touching the pipeline.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use parcela_core::errors::{ParcelaError, ParcelaResult, VectorError};
use parcela_core::parcel::ParcelId;
use parcela_core::traits::{VectorIndex, VectorIndexFactory};

/// Exact cosine index over one embedding family.
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    dims: usize,
    entries: Vec<(ParcelId, Vec<f32>)>,
    by_id: HashMap<ParcelId, usize>,
}

impl InMemoryVectorIndex {
    /// Build from (id, vector) pairs. Every vector must have `dims`
    /// dimensions.
    pub fn build(dims: usize, mut entries: Vec<(ParcelId, Vec<f32>)>) -> ParcelaResult<Self> {
        for (_, vector) in &entries {
            if vector.len() != dims {
                return Err(ParcelaError::Vector(VectorError::DimensionMismatch {
                    expected: dims,
                    got: vector.len(),
                }));
            }
        }
        // Ascending id so equal similarities fall out in id order.
        entries.sort_by_key(|(id, _)| *id);
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(idx, (id, _))| (*id, idx))
            .collect();
        Ok(Self {
            dims,
            entries,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn dimensions(&self) -> usize {
        self.dims
    }

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        permitted: Option<&BTreeSet<ParcelId>>,
    ) -> ParcelaResult<Vec<(ParcelId, f64)>> {
        if vector.len() != self.dims {
            return Err(ParcelaError::Vector(VectorError::DimensionMismatch {
                expected: self.dims,
                got: vector.len(),
            }));
        }

        // This index pre-filters natively, so the permitted cut is exact
        // here; the over-fetch contract exists for backends that cannot.
        let mut scored: Vec<(ParcelId, f64)> = self
            .entries
            .iter()
            .filter(|(id, _)| permitted.map_or(true, |set| set.contains(id)))
            .filter_map(|(id, stored)| {
                let similarity = cosine_similarity(vector, stored);
                // Orthogonal or opposing vectors are not neighbors.
                (similarity > 0.0).then_some((*id, similarity))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn vector_of(&self, id: ParcelId) -> ParcelaResult<Option<Vec<f32>>> {
        Ok(self
            .by_id
            .get(&id)
            .map(|idx| self.entries[*idx].1.clone()))
    }
}

/// Factory plugged into the snapshot engine.
pub struct InMemoryIndexFactory;

impl VectorIndexFactory for InMemoryIndexFactory {
    fn build(
        &self,
        dims: usize,
        entries: Vec<(ParcelId, Vec<f32>)>,
    ) -> ParcelaResult<Arc<dyn VectorIndex>> {
        Ok(Arc::new(InMemoryVectorIndex::build(dims, entries)?))
    }
}

/// Cosine similarity in f64 to keep the comparison stable.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
