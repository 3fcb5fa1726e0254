use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ParcelaResult;
use crate::parcel::ParcelId;

/// One nearest-neighbor index over fixed-dimension parcel embeddings.
///
/// The same pipeline runs whether the backing index is in-memory, an
/// external ANN service, or a database extension.
///
/// Filtering contract: implementations MAY apply `permitted` natively; a
/// backend without native pre-filtering is allowed to return a superset.
/// Callers that need an exact permitted-set cut must over-fetch by the
/// configured inflation factor and post-filter (see
/// `VectorConfig::overfetch_factor`); the dual-index wrapper does exactly
/// that, so correctness never depends on native support.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Fixed dimension of every vector in this index.
    fn dimensions(&self) -> usize;

    /// Up to `k` (parcel id, cosine similarity) pairs, similarity
    /// descending, ties by ascending parcel id.
    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        permitted: Option<&BTreeSet<ParcelId>>,
    ) -> ParcelaResult<Vec<(ParcelId, f64)>>;

    /// The stored vector of one parcel, for seeded similarity queries.
    async fn vector_of(&self, id: ParcelId) -> ParcelaResult<Option<Vec<f32>>>;
}

/// Builds a vector index from a generation's embeddings. The snapshot
/// engine is index-agnostic; the concrete index crate plugs in here.
pub trait VectorIndexFactory: Send + Sync {
    fn build(
        &self,
        dims: usize,
        entries: Vec<(ParcelId, Vec<f32>)>,
    ) -> ParcelaResult<Arc<dyn VectorIndex>>;
}
