use async_trait::async_trait;

use crate::errors::ParcelaResult;
use crate::models::{CanonicalFilters, GraphMatch};
use crate::parcel::{LocationId, LocationNode, Parcel, ParcelId};

/// Categorical predicate engine over the parcel graph.
///
/// Traversal order is unspecified; determinism is enforced downstream by
/// the fusion stage. An empty match set is a normal result.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Apply the canonical filters and return the matching id set plus the
    /// sibling-scope diagnostic breakdown.
    async fn filter_parcels(&self, filters: &CanonicalFilters) -> ParcelaResult<GraphMatch>;

    /// Count-only mode: same predicates, no row materialization.
    async fn count_matching(&self, filters: &CanonicalFilters) -> ParcelaResult<usize>;

    /// Resolve a free-form location description to matching nodes. Zero or
    /// multiple results are the normalizer's problem, not guessed here.
    async fn resolve_location(&self, description: &str) -> ParcelaResult<Vec<LocationNode>>;

    async fn get_location(&self, id: LocationId) -> ParcelaResult<Option<LocationNode>>;

    async fn get_parcel(&self, id: ParcelId) -> ParcelaResult<Option<Parcel>>;

    /// Bulk fetch; unknown ids are silently skipped.
    async fn get_parcels(&self, ids: &[ParcelId]) -> ParcelaResult<Vec<Parcel>>;
}
