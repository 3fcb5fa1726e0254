use std::collections::BTreeSet;

use crate::errors::ParcelaResult;
use crate::parcel::{AdjacencyEdge, ParcelId, Poi, PoiType, ProximityEdge};

/// Read-only precomputed spatial edges. All lookups are in-process and
/// non-suspending; the snapshot is local per generation.
pub trait ProximityStore: Send + Sync {
    /// In-threshold proximity edges of one POI type for the given parcels.
    /// Parcels without an edge simply do not appear; scoring treats them
    /// as 0.0, never null.
    fn edges_within_threshold(
        &self,
        ids: &BTreeSet<ParcelId>,
        poi_type: PoiType,
    ) -> ParcelaResult<Vec<ProximityEdge>>;

    /// Fuzzy named-POI lookup, case- and diacritic-insensitive.
    fn find_poi(&self, name: &str) -> ParcelaResult<Vec<Poi>>;

    /// Adjacency edges touching the given parcel, with shared border
    /// lengths, ordered by neighbor id.
    fn adjacent_to(&self, id: ParcelId) -> ParcelaResult<Vec<AdjacencyEdge>>;
}
