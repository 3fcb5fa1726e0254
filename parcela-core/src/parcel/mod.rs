//! Parcel entity and the enumerations hanging off it.

pub mod base;
pub mod category;
pub mod edges;
pub mod location;

pub use base::{Centroid, CompositeScores, Parcel, ParcelId, ZoningInfo};
pub use category::{BuildStatus, OwnershipType, SizeClass};
pub use edges::{AdjacencyEdge, Poi, PoiType, ProximityEdge};
pub use location::{LocationId, LocationLevel, LocationNode};
