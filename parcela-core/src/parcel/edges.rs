//! POI proximity and parcel adjacency edges.
//!
//! Both edge kinds are produced by the ETL collaborator and are read-only
//! inside a snapshot generation. Proximity edges are materialized only
//! within the per-POI-type distance threshold, so absence of an edge means
//! "farther than the threshold", never "unknown".

use serde::{Deserialize, Serialize};

use super::base::ParcelId;

/// Point-of-interest category used for proximity scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    School,
    BusStop,
    Shop,
    Forest,
    Water,
    Road,
}

impl PoiType {
    /// All POI types, in the fixed order used for weight vectors.
    pub const ALL: [PoiType; 6] = [
        PoiType::School,
        PoiType::BusStop,
        PoiType::Shop,
        PoiType::Forest,
        PoiType::Water,
        PoiType::Road,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::School => "school",
            Self::BusStop => "bus_stop",
            Self::Shop => "shop",
            Self::Forest => "forest",
            Self::Water => "water",
            Self::Road => "road",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "school" => Some(Self::School),
            "bus_stop" => Some(Self::BusStop),
            "shop" => Some(Self::Shop),
            "forest" => Some(Self::Forest),
            "water" => Some(Self::Water),
            "road" => Some(Self::Road),
            _ => None,
        }
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: u64,
    pub name: String,
    pub poi_type: PoiType,
}

/// Parcel → POI distance edge, materialized only within the POI type's
/// threshold. `distance_m` never exceeds that threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityEdge {
    pub parcel: ParcelId,
    pub poi: u64,
    pub poi_type: PoiType,
    pub distance_m: f64,
}

/// Undirected parcel↔parcel border edge, unique per unordered pair.
/// Stored with `a < b`; lookups surface the edge from either endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEdge {
    pub a: ParcelId,
    pub b: ParcelId,
    pub shared_border_m: f64,
}

impl AdjacencyEdge {
    /// The endpoint opposite to `id`, or `None` if `id` is not on the edge.
    pub fn other(&self, id: ParcelId) -> Option<ParcelId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}
