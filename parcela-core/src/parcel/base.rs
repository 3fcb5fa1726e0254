use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::{BuildStatus, OwnershipType, SizeClass};
use super::location::LocationId;

/// Identifier of a cadastral parcel. Ordered so result lists can break
/// ties deterministically by ascending id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParcelId(pub u64);

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Parcel centroid in WGS84. Never exposed through the free teaser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// Precomputed environment scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CompositeScores {
    pub quietness: f32,
    pub nature: f32,
    pub accessibility: f32,
}

/// Zoning assignment of a parcel, resolved against the zoning plan at
/// snapshot build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoningInfo {
    /// Plan zone code, e.g. "MN.12".
    pub zone_code: String,
    /// Whether the zone permits residential development.
    pub residential_eligible: bool,
}

/// A single cadastral land unit — the primary retrievable entity.
///
/// Single-valued category axes (ownership, build status, size class) are
/// tagged attributes rather than graph edges; only genuinely relational
/// data (location hierarchy, zoning, POI proximity, adjacency) lives in
/// edge tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    /// Surface area in square meters.
    pub area_m2: f64,
    pub centroid: Centroid,
    pub ownership: OwnershipType,
    pub build_status: BuildStatus,
    pub size_class: SizeClass,
    /// Absent for parcels outside any adopted zoning plan.
    pub zoning: Option<ZoningInfo>,
    /// District the parcel is located in.
    pub district: LocationId,
    pub scores: CompositeScores,
}

impl Parcel {
    /// Area rounded to the nearest 100 m², safe for the free teaser.
    pub fn rounded_area_m2(&self) -> u64 {
        ((self.area_m2 / 100.0).round() * 100.0).max(0.0) as u64
    }
}

/// Identity equality: a parcel's identity is its cadastral id, not its
/// attribute values.
impl PartialEq for Parcel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parcel_id_display() {
        assert_eq!(ParcelId(42).to_string(), "P42");
    }

    #[test]
    fn rounded_area_rounds_to_hundreds() {
        let mut parcel = test_parcel(1, 1_849.0);
        assert_eq!(parcel.rounded_area_m2(), 1_800);
        parcel.area_m2 = 1_850.0;
        assert_eq!(parcel.rounded_area_m2(), 1_900);
    }

    fn test_parcel(id: u64, area_m2: f64) -> Parcel {
        Parcel {
            id: ParcelId(id),
            area_m2,
            centroid: Centroid { lat: 54.42, lon: 18.47 },
            ownership: OwnershipType::Private,
            build_status: BuildStatus::Vacant,
            size_class: SizeClass::Medium,
            zoning: None,
            district: LocationId(1),
            scores: CompositeScores::default(),
        }
    }
}
