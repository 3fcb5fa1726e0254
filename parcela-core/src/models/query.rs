//! Preference query — the loose inbound shape and its canonical form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::defaults::DEFAULT_PROXIMITY_WEIGHT;
use crate::parcel::{
    BuildStatus, LocationId, OwnershipType, ParcelId, PoiType, SizeClass,
};

/// Identifier of the caller owning credit balance and reveal sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(pub String);

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one reveal session. Re-reveals within a session are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The preference object as received from the agent collaborator.
/// Nothing here is trusted; the normalizer validates every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPreference {
    /// Free-form location description, e.g. "Osowa" or "Gdańsk".
    pub location: String,
    /// Requested area range `[min, max]` in m².
    pub area_m2: [f64; 2],
    #[serde(default)]
    pub ownership_type: Option<String>,
    #[serde(default)]
    pub build_status: Option<String>,
    #[serde(default)]
    pub size_category: Option<String>,
    /// Require residential eligibility under the zoning plan.
    #[serde(default)]
    pub pog_residential: Option<bool>,
    /// Named proximity weights in [0, 1], keyed by POI type label.
    #[serde(default)]
    pub proximity_weights: BTreeMap<String, f32>,
    #[serde(default)]
    pub free_text: Option<String>,
    #[serde(default)]
    pub similar_to_parcel_id: Option<u64>,
    pub caller_id: String,
}

/// Canonical weight vector over all known POI types.
///
/// Callers that provide any explicit weight get 0.0 for the types they
/// left out; callers that provide none get the neutral default table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityWeights(BTreeMap<PoiType, f32>);

impl ProximityWeights {
    /// The documented default table: every POI type at the neutral weight.
    pub fn default_table() -> Self {
        Self(
            PoiType::ALL
                .iter()
                .map(|poi| (*poi, DEFAULT_PROXIMITY_WEIGHT))
                .collect(),
        )
    }

    /// Build from explicit per-type weights; unnamed types weigh 0.0.
    pub fn from_explicit(explicit: BTreeMap<PoiType, f32>) -> Self {
        Self(
            PoiType::ALL
                .iter()
                .map(|poi| (*poi, explicit.get(poi).copied().unwrap_or(0.0)))
                .collect(),
        )
    }

    pub fn get(&self, poi: PoiType) -> f32 {
        self.0.get(&poi).copied().unwrap_or(0.0)
    }

    /// POI types with a nonzero weight, in fixed order.
    pub fn nonzero(&self) -> impl Iterator<Item = (PoiType, f32)> + '_ {
        self.0
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(poi, w)| (*poi, *w))
    }

    /// True when every type carries the same weight, as in the default
    /// table — no single POI type is singled out.
    pub fn is_uniform(&self) -> bool {
        let mut values = self.0.values();
        match values.next() {
            Some(first) => values.all(|w| w == first),
            None => true,
        }
    }

    /// The nonzero type with the highest weight, ties by fixed type order.
    pub fn dominant(&self) -> Option<PoiType> {
        self.nonzero()
            .max_by(|(pa, wa), (pb, wb)| {
                wa.total_cmp(wb).then_with(|| pb.cmp(pa))
            })
            .map(|(poi, _)| poi)
    }
}

impl Default for ProximityWeights {
    fn default() -> Self {
        Self::default_table()
    }
}

/// Canonical predicates handed to the graph engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFilters {
    /// Resolved location scope: a city or a single district.
    pub scope: LocationId,
    /// Validated `min <= max` area range in m².
    pub area_m2: (f64, f64),
    pub ownership: Option<OwnershipType>,
    pub build_status: Option<BuildStatus>,
    pub size_class: Option<SizeClass>,
    /// When true, only parcels in residential-eligible zoning zones match.
    pub require_residential: bool,
}

/// A fully validated preference query. Request-scoped.
#[derive(Debug, Clone)]
pub struct PreferenceQuery {
    pub request_id: Uuid,
    pub caller: CallerId,
    pub filters: CanonicalFilters,
    pub weights: ProximityWeights,
    /// Semantic embedding of the free text, when supplied and embeddable.
    pub text_vector: Option<Vec<f32>>,
    /// Seed parcel for structural similarity, validated to exist.
    pub seed_parcel: Option<ParcelId>,
}
