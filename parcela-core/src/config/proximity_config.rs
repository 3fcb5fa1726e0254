use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults::thresholds_m;
use crate::parcel::PoiType;

/// Proximity scoring configuration.
///
/// Thresholds mirror the ETL materialization rule: an edge of type `t`
/// exists only when `distance_m <= threshold_m(t)`, so `1 - d/t` is
/// always in [0, 1] for stored edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Per-POI-type thresholds in meters. Missing types use the built-in
    /// defaults.
    pub thresholds_m: BTreeMap<PoiType, f64>,
}

impl ProximityConfig {
    /// Threshold for one POI type.
    pub fn threshold_m(&self, poi: PoiType) -> f64 {
        self.thresholds_m
            .get(&poi)
            .copied()
            .unwrap_or_else(|| builtin_threshold(poi))
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            thresholds_m: PoiType::ALL
                .iter()
                .map(|poi| (*poi, builtin_threshold(*poi)))
                .collect(),
        }
    }
}

fn builtin_threshold(poi: PoiType) -> f64 {
    match poi {
        PoiType::School => thresholds_m::SCHOOL,
        PoiType::BusStop => thresholds_m::BUS_STOP,
        PoiType::Shop => thresholds_m::SHOP,
        PoiType::Forest => thresholds_m::FOREST,
        PoiType::Water => thresholds_m::WATER,
        PoiType::Road => thresholds_m::ROAD,
    }
}
