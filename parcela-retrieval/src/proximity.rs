//! Distance→score conversion and the weighted proximity composite.

use std::collections::{BTreeSet, HashMap};

use parcela_core::config::ProximityConfig;
use parcela_core::errors::ParcelaResult;
use parcela_core::models::ProximityWeights;
use parcela_core::parcel::{ParcelId, PoiType};
use parcela_core::traits::ProximityStore;

/// Convert an edge distance to a bounded score: `max(0, 1 - d/t)`.
/// Always in [0, 1]; a missing edge scores 0.0 by construction.
pub fn edge_score(distance_m: f64, threshold_m: f64) -> f64 {
    if threshold_m <= 0.0 {
        return 0.0;
    }
    (1.0 - distance_m / threshold_m).clamp(0.0, 1.0)
}

/// Weighted proximity composite for every candidate parcel.
///
/// Averages only over POI types with nonzero weight; a caller that zeroes
/// every weight gets the neutral default table instead, so the composite
/// is always defined. Every candidate receives an entry — parcels with no
/// in-threshold edge of an active type contribute 0.0 for that type.
pub fn score_parcels(
    store: &dyn ProximityStore,
    ids: &BTreeSet<ParcelId>,
    weights: &ProximityWeights,
    config: &ProximityConfig,
) -> ParcelaResult<HashMap<ParcelId, f64>> {
    let active: Vec<(PoiType, f32)> = {
        let explicit: Vec<(PoiType, f32)> = weights.nonzero().collect();
        if explicit.is_empty() {
            ProximityWeights::default_table().nonzero().collect()
        } else {
            explicit
        }
    };

    // Best (nearest) edge per parcel per active type.
    let mut per_type: HashMap<ParcelId, HashMap<PoiType, f64>> = HashMap::new();
    for (poi_type, _) in &active {
        let threshold = config.threshold_m(*poi_type);
        for edge in store.edges_within_threshold(ids, *poi_type)? {
            let score = edge_score(edge.distance_m, threshold);
            let slot = per_type
                .entry(edge.parcel)
                .or_default()
                .entry(*poi_type)
                .or_insert(0.0);
            if score > *slot {
                *slot = score;
            }
        }
    }

    let weight_sum: f64 = active.iter().map(|(_, w)| *w as f64).sum();
    let composites = ids
        .iter()
        .map(|id| {
            let scores = per_type.get(id);
            let weighted: f64 = active
                .iter()
                .map(|(poi_type, weight)| {
                    let score = scores
                        .and_then(|s| s.get(poi_type))
                        .copied()
                        .unwrap_or(0.0);
                    *weight as f64 * score
                })
                .sum();
            (*id, weighted / weight_sum)
        })
        .collect();
    Ok(composites)
}
