//! Property tests for fusion determinism, the graph gate, and proximity
//! score bounds.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use parcela_core::config::ProximityConfig;
use parcela_core::errors::ParcelaResult;
use parcela_core::models::ProximityWeights;
use parcela_core::parcel::{AdjacencyEdge, ParcelId, Poi, PoiType, ProximityEdge};
use parcela_core::traits::ProximityStore;
use parcela_retrieval::fusion::{fuse, FusionInputs};
use parcela_retrieval::proximity::{edge_score, score_parcels};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_id_set(max: usize) -> impl Strategy<Value = BTreeSet<ParcelId>> {
    proptest::collection::btree_set((0u64..200).prop_map(ParcelId), 0..max)
}

/// A ranking: unique ids paired with similarities in descending order.
fn arb_ranking() -> impl Strategy<Value = Vec<(ParcelId, f64)>> {
    proptest::collection::btree_set(0u64..200, 0..40)
        .prop_flat_map(|ids| {
            let n = ids.len();
            (
                Just(ids),
                proptest::collection::vec(0.0f64..1.0, n),
            )
        })
        .prop_map(|(ids, mut sims)| {
            sims.sort_by(|a, b| b.total_cmp(a));
            ids.into_iter().map(ParcelId).zip(sims).collect()
        })
}

/// A graph id set together with a proximity composite for each member.
fn arb_graph_with_proximity(
) -> impl Strategy<Value = (BTreeSet<ParcelId>, HashMap<ParcelId, f64>)> {
    arb_id_set(40).prop_flat_map(|ids| {
        let members: Vec<ParcelId> = ids.iter().copied().collect();
        let scores = proptest::collection::vec(0.0f64..=1.0, members.len());
        (
            Just(ids),
            scores.prop_map(move |values| {
                members.iter().copied().zip(values).collect::<HashMap<_, _>>()
            }),
        )
    })
}

// ---------------------------------------------------------------------------
// Fusion properties
// ---------------------------------------------------------------------------

proptest! {
    /// The graph source is a strict AND: nothing outside it ever ranks.
    #[test]
    fn graph_gate_is_strict(
        graph in arb_id_set(40),
        semantic in arb_ranking(),
        structural in arb_ranking(),
    ) {
        let proximity = HashMap::new();
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: Some(&structural),
        };
        let results = fuse(&inputs, 60);
        prop_assert!(results.iter().all(|r| graph.contains(&r.parcel)));
        prop_assert_eq!(results.len(), graph.len());
    }

    /// Identical inputs fuse to the identical ordering.
    #[test]
    fn fusion_is_deterministic(
        graph in arb_id_set(40),
        semantic in arb_ranking(),
    ) {
        let proximity = HashMap::new();
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: None,
        };
        let first = fuse(&inputs, 60);
        let second = fuse(&inputs, 60);
        prop_assert_eq!(
            first.iter().map(|r| r.parcel).collect::<Vec<_>>(),
            second.iter().map(|r| r.parcel).collect::<Vec<_>>()
        );
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.score, b.score);
        }
    }

    /// With only the graph branch, the fused score IS the proximity
    /// composite and ordering follows it, ties by ascending id.
    #[test]
    fn graph_only_reduces_to_proximity_ordering(
        (graph, proximity) in arb_graph_with_proximity(),
    ) {
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: None,
            structural: None,
        };
        let results = fuse(&inputs, 60);
        for result in &results {
            prop_assert_eq!(result.score, result.breakdown.proximity);
        }
        for pair in results.windows(2) {
            let ordered = pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].parcel < pair[1].parcel);
            prop_assert!(ordered);
        }
    }

    /// Scores stay in [0, 1] for any distance/threshold combination.
    #[test]
    fn edge_score_is_bounded(distance in 0.0f64..100_000.0, threshold in 0.0f64..10_000.0) {
        let score = edge_score(distance, threshold);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!(score.is_finite());
    }
}

// ---------------------------------------------------------------------------
// Composite scoring against a stub store
// ---------------------------------------------------------------------------

/// Fixed-edge stub: forest edges for some parcels, school edges for all.
struct StubProximityStore;

impl ProximityStore for StubProximityStore {
    fn edges_within_threshold(
        &self,
        ids: &BTreeSet<ParcelId>,
        poi_type: PoiType,
    ) -> ParcelaResult<Vec<ProximityEdge>> {
        let edge = |parcel: u64, distance_m: f64| ProximityEdge {
            parcel: ParcelId(parcel),
            poi: 1,
            poi_type,
            distance_m,
        };
        Ok(match poi_type {
            // 1: 500 m of 2 km → 0.75; parcel 2 has no forest edge.
            PoiType::Forest => vec![edge(1, 500.0)],
            // Both parcels 150 m from a school (1.5 km threshold → 0.9).
            PoiType::School => vec![edge(1, 150.0), edge(2, 150.0)],
            _ => Vec::new(),
        }
        .into_iter()
        .filter(|e| ids.contains(&e.parcel))
        .collect())
    }

    fn find_poi(&self, _name: &str) -> ParcelaResult<Vec<Poi>> {
        Ok(Vec::new())
    }

    fn adjacent_to(&self, _id: ParcelId) -> ParcelaResult<Vec<AdjacencyEdge>> {
        Ok(Vec::new())
    }
}

#[test]
fn composite_averages_only_nonzero_weight_types() {
    let ids: BTreeSet<ParcelId> = [ParcelId(1), ParcelId(2)].into();
    let weights = ProximityWeights::from_explicit(
        [(PoiType::Forest, 0.8_f32), (PoiType::School, 0.0)].into(),
    );
    let composites =
        score_parcels(&StubProximityStore, &ids, &weights, &ProximityConfig::default())
            .expect("composites");

    // School edges exist for both parcels but the weight is zero, so they
    // must not contribute: parcel 1 scores its forest edge alone, parcel 2
    // scores 0.0 (present, never null).
    assert!((composites[&ParcelId(1)] - 0.75).abs() < 1e-9);
    assert_eq!(composites[&ParcelId(2)], 0.0);
}

#[test]
fn all_zero_weights_fall_back_to_the_default_table() {
    let ids: BTreeSet<ParcelId> = [ParcelId(1)].into();
    let weights = ProximityWeights::from_explicit([(PoiType::Forest, 0.0_f32)].into());
    let composites =
        score_parcels(&StubProximityStore, &ids, &weights, &ProximityConfig::default())
            .expect("composites");

    // Under the neutral table every type weighs the same; parcel 1 has a
    // forest edge (0.75) and a school edge (0.9) over six types.
    let expected = (0.75 + 0.9) / 6.0;
    assert!((composites[&ParcelId(1)] - expected).abs() < 1e-9);
}

#[test]
fn missing_edges_score_zero_not_null() {
    let ids: BTreeSet<ParcelId> = [ParcelId(7)].into();
    let weights =
        ProximityWeights::from_explicit([(PoiType::Forest, 1.0_f32)].into());
    let composites =
        score_parcels(&StubProximityStore, &ids, &weights, &ProximityConfig::default())
            .expect("composites");
    assert_eq!(composites[&ParcelId(7)], 0.0);
    assert!(composites[&ParcelId(7)].is_finite());
}
