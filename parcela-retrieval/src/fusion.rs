//! Reciprocal Rank Fusion with a hard graph gate.
//!
//! Each ranked source contributes `1 / (rank + k)` to a parcel's score.
//! The proximity composite is already a bounded score, not a ranking, so
//! it is added directly — which makes the graph-only case reduce exactly
//! to the proximity composite. The graph source is an AND gate: parcels
//! absent from it are excluded whatever the other signals say.

use std::collections::{BTreeSet, HashMap};

use parcela_core::models::{RankedResult, SourceBreakdown};
use parcela_core::parcel::ParcelId;

/// Per-source inputs to one fusion pass. `None` means the branch was
/// skipped (not attempted, or degraded away) — distinct from an empty
/// result, which gates everything out.
pub struct FusionInputs<'a> {
    /// The graph-filtered id set. When present it is the candidate
    /// universe; when skipped, fusion runs over the vector hits alone.
    pub graph: Option<&'a BTreeSet<ParcelId>>,
    /// Proximity composite per candidate, each in [0, 1].
    pub proximity: &'a HashMap<ParcelId, f64>,
    /// Semantic ranking, similarity descending.
    pub semantic: Option<&'a [(ParcelId, f64)]>,
    /// Structural ranking, similarity descending.
    pub structural: Option<&'a [(ParcelId, f64)]>,
}

/// Fuse all present sources into one deterministic ordering.
///
/// Ties break by higher proximity composite, then ascending parcel id.
pub fn fuse(inputs: &FusionInputs<'_>, rrf_k: u32) -> Vec<RankedResult> {
    let candidates: BTreeSet<ParcelId> = match inputs.graph {
        Some(ids) => ids.clone(),
        None => {
            let mut union = BTreeSet::new();
            for list in [inputs.semantic, inputs.structural].into_iter().flatten() {
                union.extend(list.iter().map(|(id, _)| *id));
            }
            union
        }
    };

    let semantic_rrf = rrf_contributions(inputs.semantic, &candidates, rrf_k);
    let structural_rrf = rrf_contributions(inputs.structural, &candidates, rrf_k);

    let mut results: Vec<RankedResult> = candidates
        .iter()
        .map(|id| {
            let breakdown = SourceBreakdown {
                graph: inputs.graph.map_or(false, |ids| ids.contains(id)),
                proximity: inputs.proximity.get(id).copied().unwrap_or(0.0),
                semantic: semantic_rrf.get(id).copied().unwrap_or(0.0),
                structural: structural_rrf.get(id).copied().unwrap_or(0.0),
            };
            RankedResult {
                parcel: *id,
                score: breakdown.total(),
                breakdown,
                highlights: Vec::new(),
                summary: String::new(),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.breakdown.proximity.total_cmp(&a.breakdown.proximity))
            .then_with(|| a.parcel.cmp(&b.parcel))
    });
    results
}

/// RRF contribution of one ranked list, restricted to the candidate set.
/// Ranks are 1-based over the list as delivered by the index.
fn rrf_contributions(
    list: Option<&[(ParcelId, f64)]>,
    candidates: &BTreeSet<ParcelId>,
    rrf_k: u32,
) -> HashMap<ParcelId, f64> {
    let Some(list) = list else {
        return HashMap::new();
    };
    list.iter()
        .enumerate()
        .filter(|(_, (id, _))| candidates.contains(id))
        .map(|(rank0, (id, _))| (*id, 1.0 / (rank0 as f64 + 1.0 + rrf_k as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[u64]) -> BTreeSet<ParcelId> {
        list.iter().map(|id| ParcelId(*id)).collect()
    }

    #[test]
    fn graph_only_reduces_to_proximity_composite() {
        let graph = ids(&[1, 2, 3]);
        let proximity: HashMap<ParcelId, f64> =
            [(ParcelId(1), 0.2), (ParcelId(2), 0.8), (ParcelId(3), 0.5)].into();
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: None,
            structural: None,
        };

        let results = fuse(&inputs, 60);
        assert_eq!(
            results.iter().map(|r| r.parcel).collect::<Vec<_>>(),
            vec![ParcelId(2), ParcelId(3), ParcelId(1)]
        );
        for result in &results {
            assert_eq!(result.score, result.breakdown.proximity);
        }
    }

    #[test]
    fn graph_gate_excludes_vector_only_hits() {
        let graph = ids(&[1]);
        let proximity: HashMap<ParcelId, f64> = [(ParcelId(1), 0.0)].into();
        // Parcel 9 tops both vector lists but is outside the gate.
        let semantic = vec![(ParcelId(9), 0.99), (ParcelId(1), 0.4)];
        let structural = vec![(ParcelId(9), 0.98)];
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: Some(&structural),
        };

        let results = fuse(&inputs, 60);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].parcel, ParcelId(1));
        // Rank 2 in the semantic list: 1 / (2 + 60).
        assert!((results[0].breakdown.semantic - 1.0 / 62.0).abs() < 1e-12);
    }

    #[test]
    fn empty_graph_set_gates_everything_out() {
        let graph = BTreeSet::new();
        let proximity = HashMap::new();
        let semantic = vec![(ParcelId(5), 0.9)];
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: None,
        };
        assert!(fuse(&inputs, 60).is_empty());
    }

    #[test]
    fn skipped_graph_branch_fuses_vector_hits_ungated() {
        let proximity = HashMap::new();
        let semantic = vec![(ParcelId(5), 0.9), (ParcelId(6), 0.8)];
        let inputs = FusionInputs {
            graph: None,
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: None,
        };
        let results = fuse(&inputs, 60);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].parcel, ParcelId(5));
        assert!(!results[0].breakdown.graph);
    }

    #[test]
    fn score_ties_break_by_proximity_then_id() {
        let graph = ids(&[7, 8, 9]);
        // All three tie on score and proximity, so ascending id decides.
        let proximity: HashMap<ParcelId, f64> =
            [(ParcelId(7), 0.5), (ParcelId(8), 0.5), (ParcelId(9), 0.5)].into();
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: None,
            structural: None,
        };
        let results = fuse(&inputs, 60);
        assert_eq!(
            results.iter().map(|r| r.parcel).collect::<Vec<_>>(),
            vec![ParcelId(7), ParcelId(8), ParcelId(9)]
        );
    }

    #[test]
    fn rrf_constant_is_configurable() {
        let graph = ids(&[1]);
        let proximity = HashMap::new();
        let semantic = vec![(ParcelId(1), 0.9)];
        let inputs = FusionInputs {
            graph: Some(&graph),
            proximity: &proximity,
            semantic: Some(&semantic),
            structural: None,
        };
        let results = fuse(&inputs, 10);
        assert!((results[0].score - 1.0 / 11.0).abs() < 1e-12);
    }
}
