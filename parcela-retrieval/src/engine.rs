//! RetrievalEngine: orchestrates the full hybrid pipeline.
//!
//! normalize → {graph, semantic, structural} concurrently → proximity
//! composites → RRF fusion under the graph gate → explanations.
//!
//! The graph and vector branches each run under their own timeout; a
//! timed-out or failed branch degrades to "skipped". Only when every
//! attempted branch is skipped does the request fail with
//! `RetrievalUnavailable`. Dropping the returned future cancels all
//! in-flight branch calls; nothing is cached per request.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use parcela_core::config::ParcelaConfig;
use parcela_core::errors::{ParcelaError, ParcelaResult};
use parcela_core::models::{
    Branch, CandidateDetail, GraphMatch, PreferenceQuery, RankedOutcome, RawPreference,
};
use parcela_core::parcel::ParcelId;
use parcela_core::traits::{EmbeddingProvider, SnapshotHandle, SnapshotProvider};
use parcela_vector::{DualVectorIndex, StructuralSeed};

use crate::explain::ExplanationBuilder;
use crate::fusion::{self, FusionInputs};
use crate::normalizer::PreferenceNormalizer;
use crate::proximity;

/// Outcome of one branch: produced, skipped after failure, or never
/// attempted (no input for it).
enum BranchOutcome<T> {
    Produced(T),
    Skipped,
    NotAttempted,
}

impl<T> BranchOutcome<T> {
    fn attempted(&self) -> bool {
        !matches!(self, Self::NotAttempted)
    }

    fn skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    fn produced(&self) -> Option<&T> {
        match self {
            Self::Produced(value) => Some(value),
            _ => None,
        }
    }
}

/// The stateless-per-request retrieval pipeline.
pub struct RetrievalEngine {
    snapshots: Arc<dyn SnapshotProvider>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    config: ParcelaConfig,
}

impl RetrievalEngine {
    pub fn new(
        snapshots: Arc<dyn SnapshotProvider>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        config: ParcelaConfig,
    ) -> Self {
        Self {
            snapshots,
            embedder,
            config,
        }
    }

    /// Run the full pipeline for one raw preference.
    pub async fn search(&self, raw: &RawPreference) -> ParcelaResult<RankedOutcome> {
        // Pin one generation for the whole request; a concurrent reload
        // swaps the provider's handle without touching this one.
        let handle = self.snapshots.current();

        let normalizer =
            PreferenceNormalizer::new(handle.graph.clone(), self.embedder.clone(), &self.config);
        let query = normalizer.normalize(raw).await?;
        debug!(request = %query.request_id, generation = %handle.generation, "preference normalized");

        let (graph, semantic, structural) = self.run_branches(&handle, &query).await?;

        let mut skipped_branches = Vec::new();
        if graph.skipped() {
            skipped_branches.push(Branch::Graph);
        }
        if semantic.skipped() {
            skipped_branches.push(Branch::Semantic);
        }
        if structural.skipped() {
            skipped_branches.push(Branch::Structural);
        }

        let attempted =
            [graph.attempted(), semantic.attempted(), structural.attempted()]
                .iter()
                .filter(|a| **a)
                .count();
        if attempted == skipped_branches.len() {
            warn!(request = %query.request_id, "every branch failed or timed out");
            return Err(ParcelaError::RetrievalUnavailable);
        }

        let graph_ids = graph.produced().map(|m: &GraphMatch| &m.ids);
        let candidates: BTreeSet<ParcelId> = match graph_ids {
            Some(ids) => ids.clone(),
            None => {
                let mut union = BTreeSet::new();
                for list in [semantic.produced(), structural.produced()].into_iter().flatten() {
                    union.extend(list.iter().map(|(id, _)| *id));
                }
                union
            }
        };

        // Proximity scoring and fusion are in-process and non-suspending.
        let composites = proximity::score_parcels(
            handle.proximity.as_ref(),
            &candidates,
            &query.weights,
            &self.config.proximity,
        )?;

        let inputs = FusionInputs {
            graph: graph_ids,
            proximity: &composites,
            semantic: semantic.produced().map(Vec::as_slice),
            structural: structural.produced().map(Vec::as_slice),
        };
        let mut results = fusion::fuse(&inputs, self.config.retrieval.rrf_k);

        let page = self.explain_page(&handle, &query, &mut results).await?;

        let outcome = RankedOutcome {
            request_id: query.request_id,
            generation: handle.generation.clone(),
            total_count: candidates.len(),
            degraded: !skipped_branches.is_empty(),
            skipped_branches,
            by_sibling_scope: graph
                .produced()
                .map(|m| m.by_sibling_scope.clone())
                .unwrap_or_default(),
            results,
            page,
        };
        info!(
            request = %outcome.request_id,
            total = outcome.total_count,
            degraded = outcome.degraded,
            "search complete"
        );
        Ok(outcome)
    }

    /// Count-only mode: normalize, then one predicate count. No row
    /// materialization, no vector branches.
    pub async fn count(&self, raw: &RawPreference) -> ParcelaResult<usize> {
        let handle = self.snapshots.current();
        let normalizer =
            PreferenceNormalizer::new(handle.graph.clone(), self.embedder.clone(), &self.config);
        let query = normalizer.normalize(raw).await?;
        handle.graph.count_matching(&query.filters).await
    }

    /// Dispatch the graph branch and both vector branches concurrently,
    /// each under its own timeout.
    async fn run_branches(
        &self,
        handle: &SnapshotHandle,
        query: &PreferenceQuery,
    ) -> ParcelaResult<(
        BranchOutcome<GraphMatch>,
        BranchOutcome<Vec<(ParcelId, f64)>>,
        BranchOutcome<Vec<(ParcelId, f64)>>,
    )> {
        let budget = Duration::from_millis(self.config.retrieval.branch_timeout_ms);
        let vector_k = self.config.retrieval.vector_k;
        let dual = DualVectorIndex::new(
            handle.semantic.clone(),
            handle.structural.clone(),
            self.config.vector.clone(),
        )?;

        let graph_branch = timeout(budget, handle.graph.filter_parcels(&query.filters));
        let semantic_branch = async {
            match &query.text_vector {
                Some(vector) => {
                    Some(timeout(budget, dual.query_semantic(vector, vector_k, None)).await)
                }
                None => None,
            }
        };
        let structural_branch = async {
            match query.seed_parcel {
                Some(seed) => Some(
                    timeout(
                        budget,
                        dual.query_structural(StructuralSeed::Parcel(seed), vector_k, None),
                    )
                    .await,
                ),
                None => None,
            }
        };

        let (graph_res, semantic_res, structural_res) =
            tokio::join!(graph_branch, semantic_branch, structural_branch);

        Ok((
            settle_required(graph_res, Branch::Graph),
            settle_optional(semantic_res, Branch::Semantic),
            settle_optional(structural_res, Branch::Structural),
        ))
    }

    /// Fetch page parcels and fill highlights for them.
    async fn explain_page(
        &self,
        handle: &SnapshotHandle,
        query: &PreferenceQuery,
        results: &mut [parcela_core::models::RankedResult],
    ) -> ParcelaResult<Vec<CandidateDetail>> {
        let page_size = self.config.retrieval.page_size.min(results.len());
        let page_ids: Vec<ParcelId> = results[..page_size].iter().map(|r| r.parcel).collect();
        let parcels = handle.graph.get_parcels(&page_ids).await?;

        let builder = ExplanationBuilder::new(self.config.retrieval.min_salience);
        let mut page = Vec::with_capacity(parcels.len());
        for result in results[..page_size].iter_mut() {
            let Some(parcel) = parcels.iter().find(|p| p.id == result.parcel) else {
                // Vector hit unknown to the graph store (skipped-graph
                // degradation); it stays id-only.
                continue;
            };
            let explanation = builder.build(parcel, &result.breakdown, &query.weights);
            result.highlights = explanation.highlights.clone();
            result.summary = explanation.summary.clone();

            let district_name = handle
                .graph
                .get_location(parcel.district)
                .await?
                .map(|node| node.name)
                .unwrap_or_else(|| "unknown".to_string());
            page.push(CandidateDetail {
                parcel: parcel.clone(),
                district_name,
                result: result.clone(),
            });
        }
        Ok(page)
    }
}

fn settle_required<T>(
    result: Result<ParcelaResult<T>, tokio::time::error::Elapsed>,
    branch: Branch,
) -> BranchOutcome<T> {
    match result {
        Ok(Ok(value)) => BranchOutcome::Produced(value),
        Ok(Err(error)) => {
            warn!(branch = branch.label(), %error, "branch failed, degrading to skipped");
            BranchOutcome::Skipped
        }
        Err(_) => {
            warn!(branch = branch.label(), "branch timed out, degrading to skipped");
            BranchOutcome::Skipped
        }
    }
}

fn settle_optional<T>(
    result: Option<Result<ParcelaResult<T>, tokio::time::error::Elapsed>>,
    branch: Branch,
) -> BranchOutcome<T> {
    match result {
        None => BranchOutcome::NotAttempted,
        Some(settled) => settle_required(settled, branch),
    }
}
