//! Ranked output and the response envelope.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::snapshot::GenerationId;
use crate::parcel::{Parcel, ParcelId};

/// One retrieval branch of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Graph,
    Semantic,
    Structural,
}

impl Branch {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Semantic => "semantic",
            Self::Structural => "structural",
        }
    }
}

/// Result of the graph predicate engine: the matching id set plus a
/// diagnostic breakdown by the next-coarser location level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphMatch {
    /// Matching parcel ids. Empty is a normal result, not an error.
    pub ids: BTreeSet<ParcelId>,
    /// (district name, matching count) across the sibling districts of the
    /// resolved scope. Drives "too narrow / too broad" feedback upstream.
    pub by_sibling_scope: Vec<(String, usize)>,
}

/// Per-source contribution of one fused result.
///
/// `semantic` and `structural` carry the reciprocal-rank contribution of
/// the respective vector ranking; `proximity` carries the bounded
/// composite score; `graph` records gate membership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceBreakdown {
    pub graph: bool,
    pub proximity: f64,
    pub semantic: f64,
    pub structural: f64,
}

impl SourceBreakdown {
    /// Sum of all score contributions (gate membership contributes none).
    pub fn total(&self) -> f64 {
        self.proximity + self.semantic + self.structural
    }
}

/// One entry of the fused, ordered candidate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub parcel: ParcelId,
    pub score: f64,
    pub breakdown: SourceBreakdown,
    /// Data-grounded highlight strings, at most four, ordered by salience.
    pub highlights: Vec<String>,
    /// One-line explanation of what drove the rank.
    pub summary: String,
}

/// Free, reduced-detail representation of one ranked parcel. Never carries
/// the parcel id or the exact centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeaserEntry {
    /// District-level location label, e.g. "Osowa".
    pub approx_location: String,
    /// Size class with the area rounded to the nearest 100 m².
    pub area_class: String,
    pub highlights: Vec<String>,
}

/// Full detail for one page entry: the parcel, its district name, and
/// its ranked result. Input to teaser building and reveal.
#[derive(Debug, Clone)]
pub struct CandidateDetail {
    pub parcel: Parcel,
    pub district_name: String,
    pub result: RankedResult,
}

/// The fused product of one search request, handed to the disclosure
/// policy. Request-scoped.
#[derive(Debug, Clone)]
pub struct RankedOutcome {
    pub request_id: Uuid,
    pub generation: GenerationId,
    /// Size of the gated candidate set (count mode and teaser header).
    pub total_count: usize,
    /// The full fused ordering. Highlights are filled for page entries.
    pub results: Vec<RankedResult>,
    /// Top-of-list details for teaser building and page reveals.
    pub page: Vec<CandidateDetail>,
    pub degraded: bool,
    pub skipped_branches: Vec<Branch>,
    /// Sibling-scope diagnostic from the graph engine, when it ran.
    pub by_sibling_scope: Vec<(String, usize)>,
}

/// The response envelope returned for every search, balance or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: usize,
    pub teaser: Vec<TeaserEntry>,
    /// Page of ranked parcel ids eligible for reveal.
    pub ranked_page: Vec<ParcelId>,
    /// True when at least one branch was skipped (timeout or failure).
    pub degraded: bool,
    #[serde(default)]
    pub skipped_branches: Vec<Branch>,
}
