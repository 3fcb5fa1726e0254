//! Documented defaults. These are deliberate choices, not recovered
//! tuning; every one is overridable through [`super::ParcelaConfig`].

/// RRF smoothing constant. Higher values flatten the influence of
/// top-ranked items from any single list.
pub const DEFAULT_RRF_K: u32 = 60;

/// Per-branch timeout. A branch that exceeds it degrades to "skipped".
pub const DEFAULT_BRANCH_TIMEOUT_MS: u64 = 2_000;

/// How many candidates each vector branch fetches.
pub const DEFAULT_VECTOR_K: usize = 50;

/// Over-fetch inflation applied when a backing index cannot pre-filter by
/// a permitted id set: fetch `k * factor`, then filter down to `k`.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 4;

/// Similarity floor; vector hits below it are dropped.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.0;

/// Minimum share of the fused score a source must contribute to earn a
/// highlight.
pub const DEFAULT_MIN_SALIENCE: f64 = 0.05;

/// Neutral per-POI-type weight used when the caller supplies no weights.
pub const DEFAULT_PROXIMITY_WEIGHT: f32 = 0.5;

/// Teaser entries returned free of charge.
pub const DEFAULT_TEASER_SIZE: usize = 3;

/// Ranked ids per response page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Suggested top-up forwarded to the payment collaborator.
pub const DEFAULT_SUGGESTED_TOPUP: u32 = 10;

/// Query-embedding cache capacity (entries).
pub const DEFAULT_EMBED_CACHE_ENTRIES: u64 = 4_096;

/// Proximity edge materialization thresholds in meters, per POI type.
pub mod thresholds_m {
    pub const SCHOOL: f64 = 1_500.0;
    pub const BUS_STOP: f64 = 800.0;
    pub const SHOP: f64 = 1_200.0;
    pub const FOREST: f64 = 2_000.0;
    pub const WATER: f64 = 2_000.0;
    pub const ROAD: f64 = 500.0;
}
