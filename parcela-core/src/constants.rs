//! Fixed dimensions and hard limits shared across the workspace.

/// Dimension of the semantic (free-text) embedding space.
pub const SEMANTIC_DIMS: usize = 512;

/// Dimension of the structural (graph) embedding space.
pub const STRUCTURAL_DIMS: usize = 256;

/// Upper bound on highlight strings per result.
pub const MAX_HIGHLIGHTS: usize = 4;

/// Credits consumed by one full reveal.
pub const REVEAL_COST: u32 = 1;
