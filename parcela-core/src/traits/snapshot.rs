use std::sync::Arc;

use super::graph::GraphStore;
use super::proximity::ProximityStore;
use super::vector::VectorIndex;
use crate::models::GenerationId;

/// One generation's read-only handles: graph connection, vector indices,
/// and the generation id. A request grabs a handle once and keeps it for
/// its whole lifetime, so a concurrent reload never changes data mid-request.
#[derive(Clone)]
pub struct SnapshotHandle {
    pub generation: GenerationId,
    pub graph: Arc<dyn GraphStore>,
    pub proximity: Arc<dyn ProximityStore>,
    pub semantic: Arc<dyn VectorIndex>,
    pub structural: Arc<dyn VectorIndex>,
}

/// Source of the current snapshot handle. `reload` swaps generations
/// atomically behind this; holders of a prior handle keep serving from it
/// until they drop it.
pub trait SnapshotProvider: Send + Sync {
    fn current(&self) -> Arc<SnapshotHandle>;
}
