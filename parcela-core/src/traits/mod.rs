//! Trait seams between the pipeline and its backends.
//!
//! Graph, vector, and embedding calls may cross the network, so those
//! traits are async and every call sits behind a per-branch timeout in the
//! pipeline. Proximity and ledger access is in-process and stays sync.

mod embedding;
mod graph;
mod ledger;
mod proximity;
mod snapshot;
mod vector;

pub use embedding::EmbeddingProvider;
pub use graph::GraphStore;
pub use ledger::CreditLedger;
pub use proximity::ProximityStore;
pub use snapshot::{SnapshotHandle, SnapshotProvider};
pub use vector::{VectorIndex, VectorIndexFactory};
