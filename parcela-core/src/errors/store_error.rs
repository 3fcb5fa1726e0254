use crate::models::GenerationId;
use crate::parcel::ParcelId;

/// Snapshot store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite failure: {message}")]
    Sqlite { message: String },

    #[error("no snapshot database for generation {0}")]
    UnknownGeneration(GenerationId),

    /// A parcel carried one embedding but not the other. The two
    /// embeddings are always present together or both absent.
    #[error("unpaired embedding for parcel {0}")]
    UnpairedEmbedding(ParcelId),

    #[error("snapshot corrupt: {reason}")]
    Corrupt { reason: String },
}
