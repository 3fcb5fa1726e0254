use crate::parcel::ParcelId;

/// Vector index errors.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("dimension mismatch: index holds {expected}-dim vectors, query has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("parcel {0} has no vector in this index")]
    MissingVector(ParcelId),
}
