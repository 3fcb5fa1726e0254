use crate::parcel::ParcelId;

/// Preference validation failures. Disambiguation is surfaced as an
/// error, never guessed.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("inverted area range: min {min} exceeds max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("unknown {axis} value: {value:?}")]
    UnknownCategory { axis: &'static str, value: String },

    #[error("proximity weight for {poi:?} out of range: {value} (expected 0..=1)")]
    WeightOutOfRange { poi: String, value: f32 },

    #[error("unknown proximity target: {poi:?}")]
    UnknownPoiType { poi: String },

    #[error("location {query:?} matched nothing")]
    LocationNotFound { query: String },

    #[error("location {query:?} is ambiguous between {candidates:?}")]
    AmbiguousLocation {
        query: String,
        candidates: Vec<String>,
    },

    #[error("seed parcel {0} does not exist in the current snapshot")]
    UnknownSeedParcel(ParcelId),
}
