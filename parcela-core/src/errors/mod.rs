//! Error taxonomy for the retrieval core.
//!
//! One enum per subsystem, aggregated into [`ParcelaError`]. Partial
//! degradation is deliberately NOT an error — it is surfaced as response
//! metadata; only a request where every branch fails becomes
//! [`ParcelaError::RetrievalUnavailable`].

mod disclosure_error;
mod preference_error;
mod store_error;
mod vector_error;

pub use disclosure_error::DisclosureError;
pub use preference_error::PreferenceError;
pub use store_error::StoreError;
pub use vector_error::VectorError;

/// Top-level error type. Every fallible public operation in the workspace
/// returns [`ParcelaResult`].
#[derive(Debug, thiserror::Error)]
pub enum ParcelaError {
    /// Malformed or ambiguous input. Never auto-retried.
    #[error("invalid preference: {0}")]
    InvalidPreference(#[from] PreferenceError),

    /// Every retrieval branch failed or timed out. The caller retries
    /// with backoff.
    #[error("retrieval unavailable: every branch failed or timed out")]
    RetrievalUnavailable,

    /// Business-rule failure on reveal. Surfaced verbatim, never retried.
    #[error(transparent)]
    Disclosure(#[from] DisclosureError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("vector index error: {0}")]
    Vector(#[from] VectorError),

    /// The external embedding provider failed or returned garbage.
    #[error("embedding provider error: {reason}")]
    Embedding { reason: String },
}

pub type ParcelaResult<T> = Result<T, ParcelaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentPrompt;
    use crate::parcel::ParcelId;

    #[test]
    fn preference_error_converts_to_invalid_preference() {
        let err: ParcelaError = PreferenceError::InvertedRange {
            min: 2_000.0,
            max: 500.0,
        }
        .into();
        assert!(matches!(err, ParcelaError::InvalidPreference(_)));
        assert!(err.to_string().contains("inverted area range"));
    }

    #[test]
    fn insufficient_credits_surfaces_prompt() {
        let err: ParcelaError = DisclosureError::InsufficientCredits {
            prompt: PaymentPrompt {
                caller: "buyer-7".into(),
                required_credits: 1,
                suggested_topup: 10,
            },
        }
        .into();
        assert!(err.to_string().contains("buyer-7"));
    }

    #[test]
    fn unknown_parcel_names_the_id() {
        let err = DisclosureError::UnknownParcel(ParcelId(9));
        assert!(err.to_string().contains("P9"));
    }
}
