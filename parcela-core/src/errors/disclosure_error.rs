use crate::models::PaymentPrompt;
use crate::parcel::ParcelId;

/// Disclosure subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum DisclosureError {
    /// Reveal refused: zero balance. Carries a structured prompt for the
    /// external payment collaborator instead of partial data.
    #[error("insufficient credits for caller {}", prompt.caller)]
    InsufficientCredits { prompt: PaymentPrompt },

    /// The requested id is not part of any ranked result known here.
    #[error("unknown parcel: {0}")]
    UnknownParcel(ParcelId),
}
