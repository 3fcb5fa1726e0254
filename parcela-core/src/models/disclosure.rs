//! Reveal outcome models.

use serde::{Deserialize, Serialize};

use super::results::RankedResult;
use crate::parcel::Parcel;

/// Structured prompt handed to the external payment collaborator when a
/// reveal is refused for lack of credits. Returned instead of partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPrompt {
    pub caller: String,
    /// Credits missing to complete the requested reveal.
    pub required_credits: u32,
    /// Suggested top-up size, from disclosure config.
    pub suggested_topup: u32,
}

/// Full detail for one revealed parcel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealedParcel {
    pub parcel: Parcel,
    pub result: RankedResult,
    /// False when the id was already revealed this session (re-reveal is
    /// free and idempotent).
    pub charged: bool,
}
