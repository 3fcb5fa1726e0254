//! The disclosure rule: free count and teaser, credit-gated reveal.

use std::sync::Arc;

use tracing::{debug, info};

use parcela_core::config::DisclosureConfig;
use parcela_core::errors::DisclosureError;
use parcela_core::models::{
    CallerId, CandidateDetail, PaymentPrompt, RankedOutcome, RevealedParcel, SearchResponse,
    SessionId, TeaserEntry,
};
use parcela_core::parcel::{Parcel, ParcelId};
use parcela_core::traits::CreditLedger;

use crate::sessions::{RevealCharge, RevealSessions};

/// Enforces the freemium disclosure rule. Balance state lives in the
/// ledger; reveal history lives in [`RevealSessions`].
pub struct DisclosurePolicy {
    ledger: Arc<dyn CreditLedger>,
    sessions: RevealSessions,
    config: DisclosureConfig,
}

impl DisclosurePolicy {
    pub fn new(ledger: Arc<dyn CreditLedger>, config: DisclosureConfig) -> Self {
        Self {
            ledger,
            sessions: RevealSessions::new(),
            config,
        }
    }

    /// Build the response envelope. Count and teaser are returned
    /// regardless of the caller's balance.
    pub fn respond(&self, outcome: &RankedOutcome) -> SearchResponse {
        let teaser = outcome
            .page
            .iter()
            .take(self.config.teaser_size)
            .map(teaser_entry)
            .collect();
        SearchResponse {
            total_count: outcome.total_count,
            teaser,
            ranked_page: outcome.page.iter().map(|d| d.parcel.id).collect(),
            degraded: outcome.degraded,
            skipped_branches: outcome.skipped_branches.clone(),
        }
    }

    /// Reveal full detail for any ranked id of `outcome`, charging one
    /// credit unless this session already revealed it.
    pub fn reveal(
        &self,
        caller: &CallerId,
        session: SessionId,
        outcome: &RankedOutcome,
        id: ParcelId,
        parcel: Parcel,
    ) -> Result<RevealedParcel, DisclosureError> {
        let result = outcome
            .results
            .iter()
            .find(|r| r.parcel == id)
            .ok_or(DisclosureError::UnknownParcel(id))?
            .clone();

        let charge = self
            .sessions
            .reveal_once(session, id, || self.ledger.try_debit(caller));
        match charge {
            RevealCharge::Refused => {
                info!(caller = %caller, parcel = %id, "reveal refused: zero balance");
                Err(DisclosureError::InsufficientCredits {
                    prompt: PaymentPrompt {
                        caller: caller.0.clone(),
                        required_credits: parcela_core::constants::REVEAL_COST,
                        suggested_topup: self.config.suggested_topup,
                    },
                })
            }
            charge => {
                let charged = charge == RevealCharge::Charged;
                debug!(caller = %caller, parcel = %id, charged, "parcel revealed");
                Ok(RevealedParcel {
                    parcel,
                    result,
                    charged,
                })
            }
        }
    }

    /// Forget a session's reveal history.
    pub fn end_session(&self, session: SessionId) {
        self.sessions.end_session(session);
    }
}

/// Reduce one page entry to its free representation: approximate
/// location, size class with rounded area, highlights. Never the id or
/// the centroid.
fn teaser_entry(detail: &CandidateDetail) -> TeaserEntry {
    TeaserEntry {
        approx_location: detail.district_name.clone(),
        area_class: format!(
            "{} (~{} m²)",
            detail.parcel.size_class.label(),
            detail.parcel.rounded_area_m2()
        ),
        highlights: detail.result.highlights.clone(),
    }
}
