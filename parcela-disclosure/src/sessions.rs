//! Per-session reveal tracking.

use std::collections::HashSet;

use dashmap::DashMap;

use parcela_core::models::SessionId;
use parcela_core::parcel::ParcelId;

/// Which parcel ids each session has already revealed. Re-reveals are
/// free, so this set is what makes reveal idempotent.
#[derive(Default)]
pub struct RevealSessions {
    revealed: DashMap<SessionId, HashSet<ParcelId>>,
}

impl RevealSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self, session: SessionId, id: ParcelId) -> bool {
        self.revealed
            .get(&session)
            .map(|set| set.contains(&id))
            .unwrap_or(false)
    }

    /// Run `debit` under the session's shard guard and mark `id` revealed
    /// when it succeeds. Holding the guard across the debit serializes
    /// reveals within one session, so "already revealed" and "charged"
    /// can never both happen for the same id.
    pub fn reveal_once<F>(&self, session: SessionId, id: ParcelId, debit: F) -> RevealCharge
    where
        F: FnOnce() -> bool,
    {
        let mut set = self.revealed.entry(session).or_default();
        if set.contains(&id) {
            return RevealCharge::AlreadyRevealed;
        }
        if debit() {
            set.insert(id);
            RevealCharge::Charged
        } else {
            RevealCharge::Refused
        }
    }

    /// Drop a session's reveal history (external session expiry).
    pub fn end_session(&self, session: SessionId) {
        self.revealed.remove(&session);
    }
}

/// Outcome of one reveal attempt against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealCharge {
    /// One credit consumed.
    Charged,
    /// Previously revealed in this session; free.
    AlreadyRevealed,
    /// Zero balance; nothing consumed, nothing marked.
    Refused,
}
