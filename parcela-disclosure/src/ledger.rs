//! In-memory credit ledger with per-caller serialized mutation.

use dashmap::DashMap;

use parcela_core::models::CallerId;
use parcela_core::traits::CreditLedger;

/// DashMap-backed ledger. `try_debit` mutates under the entry's shard
/// guard, which serializes concurrent reveals per caller: a balance of
/// one credit yields exactly one successful debit, never two.
#[derive(Default)]
pub struct InMemoryCreditLedger {
    balances: DashMap<CallerId, u32>,
}

impl InMemoryCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a caller's balance (tests, ledger sync from the payment
    /// collaborator).
    pub fn set_balance(&self, caller: &CallerId, amount: u32) {
        self.balances.insert(caller.clone(), amount);
    }
}

impl CreditLedger for InMemoryCreditLedger {
    fn balance(&self, caller: &CallerId) -> u32 {
        self.balances.get(caller).map(|entry| *entry).unwrap_or(0)
    }

    fn try_debit(&self, caller: &CallerId) -> bool {
        let mut entry = self.balances.entry(caller.clone()).or_insert(0);
        if *entry > 0 {
            *entry -= 1;
            true
        } else {
            false
        }
    }

    fn deposit(&self, caller: &CallerId, amount: u32) {
        let mut entry = self.balances.entry(caller.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_stops_at_zero() {
        let ledger = InMemoryCreditLedger::new();
        let caller = CallerId("buyer-1".into());
        ledger.set_balance(&caller, 2);
        assert!(ledger.try_debit(&caller));
        assert!(ledger.try_debit(&caller));
        assert!(!ledger.try_debit(&caller));
        assert_eq!(ledger.balance(&caller), 0);
    }

    #[test]
    fn unknown_caller_has_zero_balance() {
        let ledger = InMemoryCreditLedger::new();
        let caller = CallerId("nobody".into());
        assert_eq!(ledger.balance(&caller), 0);
        assert!(!ledger.try_debit(&caller));
    }
}
