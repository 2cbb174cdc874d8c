//! Finding aggregation.
//!
//! RULE: the `FindingLedger` owns the two label maps and is the sole
//! writer of the output consumed externally. Detectors never write labels.
//!
//! Merge rule is first-writer-wins: once an account or transaction id has
//! a finding, no later group can overwrite it, whether it comes from a
//! later family in the fixed order {loops, stars, chains} or later in one
//! family's discovery order, even with a different role or type. An id carries
//! exactly one label no matter how many groups it participates in. This is
//! an explicit precedence rule, covered by tests, not an accident.

use crate::finding::{AccountFinding, PatternGroup, PatternType, Role};
use crate::record::{
    AccountRecord, LabeledAccountRecord, LabeledTransactionRecord, TransactionRecord,
};
use crate::types::{AccountId, TransactionId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FindingLedger {
    accounts: HashMap<AccountId, AccountFinding>,
    transactions: HashMap<TransactionId, PatternType>,
}

impl FindingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one pattern family's groups, in that family's discovery
    /// order. The engine calls this once per family, in the fixed order.
    pub fn absorb(&mut self, groups: &[PatternGroup]) {
        for group in groups {
            self.record_account(&group.launderer, group.pattern, Role::Launderer);
            for account_id in &group.accomplices {
                self.record_account(account_id, group.pattern, Role::Accomplice);
            }
            for transaction_id in &group.transactions {
                if !self.transactions.contains_key(transaction_id) {
                    self.transactions
                        .insert(transaction_id.clone(), group.pattern);
                }
            }
        }
    }

    fn record_account(&mut self, account_id: &str, pattern: PatternType, role: Role) {
        if !self.accounts.contains_key(account_id) {
            self.accounts
                .insert(account_id.to_string(), AccountFinding { pattern, role });
        }
    }

    pub fn account_finding(&self, account_id: &str) -> Option<&AccountFinding> {
        self.accounts.get(account_id)
    }

    pub fn transaction_pattern(&self, transaction_id: &str) -> Option<PatternType> {
        self.transactions.get(transaction_id).copied()
    }

    pub fn suspicious_account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn suspicious_transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn account_findings(&self) -> impl Iterator<Item = (&str, &AccountFinding)> {
        self.accounts.iter().map(|(id, f)| (id.as_str(), f))
    }

    pub fn transaction_findings(&self) -> impl Iterator<Item = (&str, PatternType)> {
        self.transactions.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Label every input account row exactly once, in input order. Rows
    /// with no finding come out not-suspicious.
    pub fn label_accounts(&self, records: &[AccountRecord]) -> Vec<LabeledAccountRecord> {
        records
            .iter()
            .map(|r| LabeledAccountRecord::from_record(r, self))
            .collect()
    }

    /// Label every input transaction row exactly once, in input order.
    pub fn label_transactions(
        &self,
        records: &[TransactionRecord],
    ) -> Vec<LabeledTransactionRecord> {
        records
            .iter()
            .map(|r| LabeledTransactionRecord::from_record(r, self))
            .collect()
    }
}
