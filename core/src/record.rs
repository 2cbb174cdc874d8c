//! Tabular record types for the external CSV contract.
//!
//! Field names and column order are fixed contract points shared with the
//! upstream data generator and the downstream scoring/verification
//! consumers. The trailing ground-truth columns (`is_suspicious`,
//! `suspicious_type`, `suspicious_role`) are opaque passthrough: the engine
//! never interprets them, it only mirrors them into the labeled output.

use crate::aggregator::FindingLedger;
use crate::types::{AccountId, TransactionId};
use serde::{Deserialize, Serialize};

/// One row of `account.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub owner_name: String,
    pub registration_date: String,
    pub country: String,
    #[serde(default)]
    pub is_suspicious: Option<String>,
    #[serde(default)]
    pub suspicious_type: Option<String>,
    #[serde(default)]
    pub suspicious_role: Option<String>,
}

/// One row of `transaction.csv`.
///
/// `value_date` stays a string here; the graph builder parses it with the
/// fixed format and rejects the whole run on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub src_account: AccountId,
    #[serde(default)]
    pub src_account_country: Option<String>,
    pub dst_account: AccountId,
    #[serde(default)]
    pub dst_account_country: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub value_date: String,
    #[serde(default)]
    pub is_suspicious: Option<String>,
    #[serde(default)]
    pub suspicious_type: Option<String>,
}

/// One row of `detected_account.csv`: the input row plus detection columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledAccountRecord {
    pub account_id: AccountId,
    pub owner_name: String,
    pub registration_date: String,
    pub country: String,
    #[serde(default)]
    pub is_suspicious: Option<String>,
    #[serde(default)]
    pub suspicious_type: Option<String>,
    #[serde(default)]
    pub suspicious_role: Option<String>,
    pub detected_suspicious: bool,
    pub detected_suspicious_type: String,
    pub detected_suspicious_role: String,
}

impl LabeledAccountRecord {
    /// Output column order; used to emit a header row even when a run
    /// produced zero records.
    pub const HEADERS: &'static [&'static str] = &[
        "account_id",
        "owner_name",
        "registration_date",
        "country",
        "is_suspicious",
        "suspicious_type",
        "suspicious_role",
        "detected_suspicious",
        "detected_suspicious_type",
        "detected_suspicious_role",
    ];

    /// Label one input row from the aggregated findings. Rows untouched by
    /// every detector come out not-suspicious with empty label columns.
    pub fn from_record(record: &AccountRecord, ledger: &FindingLedger) -> Self {
        let finding = ledger.account_finding(&record.account_id);
        Self {
            account_id: record.account_id.clone(),
            owner_name: record.owner_name.clone(),
            registration_date: record.registration_date.clone(),
            country: record.country.clone(),
            is_suspicious: record.is_suspicious.clone(),
            suspicious_type: record.suspicious_type.clone(),
            suspicious_role: record.suspicious_role.clone(),
            detected_suspicious: finding.is_some(),
            detected_suspicious_type: finding
                .map(|f| f.pattern.label().to_string())
                .unwrap_or_default(),
            detected_suspicious_role: finding
                .map(|f| f.role.label().to_string())
                .unwrap_or_default(),
        }
    }
}

/// One row of `detected_transaction.csv`: the input row plus detection columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledTransactionRecord {
    pub transaction_id: TransactionId,
    pub src_account: AccountId,
    #[serde(default)]
    pub src_account_country: Option<String>,
    pub dst_account: AccountId,
    #[serde(default)]
    pub dst_account_country: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub value_date: String,
    #[serde(default)]
    pub is_suspicious: Option<String>,
    #[serde(default)]
    pub suspicious_type: Option<String>,
    pub detected_suspicious: bool,
    pub detected_suspicious_type: String,
}

impl LabeledTransactionRecord {
    /// Output column order; used to emit a header row even when a run
    /// produced zero records.
    pub const HEADERS: &'static [&'static str] = &[
        "transaction_id",
        "src_account",
        "src_account_country",
        "dst_account",
        "dst_account_country",
        "amount",
        "currency",
        "value_date",
        "is_suspicious",
        "suspicious_type",
        "detected_suspicious",
        "detected_suspicious_type",
    ];

    /// Label one input row from the aggregated findings.
    pub fn from_record(record: &TransactionRecord, ledger: &FindingLedger) -> Self {
        let pattern = ledger.transaction_pattern(&record.transaction_id);
        Self {
            transaction_id: record.transaction_id.clone(),
            src_account: record.src_account.clone(),
            src_account_country: record.src_account_country.clone(),
            dst_account: record.dst_account.clone(),
            dst_account_country: record.dst_account_country.clone(),
            amount: record.amount,
            currency: record.currency.clone(),
            value_date: record.value_date.clone(),
            is_suspicious: record.is_suspicious.clone(),
            suspicious_type: record.suspicious_type.clone(),
            detected_suspicious: pattern.is_some(),
            detected_suspicious_type: pattern
                .map(|p| p.label().to_string())
                .unwrap_or_default(),
        }
    }
}
