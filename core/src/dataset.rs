//! CSV ingest and egress.
//!
//! RULE: only this module reads or writes CSV files. The engine and the
//! detectors work on in-memory record slices; callers hand paths to the
//! functions here.

use crate::error::EngineResult;
use crate::record::{
    AccountRecord, LabeledAccountRecord, LabeledTransactionRecord, TransactionRecord,
};
use std::path::Path;

/// Read `account.csv`. The header row is required; the trailing
/// ground-truth columns are optional.
pub fn read_accounts<P: AsRef<Path>>(path: P) -> EngineResult<Vec<AccountRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Read `transaction.csv`. The header row is required.
pub fn read_transactions<P: AsRef<Path>>(path: P) -> EngineResult<Vec<TransactionRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Write `detected_account.csv`. Always emits the header row, even for an
/// empty run.
pub fn write_labeled_accounts<P: AsRef<Path>>(
    path: P,
    records: &[LabeledAccountRecord],
) -> EngineResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(LabeledAccountRecord::HEADERS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `detected_transaction.csv`. Always emits the header row, even for
/// an empty run.
pub fn write_labeled_transactions<P: AsRef<Path>>(
    path: P,
    records: &[LabeledTransactionRecord],
) -> EngineResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(LabeledTransactionRecord::HEADERS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
