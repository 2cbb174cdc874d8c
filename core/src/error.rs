use crate::types::{AccountId, TransactionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transaction '{transaction_id}' references unknown account '{account_id}'")]
    UnknownAccount {
        transaction_id: TransactionId,
        account_id: AccountId,
    },

    #[error("Transaction '{transaction_id}' has unparseable value date '{value}'")]
    InvalidValueDate {
        transaction_id: TransactionId,
        value: String,
    },

    #[error("Duplicate account id '{0}'")]
    DuplicateAccount(AccountId),

    #[error("Duplicate transaction id '{0}'")]
    DuplicateTransaction(TransactionId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
