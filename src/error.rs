use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("record not found")]
    NotFound,
    #[error("account {0} not found")]
    AccountNotFound(u64),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("failed to encode record: {0}")]
    EncodeFailed(String),
    #[error("failed to decode record: {0}")]
    DecodeFailed(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("conflicting updates on account {0}")]
    UpdateConflict(u64),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
