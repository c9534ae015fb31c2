use crate::domain::account::AccountRecord;
use crate::error::{LedgerError, Result};

/// Serializes a record into the store's byte format (JSON).
pub fn encode(record: &AccountRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| LedgerError::EncodeFailed(e.to_string()))
}

/// Deserializes a record from the store's byte format.
///
/// Rejects anything that is not a previously [`encode`]d value: truncated
/// payloads, wrong field types, unknown fields.
pub fn decode(bytes: &[u8]) -> Result<AccountRecord> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::MalformedRecord(e.to_string()))
}
