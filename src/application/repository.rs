use crate::domain::account::AccountRecord;
use crate::domain::codec;
use crate::domain::keys;
use crate::domain::ports::SharedStore;
use crate::error::{LedgerError, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Freshly created records expire after 24 hours; any successful mutation
/// rewrites them without expiry.
pub const ACCOUNT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Attempts before an optimistic update gives up on a contended record.
const MAX_UPDATE_ATTEMPTS: usize = 16;

/// Stores and retrieves account records by identity.
///
/// Built on the key-value store port plus the record codec. The store key
/// is a deterministic function of the account id, so there is exactly one
/// stored record per id.
#[derive(Clone)]
pub struct AccountRepository {
    store: SharedStore,
}

impl AccountRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Writes the record, overwriting any existing one at that id.
    pub async fn save(&self, record: &AccountRecord) -> Result<()> {
        let key = keys::account(record.id);
        let bytes = codec::encode(record)?;
        self.store.set(&key, &bytes, Some(ACCOUNT_TTL)).await?;
        info!(id = record.id, "account saved");
        Ok(())
    }

    /// Loads the record stored under `id`.
    pub async fn get(&self, id: u64) -> Result<AccountRecord> {
        let key = keys::account(id);
        let bytes = self.store.get(&key).await?.ok_or(LedgerError::NotFound)?;
        decode_stored(&bytes)
    }

    /// Read-modify-write with an optimistic concurrency check.
    ///
    /// The record is re-read and the mutator re-applied on every attempt;
    /// the write only lands if the stored bytes are still the ones that
    /// were read. The rewritten record carries no expiry.
    pub async fn update<F>(&self, id: u64, mutate: F) -> Result<AccountRecord>
    where
        F: Fn(&mut AccountRecord),
    {
        let key = keys::account(id);
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let current = self.store.get(&key).await?.ok_or(LedgerError::NotFound)?;
            let mut record = decode_stored(&current)?;
            mutate(&mut record);
            let next = codec::encode(&record)?;
            if self
                .store
                .compare_and_swap(&key, Some(&current), &next, None)
                .await?
            {
                info!(id, balance = record.balance, "account updated");
                return Ok(record);
            }
            debug!(id, attempt, "concurrent update detected, retrying");
        }
        Err(LedgerError::UpdateConflict(id))
    }
}

// A payload that fails to decode on the read path is a store-level
// corruption, not a caller mistake.
fn decode_stored(bytes: &[u8]) -> Result<AccountRecord> {
    codec::decode(bytes).map_err(|e| match e {
        LedgerError::MalformedRecord(msg) => LedgerError::DecodeFailed(msg),
        other => other,
    })
}
