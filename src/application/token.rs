use crate::domain::keys;
use crate::domain::ports::SharedStore;
use crate::error::Result;
use tracing::trace;

/// Issues random idempotency tokens.
///
/// A candidate is a random unsigned 64-bit value, formatted in decimal
/// into the claim-marker key space and probed against the store until a
/// candidate with no existing marker is found. The candidate is returned
/// *without claiming it* — claiming happens at first use through the
/// guard.
///
/// Uniqueness is therefore best effort, not a reservation: two callers
/// generating concurrently can be handed the same token if their store
/// probes race. Callers that need a hard guarantee must claim the token
/// immediately upon receipt.
#[derive(Clone)]
pub struct TokenGenerator {
    store: SharedStore,
}

impl TokenGenerator {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn generate(&self) -> Result<String> {
        loop {
            let candidate = rand::random::<u64>().to_string();
            if self.store.exists(&keys::claim(&candidate)).await? {
                trace!(%candidate, "token candidate already claimed, regenerating");
                continue;
            }
            return Ok(candidate);
        }
    }
}
