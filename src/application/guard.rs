use crate::domain::keys;
use crate::domain::ports::SharedStore;
use crate::error::Result;
use std::time::Duration;
use tracing::debug;

/// How long a claim stays visible. After expiry the same token may be
/// reused: the guarantee is "at most once within this window", not
/// "forever".
pub const CLAIM_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of a claim attempt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
}

/// Claims an idempotency token exactly once.
///
/// The claim is a single atomic set-if-absent write of a marker key, so
/// two concurrent claims of the same token resolve to exactly one
/// [`ClaimOutcome::Claimed`]. Any caller-supplied token string is
/// accepted, not only generator-issued ones.
///
/// A store error leaves the claim state unknown; callers must treat that
/// as "do not proceed".
#[derive(Clone)]
pub struct IdempotencyGuard {
    store: SharedStore,
    ttl: Duration,
}

impl IdempotencyGuard {
    pub fn new(store: SharedStore) -> Self {
        Self::with_ttl(store, CLAIM_TTL)
    }

    /// Guard with a non-default claim lifetime.
    pub fn with_ttl(store: SharedStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn claim(&self, token: &str) -> Result<ClaimOutcome> {
        let key = keys::claim(token);
        let claimed = self
            .store
            .set_if_absent(&key, key.as_bytes(), Some(self.ttl))
            .await?;
        debug!(token, claimed, "idempotency claim");
        if claimed {
            Ok(ClaimOutcome::Claimed)
        } else {
            Ok(ClaimOutcome::AlreadyClaimed)
        }
    }
}
