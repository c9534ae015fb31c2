//! Store key derivation.
//!
//! Account records and idempotency claim markers share one key-value
//! store; the two namespaces are kept apart by deterministic key prefixes.

/// Key under which an account record is stored.
pub fn account(id: u64) -> String {
    format!("user:{id}")
}

/// Key under which an idempotency claim marker is stored.
pub fn claim(token: &str) -> String {
    format!("idempotent:{token}")
}
