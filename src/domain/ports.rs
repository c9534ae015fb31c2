use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The backing key-value store.
///
/// The store is the only shared mutable resource in the system and is
/// accessed concurrently by all request-handling tasks, potentially from
/// several processes. Any check-and-write discipline therefore lives in
/// the store primitives themselves: implementations must make
/// [`set_if_absent`](KeyValueStore::set_if_absent) and
/// [`compare_and_swap`](KeyValueStore::compare_and_swap) atomic with
/// respect to every other write.
///
/// A `ttl` of `None` means the entry never expires; an expired entry is
/// indistinguishable from an absent one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Writes the value only if the key holds no live entry.
    ///
    /// Returns `true` if the write happened.
    async fn set_if_absent(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<bool>;

    /// Replaces the value only if the current bytes equal `expected`
    /// (`None` expects the key to be absent).
    ///
    /// Returns `true` if the swap happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<bool>;
}

/// Long-lived store handle, shared by reference between components.
pub type SharedStore = Arc<dyn KeyValueStore>;
