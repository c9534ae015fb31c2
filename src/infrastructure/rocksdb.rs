use crate::domain::ports::KeyValueStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{DB, Options};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Stored values carry an 8-byte big-endian expiry deadline in unix
/// milliseconds (0 = no expiry) ahead of the payload, so TTLs survive a
/// process restart.
const ENVELOPE_HEADER: usize = 8;

/// A persistent store implementation using RocksDB.
///
/// RocksDB is an embedded, single-process database, so the conditional
/// primitives serialize their read-check-write sequence behind an
/// in-process mutex; that is sufficient to make them atomic against every
/// other writer of this store.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbKvStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbKvStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path).map_err(store_err)?;
        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Reads the live payload under `key`, treating expired entries as
    /// absent.
    fn read_live(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(bytes) = self.db.get(key.as_bytes()).map_err(store_err)? else {
            return Ok(None);
        };
        let (deadline, payload) = split_envelope(&bytes)?;
        if deadline != 0 && now_millis() >= deadline {
            return Ok(None);
        }
        Ok(Some(payload.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let deadline = match ttl {
            Some(ttl) => now_millis().saturating_add(ttl.as_millis() as u64),
            None => 0,
        };
        let mut envelope = Vec::with_capacity(ENVELOPE_HEADER + value.len());
        envelope.extend_from_slice(&deadline.to_be_bytes());
        envelope.extend_from_slice(value);
        self.db.put(key.as_bytes(), envelope).map_err(store_err)
    }
}

#[async_trait]
impl KeyValueStore for RocksDbKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.read_live(key)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.put(key, value, ttl)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read_live(key)?.is_some())
    }

    async fn set_if_absent(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.read_live(key)?.is_some() {
            return Ok(false);
        }
        self.put(key, value, ttl)?;
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let current = self.read_live(key)?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        self.put(key, value, ttl)?;
        Ok(true)
    }
}

fn store_err(e: rocksdb::Error) -> LedgerError {
    LedgerError::StoreUnavailable(e.to_string())
}

fn split_envelope(bytes: &[u8]) -> Result<(u64, &[u8])> {
    if bytes.len() < ENVELOPE_HEADER {
        return Err(LedgerError::DecodeFailed(
            "truncated store envelope".to_string(),
        ));
    }
    let (header, payload) = bytes.split_at(ENVELOPE_HEADER);
    let mut deadline = [0u8; ENVELOPE_HEADER];
    deadline.copy_from_slice(header);
    Ok((u64::from_be_bytes(deadline), payload))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_and_get() {
        let dir = tempdir().unwrap();
        let store = RocksDbKvStore::open(dir.path()).unwrap();

        store.set("k", b"v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert!(store.exists("k").await.unwrap());
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let dir = tempdir().unwrap();
        let store = RocksDbKvStore::open(dir.path()).unwrap();

        store
            .set("k", b"v", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(store.exists("k").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_if_absent() {
        let dir = tempdir().unwrap();
        let store = RocksDbKvStore::open(dir.path()).unwrap();

        assert!(store.set_if_absent("k", b"first", None).await.unwrap());
        assert!(!store.set_if_absent("k", b"second", None).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let dir = tempdir().unwrap();
        let store = RocksDbKvStore::open(dir.path()).unwrap();

        store.set("k", b"v1", None).await.unwrap();
        assert!(
            store
                .compare_and_swap("k", Some(b"v1"), b"v2", None)
                .await
                .unwrap()
        );
        assert!(
            !store
                .compare_and_swap("k", Some(b"v1"), b"v3", None)
                .await
                .unwrap()
        );
        assert_eq!(store.get("k").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDbKvStore::open(dir.path()).unwrap();
            store.set("k", b"v", None).await.unwrap();
        }
        let store = RocksDbKvStore::open(dir.path()).unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
