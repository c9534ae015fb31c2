use crate::application::guard::{ClaimOutcome, IdempotencyGuard};
use crate::application::repository::AccountRepository;
use crate::error::{LedgerError, Result};
use tracing::info;

/// Outcome of a mutation attempt.
///
/// `AlreadyProcessed` carries no replay of the first attempt's result;
/// only the signal that the token was already consumed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperateOutcome {
    Applied { balance: i32 },
    AlreadyProcessed,
}

/// Applies a signed balance delta at most once per idempotency token.
///
/// The token is claimed before the account is touched. An unknown claim
/// state (store error on the claim path) aborts the whole operation —
/// the balance is never read or written in that case.
#[derive(Clone)]
pub struct MutationOperator {
    guard: IdempotencyGuard,
    accounts: AccountRepository,
}

impl MutationOperator {
    pub fn new(guard: IdempotencyGuard, accounts: AccountRepository) -> Self {
        Self { guard, accounts }
    }

    /// Applies `balance := balance - delta` to the account, gated on the
    /// token.
    ///
    /// A mutation that fails after a successful claim leaves the token
    /// consumed for the remainder of its lifetime.
    pub async fn operate(&self, account_id: u64, token: &str, delta: i32) -> Result<OperateOutcome> {
        match self.guard.claim(token).await? {
            ClaimOutcome::AlreadyClaimed => {
                info!(account_id, token, "duplicate token, mutation skipped");
                return Ok(OperateOutcome::AlreadyProcessed);
            }
            ClaimOutcome::Claimed => {}
        }

        let record = self
            .accounts
            .update(account_id, |account| account.apply(delta))
            .await
            .map_err(|e| match e {
                LedgerError::NotFound => LedgerError::AccountNotFound(account_id),
                other => other,
            })?;

        Ok(OperateOutcome::Applied {
            balance: record.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountRecord;
    use crate::domain::ports::{KeyValueStore, SharedStore};
    use crate::infrastructure::in_memory::InMemoryKvStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    fn operator(store: SharedStore) -> MutationOperator {
        MutationOperator::new(
            IdempotencyGuard::new(store.clone()),
            AccountRepository::new(store),
        )
    }

    #[tokio::test]
    async fn test_operate_applies_once_per_token() {
        let store: SharedStore = Arc::new(InMemoryKvStore::new());
        let repo = AccountRepository::new(store.clone());
        repo.save(&AccountRecord::new(7, 100)).await.unwrap();

        let operator = operator(store);

        let first = operator.operate(7, "T", 30).await.unwrap();
        assert_eq!(first, OperateOutcome::Applied { balance: 70 });

        let second = operator.operate(7, "T", 30).await.unwrap();
        assert_eq!(second, OperateOutcome::AlreadyProcessed);
        assert_eq!(repo.get(7).await.unwrap().balance, 70);
    }

    #[tokio::test]
    async fn test_operate_missing_account() {
        let store: SharedStore = Arc::new(InMemoryKvStore::new());
        let result = operator(store).operate(999, "T", 1).await;
        assert!(matches!(result, Err(LedgerError::AccountNotFound(999))));
    }

    #[tokio::test]
    async fn test_failed_mutation_consumes_token() {
        let store: SharedStore = Arc::new(InMemoryKvStore::new());
        let operator = operator(store.clone());

        assert!(operator.operate(999, "T", 1).await.is_err());

        // The claim landed before the account lookup failed.
        let repo = AccountRepository::new(store);
        repo.save(&AccountRecord::new(999, 50)).await.unwrap();
        assert_eq!(
            operator.operate(999, "T", 1).await.unwrap(),
            OperateOutcome::AlreadyProcessed
        );
    }

    /// A store whose claim path is down.
    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> crate::error::Result<Option<Vec<u8>>> {
            Err(LedgerError::StoreUnavailable("down".into()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Option<Duration>,
        ) -> crate::error::Result<()> {
            Err(LedgerError::StoreUnavailable("down".into()))
        }

        async fn exists(&self, _key: &str) -> crate::error::Result<bool> {
            Err(LedgerError::StoreUnavailable("down".into()))
        }

        async fn set_if_absent(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Option<Duration>,
        ) -> crate::error::Result<bool> {
            Err(LedgerError::StoreUnavailable("down".into()))
        }

        async fn compare_and_swap(
            &self,
            _key: &str,
            _expected: Option<&[u8]>,
            _value: &[u8],
            _ttl: Option<Duration>,
        ) -> crate::error::Result<bool> {
            Err(LedgerError::StoreUnavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn test_unknown_claim_state_fails_closed() {
        // Claims go to a dead store, the account lives in a healthy one;
        // the mutation must not reach it.
        let healthy: SharedStore = Arc::new(InMemoryKvStore::new());
        let repo = AccountRepository::new(healthy.clone());
        repo.save(&AccountRecord::new(1, 100)).await.unwrap();

        let operator = MutationOperator::new(
            IdempotencyGuard::new(Arc::new(FailingStore)),
            AccountRepository::new(healthy),
        );

        let result = operator.operate(1, "T", 30).await;
        assert!(matches!(result, Err(LedgerError::StoreUnavailable(_))));
        assert_eq!(repo.get(1).await.unwrap().balance, 100);
    }
}
