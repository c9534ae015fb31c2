use crate::application::guard::IdempotencyGuard;
use crate::application::operator::{MutationOperator, OperateOutcome};
use crate::application::repository::AccountRepository;
use crate::application::token::TokenGenerator;
use crate::domain::account::AccountRecord;
use crate::domain::ports::SharedStore;
use serde::{Deserialize, Serialize};

/// A decoded logical request.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Create or replace an account record.
    SaveAccount { id: u64, balance: i32 },
    /// Fetch an account record.
    GetAccount { id: u64 },
    /// Apply a signed mutation, gated on the idempotency token.
    Operate { id: u64, token: String, delta: i32 },
    /// Issue a fresh idempotency token.
    IssueToken,
}

/// The structured outcome returned to the caller.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Saved,
    Account { id: u64, balance: i32 },
    Applied { balance: i32 },
    AlreadyProcessed,
    Token { token: String },
    Error { reason: String },
}

/// Maps logical requests onto the core components.
///
/// Every component shares the same store handle; constructing an `Api`
/// over an in-memory store yields a fully working service with no
/// external dependencies.
pub struct Api {
    accounts: AccountRepository,
    operator: MutationOperator,
    tokens: TokenGenerator,
}

impl Api {
    pub fn new(store: SharedStore) -> Self {
        let accounts = AccountRepository::new(store.clone());
        let operator = MutationOperator::new(
            IdempotencyGuard::new(store.clone()),
            accounts.clone(),
        );
        let tokens = TokenGenerator::new(store);
        Self {
            accounts,
            operator,
            tokens,
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::SaveAccount { id, balance } => {
                match self.accounts.save(&AccountRecord::new(id, balance)).await {
                    Ok(()) => Response::Saved,
                    Err(e) => Response::Error {
                        reason: e.to_string(),
                    },
                }
            }
            Request::GetAccount { id } => match self.accounts.get(id).await {
                Ok(record) => Response::Account {
                    id: record.id,
                    balance: record.balance,
                },
                Err(e) => Response::Error {
                    reason: e.to_string(),
                },
            },
            Request::Operate { id, token, delta } => {
                match self.operator.operate(id, &token, delta).await {
                    Ok(OperateOutcome::Applied { balance }) => Response::Applied { balance },
                    Ok(OperateOutcome::AlreadyProcessed) => Response::AlreadyProcessed,
                    Err(e) => Response::Error {
                        reason: e.to_string(),
                    },
                }
            }
            Request::IssueToken => match self.tokens.generate().await {
                Ok(token) => Response::Token { token },
                Err(e) => Response::Error {
                    reason: e.to_string(),
                },
            },
        }
    }
}
