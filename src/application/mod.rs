//! Application layer: the components that combine the store port into the
//! idempotency-guarded mutation core.
//!
//! The [`operator::MutationOperator`] is the entry point for balance
//! mutations; it composes the [`guard::IdempotencyGuard`] and the
//! [`repository::AccountRepository`]. Tokens are minted separately by the
//! [`token::TokenGenerator`].

pub mod guard;
pub mod operator;
pub mod repository;
pub mod token;
