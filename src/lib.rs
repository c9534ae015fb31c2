//! Idempotency-guarded account balance core.
//!
//! A balance-bearing account record lives in a shared key-value store. A
//! client-supplied idempotency token causes a mutating operation to be
//! applied at most once within the token's lifetime, even across retries.
//! Transport is not part of the core: the [`interfaces`] module decodes
//! logical requests and maps outcomes back, and the binary wires a store
//! adapter to it.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
