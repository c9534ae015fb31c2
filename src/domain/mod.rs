//! Domain layer: the account record, its byte codec, the store key
//! namespaces and the key-value store port.

pub mod account;
pub mod codec;
pub mod keys;
pub mod ports;
