//! Core primitives for XRP Ledger style networks.
//!
//! This crate provides the wire codec for serialized objects, the amount and
//! identity types it carries, key derivation and signing for both signature
//! schemes, the hashing rules that give transactions and ledger entries their
//! ids, and the radix trie that holds ledger state.

pub mod account;
pub mod amount;
pub mod base58;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod currency;
pub mod errors;
pub mod hash;
pub mod hashing;
pub mod objects;
pub mod path;
pub mod signing;
pub mod st;
pub mod trie;
pub mod txset;
pub mod value;

// Re-export commonly used types
pub use account::Account;
pub use amount::Amount;
pub use base58::HashNetwork;
pub use config::CoreConfig;
pub use crypto::{Key, KeyType, PublicKey, Seed};
pub use currency::Currency;
pub use errors::CoreError;
pub use hash::{Hash128, Hash160, Hash256, VariableLength};
pub use hashing::{HashPrefix, Hashable, Signable};
pub use objects::{LedgerEntry, LedgerEntryType, Transaction, TransactionType};
pub use st::{StObject, StValue};
pub use txset::CanonicalTxSet;
pub use value::Value;
