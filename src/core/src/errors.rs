//! Error types for the core crate.

use crate::hash::Hash256;
use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A character outside the alphabet, or a payload too short to carry a checksum.
    #[error("Bad base58 string: {0}")]
    BadBase58(String),

    /// The trailing four bytes do not match the double SHA-256 of the payload.
    #[error("Bad base58 checksum")]
    BadChecksum,

    /// The version byte or payload length does not match what was requested.
    #[error("Bad version: expected {expected}, got {actual}")]
    BadVersion {
        /// The expected version byte
        expected: u8,
        /// The version byte found
        actual: u8,
    },

    /// A signature or key could not be parsed.
    #[error("Bad signature format: {0}")]
    BadSignatureFormat(String),

    /// A public key carries a scheme prefix this crate does not know.
    #[error("Unknown key format: prefix {0:#04x}")]
    UnknownKeyFormat(u8),

    /// A well formed signature did not verify.
    #[error("Signature verification failed: {0}")]
    VerificationFailed(String),

    /// The result of an amount operation is outside the representable range.
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// An amount was divided by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Native and issued amounts were mixed in one operation.
    #[error("Cannot mix native and issued amounts: {0}")]
    DomainMismatch(String),

    /// A textual number could not be parsed.
    #[error("Invalid number literal: {0}")]
    InvalidNumberLiteral(String),

    /// A field tag names a type code missing from the dictionary.
    #[error("Unknown type code: {0}")]
    UnknownTypeCode(u8),

    /// A field tag names a field missing from the dictionary.
    #[error("Unknown field code: type {type_code}, field {field_code}")]
    UnknownFieldCode {
        /// The type code of the tag
        type_code: u8,
        /// The field code of the tag
        field_code: u8,
    },

    /// The input ended before a value was complete.
    #[error("Short read: needed {needed} bytes, {available} available")]
    ShortRead {
        /// The number of bytes the reader needed
        needed: usize,
        /// The number of bytes left in the input
        available: usize,
    },

    /// A variable length prefix is malformed or exceeds the maximum.
    #[error("Oversized length: {0}")]
    OversizedLength(usize),

    /// A field appeared where it is not allowed, or with the wrong value type.
    #[error("Unexpected field: {0}")]
    UnexpectedFieldType(String),

    /// A field required by an object's template is absent.
    #[error("Missing field {field} in {object}")]
    MissingField {
        /// The field name
        field: &'static str,
        /// The object that requires it
        object: String,
    },

    /// A currency code could not be parsed.
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// A hex string could not be parsed, or has the wrong length.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// A JSON document does not describe a valid object.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The node store has no entry for the hash.
    #[error("Node not found: {0}")]
    NodeNotFound(Hash256),

    /// A node store entry could not be decoded.
    #[error("Corrupt node {hash}: {reason}")]
    CorruptNode {
        /// The hash the node was fetched by
        hash: Hash256,
        /// What was wrong with it
        reason: String,
    },

    /// The node store itself failed.
    #[error("Store error: {0}")]
    StoreError(String),

    /// A `TransactionType` value outside the supported set.
    #[error("Unsupported transaction type: {0}")]
    UnsupportedTransactionType(u16),

    /// A `LedgerEntryType` value outside the supported set.
    #[error("Unsupported ledger entry type: {0:#06x}")]
    UnsupportedLedgerEntryType(u16),

    /// A configuration file could not be read or written.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Shorthand for a short read at the end of `input`.
    pub(crate) fn short_read(needed: usize, available: usize) -> Self {
        CoreError::ShortRead { needed, available }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidJson(error.to_string())
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(error: hex::FromHexError) -> Self {
        CoreError::InvalidHex(error.to_string())
    }
}
