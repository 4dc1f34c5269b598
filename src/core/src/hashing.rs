//! Canonical hashing: hash prefixes, the `Hashable` and `Signable`
//! capabilities, and ledger entry index derivation.
//!
//! Every object identity on the network is the SHA-512 half of a four byte
//! prefix followed by a body. The prefix keeps a transaction id from ever
//! colliding with, say, the hash of a trie node carrying the same bytes.

use crate::account::Account;
use crate::crypto::hash::{sha512_half_of, Sha512Half};
use crate::crypto::PublicKey;
use crate::currency::Currency;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::path::Issue;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// The four byte prefix placed in front of a hashed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashPrefix {
    /// `TXN\0`: transaction id
    TransactionId,
    /// `SND\0`: transaction with metadata, as a trie leaf
    TxNode,
    /// `MLN\0`: state entry, as a trie leaf
    LeafNode,
    /// `MIN\0`: inner trie node
    InnerNode,
    /// `LWR\0`: ledger header
    LedgerMaster,
    /// `STX\0`: single signing payload
    TxSign,
    /// `SMT\0`: multi-signing payload
    TxMultiSign,
    /// `VAL\0`: validation
    Validation,
    /// `PRP\0`: proposal
    Proposal,
}

impl HashPrefix {
    /// The prefix bytes.
    pub fn bytes(&self) -> [u8; 4] {
        match self {
            HashPrefix::TransactionId => *b"TXN\0",
            HashPrefix::TxNode => *b"SND\0",
            HashPrefix::LeafNode => *b"MLN\0",
            HashPrefix::InnerNode => *b"MIN\0",
            HashPrefix::LedgerMaster => *b"LWR\0",
            HashPrefix::TxSign => *b"STX\0",
            HashPrefix::TxMultiSign => *b"SMT\0",
            HashPrefix::Validation => *b"VAL\0",
            HashPrefix::Proposal => *b"PRP\0",
        }
    }

    /// Resolves prefix bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        [
            HashPrefix::TransactionId,
            HashPrefix::TxNode,
            HashPrefix::LeafNode,
            HashPrefix::InnerNode,
            HashPrefix::LedgerMaster,
            HashPrefix::TxSign,
            HashPrefix::TxMultiSign,
            HashPrefix::Validation,
            HashPrefix::Proposal,
        ]
        .into_iter()
        .find(|prefix| prefix.bytes() == bytes)
    }
}

impl fmt::Display for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.bytes();
        f.write_str(&String::from_utf8_lossy(&bytes[..3]))
    }
}

/// `SHA-512-half(prefix ∥ body)`.
pub fn prefixed_hash(prefix: HashPrefix, body: &[u8]) -> Hash256 {
    let mut hasher = Sha512Half::new();
    hasher.update(prefix.bytes());
    hasher.update(body);
    hasher.finish()
}

/// Something with a canonical identity.
pub trait Hashable {
    /// The prefix of the hashed body.
    fn prefix(&self) -> HashPrefix;

    /// The bytes hashed behind the prefix.
    fn hash_body(&self) -> Result<Vec<u8>, CoreError>;

    /// The canonical identity.
    fn hash(&self) -> Result<Hash256, CoreError> {
        Ok(prefixed_hash(self.prefix(), &self.hash_body()?))
    }
}

/// Something that carries a public key and a signature over its own content.
pub trait Signable {
    /// The prefix of the signing payload.
    fn signing_prefix(&self) -> HashPrefix;

    /// The bytes signed behind the prefix.
    fn signing_body(&self) -> Result<Vec<u8>, CoreError>;

    /// The full signing payload: prefix then body.
    fn signing_data(&self) -> Result<Vec<u8>, CoreError> {
        let mut data = self.signing_prefix().bytes().to_vec();
        data.extend_from_slice(&self.signing_body()?);
        Ok(data)
    }

    /// The signer's public key, if set.
    fn signing_public_key(&self) -> Option<&[u8]>;

    /// The signature, if set.
    fn signature(&self) -> Option<&[u8]>;

    /// Stores the signer's public key.
    fn set_signing_public_key(&mut self, key: &PublicKey) -> Result<(), CoreError>;

    /// Stores the signature.
    fn set_signature(&mut self, signature: Vec<u8>) -> Result<(), CoreError>;

    /// Checks the object is fit to be signed.
    fn check_signable(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Key spaces of ledger entry indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSpace {
    Account,
    Offer,
    RippleState,
    OwnerDirectory,
    Amendments,
    FeeSettings,
    SkipList,
    Ticket,
    Escrow,
    SignerList,
    Amm,
}

impl LedgerSpace {
    /// The two byte space discriminant.
    pub fn code(&self) -> u16 {
        let c = match self {
            LedgerSpace::Account => b'a',
            LedgerSpace::Offer => b'o',
            LedgerSpace::RippleState => b'r',
            LedgerSpace::OwnerDirectory => b'O',
            LedgerSpace::Amendments => b'f',
            LedgerSpace::FeeSettings => b'e',
            LedgerSpace::SkipList => b's',
            LedgerSpace::Ticket => b'T',
            LedgerSpace::Escrow => b'u',
            LedgerSpace::SignerList => b'S',
            LedgerSpace::Amm => b'A',
        };
        u16::from(c)
    }
}

/// `SHA-512-half(u16 space ∥ keys...)`.
pub fn ledger_index(space: LedgerSpace, keys: &[&[u8]]) -> Hash256 {
    let mut space_bytes = [0u8; 2];
    BigEndian::write_u16(&mut space_bytes, space.code());
    let mut parts: Vec<&[u8]> = Vec::with_capacity(keys.len() + 1);
    parts.push(&space_bytes);
    parts.extend_from_slice(keys);
    sha512_half_of(&parts)
}

fn u32_bytes(value: u32) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    BigEndian::write_u32(&mut bytes, value);
    bytes
}

/// Index of an account's root entry.
pub fn account_root_index(account: &Account) -> Hash256 {
    ledger_index(LedgerSpace::Account, &[account.as_bytes()])
}

/// Index of an offer.
pub fn offer_index(account: &Account, sequence: u32) -> Hash256 {
    ledger_index(LedgerSpace::Offer, &[account.as_bytes(), &u32_bytes(sequence)])
}

/// Index of the trust line between two accounts; argument order does not matter.
pub fn ripple_state_index(a: &Account, b: &Account, currency: &Currency) -> Hash256 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    ledger_index(
        LedgerSpace::RippleState,
        &[low.as_bytes(), high.as_bytes(), currency.as_bytes()],
    )
}

/// Index of the root page of an account's owner directory.
pub fn owner_directory_index(account: &Account) -> Hash256 {
    ledger_index(LedgerSpace::OwnerDirectory, &[account.as_bytes()])
}

/// Index of the singleton amendments entry.
pub fn amendments_index() -> Hash256 {
    ledger_index(LedgerSpace::Amendments, &[])
}

/// Index of the singleton fee settings entry.
pub fn fee_settings_index() -> Hash256 {
    ledger_index(LedgerSpace::FeeSettings, &[])
}

/// Index of the recent ledger hashes skip list.
pub fn skip_list_index() -> Hash256 {
    ledger_index(LedgerSpace::SkipList, &[])
}

/// Index of a ticket.
pub fn ticket_index(account: &Account, sequence: u32) -> Hash256 {
    ledger_index(LedgerSpace::Ticket, &[account.as_bytes(), &u32_bytes(sequence)])
}

/// Index of an escrow.
pub fn escrow_index(account: &Account, sequence: u32) -> Hash256 {
    ledger_index(LedgerSpace::Escrow, &[account.as_bytes(), &u32_bytes(sequence)])
}

/// Index of an account's signer list.
pub fn signer_list_index(account: &Account) -> Hash256 {
    ledger_index(LedgerSpace::SignerList, &[account.as_bytes(), &u32_bytes(0)])
}

/// Index of the AMM for an asset pair; argument order does not matter.
pub fn amm_index(a: &Issue, b: &Issue) -> Hash256 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    ledger_index(
        LedgerSpace::Amm,
        &[
            low.issuer.as_bytes(),
            low.currency.as_bytes(),
            high.issuer.as_bytes(),
            high.currency.as_bytes(),
        ],
    )
}
