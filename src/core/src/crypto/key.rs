//! Scheme-agnostic keys.
//!
//! Everything downstream of key derivation works with [`Key`] and
//! [`PublicKey`]; the scheme is read from the first byte of the public key.

use crate::account::Account;
use crate::base58::{self, HashNetwork, Version};
use crate::crypto::ecdsa::{self, EcdsaKey};
use crate::crypto::ed25519::{self, Ed25519Key, ED25519_PREFIX};
use crate::crypto::hash::sha256_ripemd160;
use crate::crypto::seed::{KeyType, Seed};
use crate::errors::CoreError;
use std::fmt;
use tracing::debug;

/// A 33-byte public key carrying its scheme in the first byte.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey(pub [u8; 33]);

impl PublicKey {
    /// Copies a public key from exactly 33 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 33 {
            return Err(CoreError::BadSignatureFormat(format!(
                "public key must be 33 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 33];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// The scheme named by the prefix byte.
    pub fn key_type(&self) -> Result<KeyType, CoreError> {
        match self.0[0] {
            ED25519_PREFIX => Ok(KeyType::Ed25519),
            0x02 | 0x03 => Ok(KeyType::Secp256k1),
            other => Err(CoreError::UnknownKeyFormat(other)),
        }
    }

    /// The account this key controls as its master key.
    pub fn account(&self) -> Account {
        Account(sha256_ripemd160(&self.0).to_bytes())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Base58 form under `version` (node or account public).
    pub fn to_base58(&self, version: Version) -> String {
        base58::encode_versioned(version, &self.0, HashNetwork::Ripple)
    }

    /// Parses a base58 public key written under `version`.
    pub fn from_base58(text: &str, version: Version) -> Result<Self, CoreError> {
        Self::from_slice(&base58::decode_versioned(text, version, HashNetwork::Ripple)?)
    }

    /// Verifies `signature` over `message` (the full signing body).
    ///
    /// secp256k1 signatures are checked against the SHA-512 half of the
    /// message; Ed25519 signatures against the message itself.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        require_fully_canonical: bool,
    ) -> Result<bool, CoreError> {
        let valid = match self.key_type()? {
            KeyType::Secp256k1 => {
                ecdsa::verify(&self.0, message, signature, require_fully_canonical)?
            }
            KeyType::Ed25519 => ed25519::verify(&self.0, message, signature)?,
        };
        if !valid {
            debug!("Signature did not verify under {}", self);
        }
        Ok(valid)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

/// A private key of either scheme.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Key {
    /// secp256k1 key, usually an account key derived from a family root.
    Secp256k1(EcdsaKey),
    /// Ed25519 key.
    Ed25519(Ed25519Key),
}

impl Key {
    /// Derives the key for `sequence` of a seed's family.
    ///
    /// Ed25519 has no hierarchy, so `sequence` only applies to secp256k1.
    pub fn from_seed(seed: &Seed, key_type: KeyType, sequence: u32) -> Result<Self, CoreError> {
        match key_type {
            KeyType::Secp256k1 => Ok(Key::Secp256k1(EcdsaKey::from_seed(seed, sequence)?)),
            KeyType::Ed25519 => Ok(Key::Ed25519(Ed25519Key::from_seed(seed)?)),
        }
    }

    /// The root (node) key of a secp256k1 family, or the Ed25519 key.
    pub fn root_from_seed(seed: &Seed, key_type: KeyType) -> Result<Self, CoreError> {
        match key_type {
            KeyType::Secp256k1 => Ok(Key::Secp256k1(EcdsaKey::root_from_seed(seed)?)),
            KeyType::Ed25519 => Ok(Key::Ed25519(Ed25519Key::from_seed(seed)?)),
        }
    }

    /// Parses a base58 seed and derives the master account key from it.
    pub fn from_seed_base58(text: &str) -> Result<Self, CoreError> {
        let (seed, key_type) = Seed::from_base58(text)?;
        Self::from_seed(&seed, key_type, 0)
    }

    /// Wraps a raw 32-byte secret of the given scheme.
    pub fn from_secret_bytes(key_type: KeyType, bytes: &[u8]) -> Result<Self, CoreError> {
        match key_type {
            KeyType::Secp256k1 => Ok(Key::Secp256k1(EcdsaKey::from_secret_bytes(bytes)?)),
            KeyType::Ed25519 => Ok(Key::Ed25519(Ed25519Key::from_secret_bytes(bytes)?)),
        }
    }

    /// The scheme of this key.
    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Secp256k1(_) => KeyType::Secp256k1,
            Key::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// The scheme-prefixed public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Key::Secp256k1(key) => PublicKey(key.public_bytes()),
            Key::Ed25519(key) => PublicKey(key.public_bytes()),
        }
    }

    /// The account controlled by this key as its master key.
    pub fn account(&self) -> Account {
        self.public_key().account()
    }

    /// The private key as base58 (account private version).
    pub fn private_base58(&self) -> String {
        let secret = match self {
            Key::Secp256k1(key) => key.secret_bytes(),
            Key::Ed25519(key) => key.secret_bytes(),
        };
        base58::encode_versioned(Version::AccountPrivate, &secret, HashNetwork::Ripple)
    }

    /// Signs a full signing body.
    ///
    /// secp256k1 signs the SHA-512 half of `message`; Ed25519 signs `message`.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        match self {
            Key::Secp256k1(key) => key.sign(message),
            Key::Ed25519(key) => key.sign(message),
        }
    }
}
