//! Family seeds: the 16 bytes every key of an account family is derived from.

use crate::base58::{self, HashNetwork, Version, ED25519_SEED_PREFIX};
use crate::crypto::hash::sha512_half;
use crate::errors::CoreError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The signature scheme a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// ECDSA over secp256k1, with the hierarchical derivation.
    Secp256k1,
    /// Ed25519, no hierarchy.
    Ed25519,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Secp256k1 => write!(f, "secp256k1"),
            KeyType::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// A 16-byte family seed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(pub [u8; 16]);

impl Seed {
    /// Derives a seed from a passphrase: the first 16 bytes of its SHA-512 half.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let hash = sha512_half(passphrase.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash.as_bytes()[..16]);
        Seed(bytes)
    }

    /// Draws a seed from the operating system's random source.
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Seed(bytes)
    }

    /// Copies a seed from exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 16 {
            return Err(CoreError::BadBase58(format!(
                "seed must be 16 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(bytes);
        Ok(Seed(out))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Renders the seed for `key_type`: `s...` for secp256k1, `sEd...` for Ed25519.
    pub fn to_base58(&self, key_type: KeyType) -> String {
        match key_type {
            KeyType::Secp256k1 => {
                base58::encode_versioned(Version::FamilySeed, &self.0, HashNetwork::Ripple)
            }
            KeyType::Ed25519 => {
                base58::encode_with_prefix(&ED25519_SEED_PREFIX, &self.0, HashNetwork::Ripple)
            }
        }
    }

    /// Parses either seed form, reporting which scheme it was written for.
    pub fn from_base58(text: &str) -> Result<(Self, KeyType), CoreError> {
        if let Ok(bytes) =
            base58::decode_with_prefix(text, &ED25519_SEED_PREFIX, 16, HashNetwork::Ripple)
        {
            return Ok((Seed::from_slice(&bytes)?, KeyType::Ed25519));
        }
        let bytes = base58::decode_versioned(text, Version::FamilySeed, HashNetwork::Ripple)?;
        Ok((Seed::from_slice(&bytes)?, KeyType::Secp256k1))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print seed material.
        write!(f, "Seed(..)")
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58(KeyType::Secp256k1))
    }
}
