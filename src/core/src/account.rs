//! Account identifiers.

use crate::base58::{self, HashNetwork, Version};
use crate::crypto::hash::sha256_ripemd160;
use crate::errors::CoreError;
use crate::hash::Hash256;
use std::fmt;
use std::str::FromStr;

/// A 20-byte account id, rendered as a base58 `r...` address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Account(pub [u8; 20]);

impl Account {
    /// The all-zero account, used by pseudo-transactions.
    pub const ZERO: Account = Account([0u8; 20]);

    /// The account whose id is the integer one; a placeholder issuer.
    pub const ONE: Account = Account([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    /// Copies an id out of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 20 {
            return Err(CoreError::UnexpectedFieldType(format!(
                "account id must be 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Account(out))
    }

    /// RIPEMD-160 of SHA-256 of a public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Account(sha256_ripemd160(public_key).to_bytes())
    }

    /// Returns true for the zero account.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The id left-aligned in a 256-bit value, zero filled.
    pub fn widen(&self) -> Hash256 {
        let mut out = [0u8; 32];
        out[..20].copy_from_slice(&self.0);
        Hash256(out)
    }

    /// Renders the id with the given network's alphabet.
    pub fn to_base58(&self, network: HashNetwork) -> String {
        base58::encode_versioned(Version::AccountId, &self.0, network)
    }

    /// Parses an address in the given network's alphabet.
    pub fn from_base58(text: &str, network: HashNetwork) -> Result<Self, CoreError> {
        let bytes = base58::decode_versioned(text, Version::AccountId, network)?;
        Account::from_slice(&bytes)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58(HashNetwork::Ripple))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self)
    }
}

impl FromStr for Account {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Account::from_base58(s, HashNetwork::Ripple)
    }
}

impl serde::Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AccountVisitor;

        impl<'de> serde::de::Visitor<'de> for AccountVisitor {
            type Value = Account;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a base58 account address")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AccountVisitor)
    }
}
