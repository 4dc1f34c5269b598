//! Configuration for callers of the core.

use crate::account::Account;
use crate::base58::HashNetwork;
use crate::errors::CoreError;
use crate::hashing::Signable;
use crate::signing;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the core.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Network configuration
    pub network: NetworkConfig,
    /// Signature checking configuration
    pub signing: SigningConfig,
    /// Node store configuration
    pub store: StoreConfig,
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Alphabet used when rendering base58 identities
    pub alphabet: HashNetwork,
}

impl NetworkConfig {
    /// Renders an account id with the configured alphabet.
    pub fn account_to_string(&self, account: &Account) -> String {
        account.to_base58(self.alphabet)
    }

    /// Parses an account id written in the configured alphabet.
    pub fn account_from_str(&self, text: &str) -> Result<Account, CoreError> {
        Account::from_base58(text, self.alphabet)
    }
}

/// Signature checking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Reject high-S ECDSA signatures instead of normalising them
    pub require_fully_canonical: bool,
}

impl SigningConfig {
    /// Verifies `object`'s signature under this configuration.
    pub fn verify<T: Signable>(&self, object: &T) -> Result<bool, CoreError> {
        signing::verify_with(object, self.require_fully_canonical)
    }
}

/// Node store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Ledger sequence stamped into stored nodes when the caller has none
    pub default_ledger_sequence: u32,
}

impl CoreConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| CoreError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CoreError::ConfigError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CoreError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CoreError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::ConfigError(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| CoreError::ConfigError(format!("{}: {}", path.display(), e)))
    }
}
