//! Validations: a validator's signed statement that it built a given ledger.

use crate::codec::fields::{self, FieldId};
use crate::codec::{self, json};
use crate::crypto::PublicKey;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable, Signable};
use crate::objects::format::{Format, Requirement};
use crate::st::{StObject, StValue};
use Requirement::{Optional, Required};

/// Set on a validation for a fully validated ledger.
pub const FLAG_FULL_VALIDATION: u32 = 0x0000_0001;

/// Set when `SigningTime` and friends are fully canonical.
pub const FLAG_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// Template of a validation.
pub static VALIDATION: Format = Format {
    name: "Validation",
    common: &[],
    fields: &[
        (fields::FLAGS, Required),
        (fields::LEDGER_SEQUENCE, Required),
        (fields::CLOSE_TIME, Optional),
        (fields::SIGNING_TIME, Required),
        (fields::LOAD_FEE, Optional),
        (fields::BASE_FEE, Optional),
        (fields::COOKIE, Optional),
        (fields::LEDGER_HASH, Required),
        (fields::CONSENSUS_HASH, Optional),
        (fields::VALIDATED_HASH, Optional),
        (fields::RESERVE_BASE, Optional),
        (fields::RESERVE_INCREMENT, Optional),
        (fields::SIGNING_PUB_KEY, Required),
        (fields::SIGNATURE, Required),
        (fields::AMENDMENTS, Optional),
    ],
};

/// A validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    object: StObject,
}

impl Validation {
    /// An unsigned validation of `ledger_hash`.
    pub fn new(
        ledger_sequence: u32,
        ledger_hash: Hash256,
        signing_time: u32,
        flags: u32,
    ) -> Result<Self, CoreError> {
        let object = StObject::new()
            .with(fields::FLAGS, StValue::UInt32(flags))?
            .with(fields::LEDGER_SEQUENCE, StValue::UInt32(ledger_sequence))?
            .with(fields::SIGNING_TIME, StValue::UInt32(signing_time))?
            .with(fields::LEDGER_HASH, StValue::Hash256(ledger_hash))?;
        Ok(Self { object })
    }

    pub fn from_object(object: StObject) -> Self {
        Self { object }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(Self::from_object(codec::decode(bytes)?))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode(&self.object)
    }

    pub fn to_json(&self) -> serde_json::Value {
        json::to_json(&self.object)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        Ok(Self::from_object(json::from_json(value)?))
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: FieldId, value: StValue) -> Result<Self, CoreError> {
        self.object.set(field, value)?;
        Ok(self)
    }

    pub fn object(&self) -> &StObject {
        &self.object
    }

    pub fn ledger_sequence(&self) -> Option<u32> {
        self.object.get_u32(fields::LEDGER_SEQUENCE)
    }

    pub fn ledger_hash(&self) -> Option<Hash256> {
        self.object.get_hash256(fields::LEDGER_HASH)
    }

    pub fn is_full(&self) -> bool {
        self.object.get_u32(fields::FLAGS).unwrap_or(0) & FLAG_FULL_VALIDATION != 0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        VALIDATION.validate(&self.object)
    }
}

impl Hashable for Validation {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::Validation
    }

    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        self.to_bytes()
    }
}

impl Signable for Validation {
    fn signing_prefix(&self) -> HashPrefix {
        HashPrefix::Validation
    }

    fn signing_body(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode_for_signing(&self.object)
    }

    fn signing_public_key(&self) -> Option<&[u8]> {
        self.object.get_blob(fields::SIGNING_PUB_KEY)
    }

    fn signature(&self) -> Option<&[u8]> {
        self.object.get_blob(fields::SIGNATURE)
    }

    fn set_signing_public_key(&mut self, key: &PublicKey) -> Result<(), CoreError> {
        self.object.set(
            fields::SIGNING_PUB_KEY,
            StValue::Blob(key.as_bytes().into()),
        )
    }

    fn set_signature(&mut self, signature: Vec<u8>) -> Result<(), CoreError> {
        self.object
            .set(fields::SIGNATURE, StValue::Blob(signature.into()))
    }
}
