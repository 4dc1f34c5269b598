//! Ledger state entries.

use crate::codec::fields::{self, FieldId};
use crate::codec::{self, json};
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable};
use crate::objects::format::{self, Format};
use crate::st::{StObject, StValue};
use std::fmt;

/// The supported ledger entry types. Codes are ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerEntryType {
    AccountRoot,
    DirectoryNode,
    Amendments,
    LedgerHashes,
    Offer,
    RippleState,
    FeeSettings,
    Escrow,
    SignerList,
    Ticket,
    Amm,
}

impl LedgerEntryType {
    /// Every supported type.
    pub const ALL: [LedgerEntryType; 11] = [
        LedgerEntryType::AccountRoot,
        LedgerEntryType::DirectoryNode,
        LedgerEntryType::Amendments,
        LedgerEntryType::LedgerHashes,
        LedgerEntryType::Offer,
        LedgerEntryType::RippleState,
        LedgerEntryType::FeeSettings,
        LedgerEntryType::Escrow,
        LedgerEntryType::SignerList,
        LedgerEntryType::Ticket,
        LedgerEntryType::Amm,
    ];

    /// The `LedgerEntryType` field value.
    pub fn code(&self) -> u16 {
        let c = match self {
            LedgerEntryType::AccountRoot => b'a',
            LedgerEntryType::DirectoryNode => b'd',
            LedgerEntryType::Amendments => b'f',
            LedgerEntryType::LedgerHashes => b'h',
            LedgerEntryType::Offer => b'o',
            LedgerEntryType::RippleState => b'r',
            LedgerEntryType::FeeSettings => b's',
            LedgerEntryType::Escrow => b'u',
            LedgerEntryType::SignerList => b'S',
            LedgerEntryType::Ticket => b'T',
            LedgerEntryType::Amm => b'y',
        };
        u16::from(c)
    }

    /// Resolves a wire code.
    pub fn from_code(code: u16) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(CoreError::UnsupportedLedgerEntryType(code))
    }

    /// The template describing this type's fields.
    pub fn format(&self) -> &'static Format {
        match self {
            LedgerEntryType::AccountRoot => &format::ACCOUNT_ROOT,
            LedgerEntryType::DirectoryNode => &format::DIRECTORY_NODE,
            LedgerEntryType::Amendments => &format::AMENDMENTS,
            LedgerEntryType::LedgerHashes => &format::LEDGER_HASHES,
            LedgerEntryType::Offer => &format::OFFER,
            LedgerEntryType::RippleState => &format::RIPPLE_STATE,
            LedgerEntryType::FeeSettings => &format::FEE_SETTINGS,
            LedgerEntryType::Escrow => &format::ESCROW,
            LedgerEntryType::SignerList => &format::SIGNER_LIST,
            LedgerEntryType::Ticket => &format::TICKET,
            LedgerEntryType::Amm => &format::AMM,
        }
    }

    /// The canonical name, e.g. `"RippleState"`.
    pub fn name(&self) -> &'static str {
        self.format().name
    }

    /// Resolves a canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A ledger entry and the index it lives at.
///
/// The index is the entry's key in the state trie; it is not part of the
/// entry's own serialization, so a `LedgerIndex` field found on input is
/// moved out into `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    entry_type: LedgerEntryType,
    index: Hash256,
    object: StObject,
}

impl LedgerEntry {
    /// Starts an entry with its type and zero flags.
    pub fn new(entry_type: LedgerEntryType, index: Hash256) -> Result<Self, CoreError> {
        let object = StObject::new()
            .with(fields::LEDGER_ENTRY_TYPE, StValue::UInt16(entry_type.code()))?
            .with(fields::FLAGS, StValue::UInt32(0))?;
        Ok(Self {
            entry_type,
            index,
            object,
        })
    }

    /// Wraps an object, taking the index from its `LedgerIndex` field if
    /// present and zero otherwise.
    pub fn from_object(mut object: StObject) -> Result<Self, CoreError> {
        let code = object.get_u16(fields::LEDGER_ENTRY_TYPE).ok_or_else(|| {
            CoreError::MissingField {
                field: fields::LEDGER_ENTRY_TYPE.name(),
                object: "LedgerEntry".to_string(),
            }
        })?;
        let entry_type = LedgerEntryType::from_code(code)?;
        let index = match object.remove(fields::LEDGER_INDEX) {
            Some(StValue::Hash256(index)) => index,
            _ => Hash256::zero(),
        };
        Ok(Self {
            entry_type,
            index,
            object,
        })
    }

    /// Decodes canonical bytes stored under `index`.
    pub fn from_bytes(bytes: &[u8], index: Hash256) -> Result<Self, CoreError> {
        let mut entry = Self::from_object(codec::decode(bytes)?)?;
        entry.index = index;
        Ok(entry)
    }

    /// Canonical bytes, without the index.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode(&self.object)
    }

    /// Parses the JSON form; `index` is read from `LedgerIndex` or `index`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        let mut body = value.clone();
        let mut index = None;
        if let Some(map) = body.as_object_mut() {
            if let Some(text) = map.remove("index") {
                let text = text
                    .as_str()
                    .ok_or_else(|| CoreError::InvalidJson("index must be a string".to_string()))?;
                index = Some(Hash256::from_hex(text)?);
            }
        }
        let mut entry = Self::from_object(json::from_json(&body)?)?;
        if let Some(index) = index {
            entry.index = index;
        }
        Ok(entry)
    }

    /// The JSON form, with the index as `LedgerIndex`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = json::to_json(&self.object);
        if let Some(map) = value.as_object_mut() {
            map.insert(
                fields::LEDGER_INDEX.name().to_string(),
                serde_json::Value::String(self.index.to_string()),
            );
        }
        value
    }

    /// Sets a field. `LedgerEntryType` and `LedgerIndex` cannot be set this way.
    pub fn set(&mut self, field: FieldId, value: StValue) -> Result<(), CoreError> {
        if field == fields::LEDGER_ENTRY_TYPE || field == fields::LEDGER_INDEX {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} is fixed at construction",
                field
            )));
        }
        self.object.set(field, value)
    }

    /// Builder form of [`LedgerEntry::set`].
    pub fn with(mut self, field: FieldId, value: StValue) -> Result<Self, CoreError> {
        self.set(field, value)?;
        Ok(self)
    }

    pub fn entry_type(&self) -> LedgerEntryType {
        self.entry_type
    }

    pub fn index(&self) -> Hash256 {
        self.index
    }

    pub fn object(&self) -> &StObject {
        &self.object
    }

    pub fn flags(&self) -> u32 {
        self.object.get_u32(fields::FLAGS).unwrap_or(0)
    }

    /// Checks the fields against this type's template.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.entry_type.format().validate(&self.object)
    }
}

impl Hashable for LedgerEntry {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::LeafNode
    }

    /// Entry bytes followed by the index, as hashed in a state trie leaf.
    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        let mut body = self.to_bytes()?;
        body.extend_from_slice(self.index.as_bytes());
        Ok(body)
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.entry_type, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::amount::Amount;
    use crate::crypto::hash::sha512_half;
    use crate::hashing::account_root_index;

    fn account_root() -> LedgerEntry {
        let account = Account([9; 20]);
        LedgerEntry::new(LedgerEntryType::AccountRoot, account_root_index(&account))
            .unwrap()
            .with(fields::ACCOUNT, StValue::AccountId(account))
            .unwrap()
            .with(fields::SEQUENCE, StValue::UInt32(1))
            .unwrap()
            .with(
                fields::BALANCE,
                StValue::Amount(Amount::from_drops(100_000_000).unwrap()),
            )
            .unwrap()
            .with(fields::OWNER_COUNT, StValue::UInt32(0))
            .unwrap()
            .with(fields::PREVIOUS_TXN_ID, StValue::Hash256(Hash256([1; 32])))
            .unwrap()
            .with(fields::PREVIOUS_TXN_LGR_SEQ, StValue::UInt32(5))
            .unwrap()
    }

    #[test]
    fn test_type_codes() {
        for t in LedgerEntryType::ALL {
            assert_eq!(LedgerEntryType::from_code(t.code()).unwrap(), t);
            assert_eq!(LedgerEntryType::from_name(t.name()), Some(t));
        }
        assert_eq!(LedgerEntryType::AccountRoot.code(), 0x61);
        assert_eq!(LedgerEntryType::Amm.code(), 0x79);
        assert_eq!(
            LedgerEntryType::from_code(0x7A),
            Err(CoreError::UnsupportedLedgerEntryType(0x7A))
        );
    }

    #[test]
    fn test_round_trip_and_leaf_hash() {
        let entry = account_root();
        entry.validate().unwrap();
        let bytes = entry.to_bytes().unwrap();
        let decoded = LedgerEntry::from_bytes(&bytes, entry.index()).unwrap();
        assert_eq!(decoded, entry);

        let mut preimage = b"MLN\0".to_vec();
        preimage.extend_from_slice(&bytes);
        preimage.extend_from_slice(entry.index().as_bytes());
        assert_eq!(entry.hash().unwrap(), sha512_half(&preimage));
    }

    #[test]
    fn test_ledger_index_moves_out_of_the_object() {
        let entry = account_root();
        let with_index = entry
            .object()
            .clone()
            .with(fields::LEDGER_INDEX, StValue::Hash256(entry.index()))
            .unwrap();
        let rebuilt = LedgerEntry::from_object(with_index).unwrap();
        assert_eq!(rebuilt, entry);
        assert!(!rebuilt.object().contains(fields::LEDGER_INDEX));

        let json = entry.to_json();
        assert_eq!(LedgerEntry::from_json(&json).unwrap(), entry);
    }

    #[test]
    fn test_missing_required_field() {
        let entry = LedgerEntry::new(LedgerEntryType::Ticket, Hash256::zero()).unwrap();
        assert!(matches!(
            entry.validate(),
            Err(CoreError::MissingField { object, .. }) if object == "Ticket"
        ));
    }
}
