//! JSON form of serialized objects.
//!
//! Objects become JSON objects keyed by field name. Arrays are lists of
//! single-key wrappers (`[{"Memo": {...}}]`). `TransactionType`,
//! `LedgerEntryType` and `TransactionResult` are written as names and read
//! back from either names or numbers.

use crate::account::Account;
use crate::amount::Amount;
use crate::codec::fields::{self, FieldId};
use crate::codec::types::TypeCode;
use crate::errors::CoreError;
use crate::hash::{Hash128, Hash160, Hash192, Hash256, Hash384, Hash512, Hash96, VariableLength};
use crate::objects::ledger_entry::LedgerEntryType;
use crate::objects::result::TransactionResult;
use crate::objects::transaction::TransactionType;
use crate::path::{Issue, PathSet};
use crate::st::{StObject, StValue};
use serde_json::{Map, Value as Json};

/// The JSON object form of `object`.
pub fn to_json(object: &StObject) -> Json {
    let mut map = Map::new();
    for (field, value) in object {
        map.insert(field.name().to_string(), value_to_json(*field, value));
    }
    Json::Object(map)
}

fn value_to_json(field: FieldId, value: &StValue) -> Json {
    match value {
        StValue::UInt8(v) => {
            if field == fields::TRANSACTION_RESULT {
                Json::String(TransactionResult(*v).to_string())
            } else {
                Json::from(*v)
            }
        }
        StValue::UInt16(v) => {
            let name = match field {
                fields::TRANSACTION_TYPE => TransactionType::from_code(*v).ok().map(|t| t.name()),
                fields::LEDGER_ENTRY_TYPE => LedgerEntryType::from_code(*v).ok().map(|t| t.name()),
                _ => None,
            };
            match name {
                Some(name) => Json::String(name.to_string()),
                None => Json::from(*v),
            }
        }
        StValue::UInt32(v) => Json::from(*v),
        StValue::UInt64(v) => Json::String(format!("{:016X}", v)),
        StValue::Hash128(h) => Json::String(h.to_string()),
        StValue::Hash160(h) => Json::String(h.to_string()),
        StValue::Hash256(h) => Json::String(h.to_string()),
        StValue::UInt96(h) => Json::String(h.to_string()),
        StValue::UInt192(h) => Json::String(h.to_string()),
        StValue::UInt384(h) => Json::String(h.to_string()),
        StValue::UInt512(h) => Json::String(h.to_string()),
        StValue::Amount(amount) => amount.to_json(),
        StValue::Blob(blob) => Json::String(blob.to_string()),
        StValue::AccountId(account) => Json::String(account.to_string()),
        StValue::Object(object) => to_json(object),
        StValue::Array(items) => Json::Array(
            items
                .iter()
                .map(|(wrapper, object)| {
                    let mut map = Map::new();
                    map.insert(wrapper.name().to_string(), to_json(object));
                    Json::Object(map)
                })
                .collect(),
        ),
        StValue::PathSet(paths) => paths.to_json(),
        StValue::Vector256(hashes) => Json::Array(
            hashes
                .iter()
                .map(|h| Json::String(h.to_string()))
                .collect(),
        ),
        StValue::Issue(issue) => issue.to_json(),
    }
}

/// Parses the JSON object form.
pub fn from_json(json: &Json) -> Result<StObject, CoreError> {
    let map = json
        .as_object()
        .ok_or_else(|| CoreError::InvalidJson(format!("expected an object, got {}", json)))?;
    let mut object = StObject::new();
    for (name, value) in map {
        let field = FieldId::by_name(name)
            .ok_or_else(|| CoreError::InvalidJson(format!("unknown field {}", name)))?;
        object.set(field, value_from_json(field, value)?)?;
    }
    Ok(object)
}

fn invalid(field: FieldId, value: &Json) -> CoreError {
    CoreError::InvalidJson(format!("bad value for {}: {}", field, value))
}

fn as_str(field: FieldId, value: &Json) -> Result<&str, CoreError> {
    value.as_str().ok_or_else(|| invalid(field, value))
}

fn as_uint(field: FieldId, value: &Json, max: u64) -> Result<u64, CoreError> {
    value
        .as_u64()
        .filter(|v| *v <= max)
        .ok_or_else(|| invalid(field, value))
}

fn value_from_json(field: FieldId, value: &Json) -> Result<StValue, CoreError> {
    Ok(match field.type_code {
        TypeCode::UInt8 => {
            if field == fields::TRANSACTION_RESULT && value.is_string() {
                let token = as_str(field, value)?;
                let result = TransactionResult::from_token(token)
                    .ok_or_else(|| invalid(field, value))?;
                StValue::UInt8(result.0)
            } else {
                StValue::UInt8(as_uint(field, value, u64::from(u8::MAX))? as u8)
            }
        }
        TypeCode::UInt16 => {
            if let Some(name) = value.as_str() {
                let code = match field {
                    fields::TRANSACTION_TYPE => TransactionType::from_name(name).map(|t| t.code()),
                    fields::LEDGER_ENTRY_TYPE => LedgerEntryType::from_name(name).map(|t| t.code()),
                    _ => None,
                };
                StValue::UInt16(code.ok_or_else(|| invalid(field, value))?)
            } else {
                StValue::UInt16(as_uint(field, value, u64::from(u16::MAX))? as u16)
            }
        }
        TypeCode::UInt32 => StValue::UInt32(as_uint(field, value, u64::from(u32::MAX))? as u32),
        TypeCode::UInt64 => {
            let text = as_str(field, value)?;
            if text.is_empty() || text.len() > 16 {
                return Err(invalid(field, value));
            }
            StValue::UInt64(u64::from_str_radix(text, 16).map_err(|_| invalid(field, value))?)
        }
        TypeCode::Hash128 => StValue::Hash128(Hash128::from_hex(as_str(field, value)?)?),
        TypeCode::Hash160 => StValue::Hash160(Hash160::from_hex(as_str(field, value)?)?),
        TypeCode::Hash256 => StValue::Hash256(Hash256::from_hex(as_str(field, value)?)?),
        TypeCode::UInt96 => StValue::UInt96(Hash96::from_hex(as_str(field, value)?)?),
        TypeCode::UInt192 => StValue::UInt192(Hash192::from_hex(as_str(field, value)?)?),
        TypeCode::UInt384 => StValue::UInt384(Hash384::from_hex(as_str(field, value)?)?),
        TypeCode::UInt512 => StValue::UInt512(Hash512::from_hex(as_str(field, value)?)?),
        TypeCode::Amount => StValue::Amount(Amount::from_json(value)?),
        TypeCode::Blob => StValue::Blob(VariableLength::from_hex(as_str(field, value)?)?),
        TypeCode::AccountId => StValue::AccountId(as_str(field, value)?.parse::<Account>()?),
        TypeCode::Object => StValue::Object(from_json(value)?),
        TypeCode::Array => {
            let items = value.as_array().ok_or_else(|| invalid(field, value))?;
            let mut wrapped = Vec::with_capacity(items.len());
            for item in items {
                let map = item
                    .as_object()
                    .filter(|m| m.len() == 1)
                    .ok_or_else(|| invalid(field, item))?;
                for (name, inner) in map {
                    let wrapper = FieldId::by_name(name)
                        .ok_or_else(|| CoreError::InvalidJson(format!("unknown field {}", name)))?;
                    wrapped.push((wrapper, from_json(inner)?));
                }
            }
            StValue::Array(wrapped)
        }
        TypeCode::PathSet => StValue::PathSet(PathSet::from_json(value)?),
        TypeCode::Vector256 => {
            let items = value.as_array().ok_or_else(|| invalid(field, value))?;
            let hashes = items
                .iter()
                .map(|item| Hash256::from_hex(as_str(field, item)?))
                .collect::<Result<Vec<_>, _>>()?;
            StValue::Vector256(hashes)
        }
        TypeCode::Issue => StValue::Issue(Issue::from_json(value)?),
    })
}
