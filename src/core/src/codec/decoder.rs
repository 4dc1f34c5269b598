//! Strict decoding of canonical serialized objects.
//!
//! The wire form is canonical, so fields out of priority order, repeated
//! fields and misplaced terminators are errors rather than tolerated.

use crate::account::Account;
use crate::amount::Amount;
use crate::codec::encoder::MAX_VL_LENGTH;
use crate::codec::fields::{self, FieldId};
use crate::codec::types::TypeCode;
use crate::errors::CoreError;
use crate::hash::{Hash128, Hash160, Hash192, Hash256, Hash384, Hash512, Hash96, VariableLength};
use crate::path::{Issue, PathSet};
use crate::st::{StObject, StValue};
use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

/// A cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Starts at the beginning of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// True when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CoreError> {
        if self.remaining() < n {
            return Err(CoreError::short_read(n, self.remaining()));
        }
        let bytes = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Takes one byte.
    pub fn read_u8(&mut self) -> Result<u8, CoreError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Takes a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, CoreError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Takes a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CoreError> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Takes a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, CoreError> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }

    /// Takes a 32-byte hash.
    pub fn read_hash256(&mut self) -> Result<Hash256, CoreError> {
        Hash256::from_slice(self.read_bytes(32)?)
    }

    /// Takes a variable length prefix.
    pub fn read_vl_length(&mut self) -> Result<usize, CoreError> {
        let b1 = self.read_u8()? as usize;
        match b1 {
            0..=192 => Ok(b1),
            193..=240 => {
                let b2 = self.read_u8()? as usize;
                Ok(193 + (b1 - 193) * 256 + b2)
            }
            241..=254 => {
                let b2 = self.read_u8()? as usize;
                let b3 = self.read_u8()? as usize;
                let length = 12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3;
                if length > MAX_VL_LENGTH {
                    return Err(CoreError::OversizedLength(length));
                }
                Ok(length)
            }
            _ => Err(CoreError::OversizedLength(b1)),
        }
    }

    /// Takes a length-prefixed byte string.
    pub fn read_vl(&mut self) -> Result<&'a [u8], CoreError> {
        let length = self.read_vl_length()?;
        self.read_bytes(length)
    }

    /// Takes a field tag and resolves it against the dictionary.
    pub fn read_field_id(&mut self) -> Result<FieldId, CoreError> {
        let first = self.read_u8()?;
        let mut type_code = first >> 4;
        let mut field_code = first & 0x0F;
        if type_code == 0 {
            type_code = self.read_u8()?;
            if type_code < 16 {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "non-canonical tag for type {}",
                    type_code
                )));
            }
        }
        if field_code == 0 {
            field_code = self.read_u8()?;
            if field_code < 16 {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "non-canonical tag for field {}",
                    field_code
                )));
            }
        }
        FieldId::lookup(type_code, field_code)
    }

    fn read_value(&mut self, field: FieldId) -> Result<StValue, CoreError> {
        Ok(match field.type_code {
            TypeCode::UInt8 => StValue::UInt8(self.read_u8()?),
            TypeCode::UInt16 => StValue::UInt16(self.read_u16()?),
            TypeCode::UInt32 => StValue::UInt32(self.read_u32()?),
            TypeCode::UInt64 => StValue::UInt64(self.read_u64()?),
            TypeCode::Hash128 => StValue::Hash128(Hash128::from_slice(self.read_bytes(16)?)?),
            TypeCode::Hash160 => StValue::Hash160(Hash160::from_slice(self.read_bytes(20)?)?),
            TypeCode::Hash256 => StValue::Hash256(self.read_hash256()?),
            TypeCode::UInt96 => StValue::UInt96(Hash96::from_slice(self.read_bytes(12)?)?),
            TypeCode::UInt192 => StValue::UInt192(Hash192::from_slice(self.read_bytes(24)?)?),
            TypeCode::UInt384 => StValue::UInt384(Hash384::from_slice(self.read_bytes(48)?)?),
            TypeCode::UInt512 => StValue::UInt512(Hash512::from_slice(self.read_bytes(64)?)?),
            TypeCode::Amount => {
                let (amount, used) = Amount::read_from(&self.input[self.pos..])?;
                self.pos += used;
                StValue::Amount(amount)
            }
            TypeCode::Blob => StValue::Blob(VariableLength::from(self.read_vl()?)),
            TypeCode::AccountId => StValue::AccountId(Account::from_slice(self.read_vl()?)?),
            TypeCode::PathSet => {
                let (paths, used) = PathSet::read_from(&self.input[self.pos..])?;
                self.pos += used;
                StValue::PathSet(paths)
            }
            TypeCode::Issue => {
                let (issue, used) = Issue::read_from(&self.input[self.pos..])?;
                self.pos += used;
                StValue::Issue(issue)
            }
            TypeCode::Vector256 => {
                let bytes = self.read_vl()?;
                if bytes.len() % 32 != 0 {
                    return Err(CoreError::UnexpectedFieldType(format!(
                        "{} length {} is not a multiple of 32",
                        field,
                        bytes.len()
                    )));
                }
                let hashes = bytes
                    .chunks(32)
                    .map(Hash256::from_slice)
                    .collect::<Result<Vec<_>, _>>()?;
                StValue::Vector256(hashes)
            }
            TypeCode::Object => StValue::Object(self.read_object(true)?),
            TypeCode::Array => StValue::Array(self.read_array()?),
        })
    }

    /// Reads fields until the end of input (top level) or an `EndOfObject`
    /// marker (nested).
    pub fn read_object(&mut self, nested: bool) -> Result<StObject, CoreError> {
        let mut object = StObject::new();
        let mut last: Option<FieldId> = None;
        loop {
            if !nested && self.is_empty() {
                return Ok(object);
            }
            let field = self.read_field_id()?;
            if field == fields::END_OF_OBJECT {
                if nested {
                    return Ok(object);
                }
                return Err(CoreError::UnexpectedFieldType(
                    "EndOfObject at top level".to_string(),
                ));
            }
            if field == fields::END_OF_ARRAY {
                return Err(CoreError::UnexpectedFieldType(
                    "EndOfArray inside an object".to_string(),
                ));
            }
            if let Some(previous) = last {
                if field <= previous {
                    return Err(CoreError::UnexpectedFieldType(format!(
                        "{} after {}: fields out of order or repeated",
                        field, previous
                    )));
                }
            }
            trace!("Decoding field {:?} at offset {}", field, self.pos);
            let value = self.read_value(field)?;
            object.set(field, value)?;
            last = Some(field);
        }
    }

    /// Reads wrapped objects until an `EndOfArray` marker.
    pub fn read_array(&mut self) -> Result<Vec<(FieldId, StObject)>, CoreError> {
        let mut items = Vec::new();
        loop {
            let field = self.read_field_id()?;
            if field == fields::END_OF_ARRAY {
                return Ok(items);
            }
            if field.type_code != TypeCode::Object || field == fields::END_OF_OBJECT {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "{} inside an array",
                    field
                )));
            }
            items.push((field, self.read_object(true)?));
        }
    }
}

/// Decodes a whole top-level object.
pub fn decode(bytes: &[u8]) -> Result<StObject, CoreError> {
    Decoder::new(bytes).read_object(false)
}
