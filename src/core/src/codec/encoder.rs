//! Canonical binary encoding of serialized objects.

use crate::codec::fields::{self, FieldId};
use crate::errors::CoreError;
use crate::st::{StObject, StValue};

/// Largest length a variable length prefix can express.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Which fields of the top-level object to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter {
    /// Every field.
    All,
    /// Leave out fields flagged not-signing.
    SigningOnly,
}

/// Appends the 1 to 3 byte length prefix of a variable length value.
pub fn write_vl_length(out: &mut Vec<u8>, length: usize) -> Result<(), CoreError> {
    if length <= 192 {
        out.push(length as u8);
    } else if length <= 12_480 {
        let n = length - 193;
        out.push(193 + (n >> 8) as u8);
        out.push((n & 0xFF) as u8);
    } else if length <= MAX_VL_LENGTH {
        let n = length - 12_481;
        out.push(241 + (n >> 16) as u8);
        out.push(((n >> 8) & 0xFF) as u8);
        out.push((n & 0xFF) as u8);
    } else {
        return Err(CoreError::OversizedLength(length));
    }
    Ok(())
}

/// Appends `bytes` behind its length prefix.
pub fn write_vl(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), CoreError> {
    write_vl_length(out, bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Serializes into an owned buffer.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// An empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the encoder, returning the bytes written.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Writes the fields of a top-level object, without a terminator.
    pub fn write_object(&mut self, object: &StObject, filter: FieldFilter) -> Result<(), CoreError> {
        for (field, value) in object {
            if filter == FieldFilter::SigningOnly && !field.is_signing() {
                continue;
            }
            self.write_field(*field, value)?;
        }
        Ok(())
    }

    /// Writes one tagged field.
    pub fn write_field(&mut self, field: FieldId, value: &StValue) -> Result<(), CoreError> {
        field.write_tag(&mut self.buf);
        self.write_value(value)
    }

    fn write_value(&mut self, value: &StValue) -> Result<(), CoreError> {
        let out = &mut self.buf;
        match value {
            StValue::UInt8(v) => out.push(*v),
            StValue::UInt16(v) => out.extend_from_slice(&v.to_be_bytes()),
            StValue::UInt32(v) => out.extend_from_slice(&v.to_be_bytes()),
            StValue::UInt64(v) => out.extend_from_slice(&v.to_be_bytes()),
            StValue::Hash128(h) => out.extend_from_slice(h.as_bytes()),
            StValue::Hash160(h) => out.extend_from_slice(h.as_bytes()),
            StValue::Hash256(h) => out.extend_from_slice(h.as_bytes()),
            StValue::UInt96(h) => out.extend_from_slice(h.as_bytes()),
            StValue::UInt192(h) => out.extend_from_slice(h.as_bytes()),
            StValue::UInt384(h) => out.extend_from_slice(h.as_bytes()),
            StValue::UInt512(h) => out.extend_from_slice(h.as_bytes()),
            StValue::Amount(amount) => amount.write_to(out),
            StValue::Blob(blob) => write_vl(out, blob.as_bytes())?,
            StValue::AccountId(account) => write_vl(out, account.as_bytes())?,
            StValue::PathSet(paths) => paths.write_to(out),
            StValue::Issue(issue) => issue.write_to(out),
            StValue::Vector256(hashes) => {
                write_vl_length(out, hashes.len() * 32)?;
                for hash in hashes {
                    out.extend_from_slice(hash.as_bytes());
                }
            }
            StValue::Object(object) => {
                self.write_object(object, FieldFilter::All)?;
                fields::END_OF_OBJECT.write_tag(&mut self.buf);
            }
            StValue::Array(items) => {
                for (field, object) in items {
                    field.write_tag(&mut self.buf);
                    self.write_object(object, FieldFilter::All)?;
                    fields::END_OF_OBJECT.write_tag(&mut self.buf);
                }
                fields::END_OF_ARRAY.write_tag(&mut self.buf);
            }
        }
        Ok(())
    }
}

/// Canonical bytes of a top-level object.
pub fn encode(object: &StObject) -> Result<Vec<u8>, CoreError> {
    let mut encoder = Encoder::new();
    encoder.write_object(object, FieldFilter::All)?;
    Ok(encoder.finish())
}

/// Canonical bytes of a top-level object without its not-signing fields.
///
/// Only the top level is filtered; nested objects are written whole.
pub fn encode_for_signing(object: &StObject) -> Result<Vec<u8>, CoreError> {
    let mut encoder = Encoder::new();
    encoder.write_object(object, FieldFilter::SigningOnly)?;
    Ok(encoder.finish())
}
