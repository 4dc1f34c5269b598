//! Serialized type codes.

use crate::errors::CoreError;
use std::fmt;

/// The type half of a field's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
    UInt96 = 20,
    UInt192 = 21,
    UInt384 = 22,
    UInt512 = 23,
    Issue = 24,
}

impl TypeCode {
    /// Looks up a wire type code.
    pub fn from_u8(code: u8) -> Result<Self, CoreError> {
        Ok(match code {
            1 => TypeCode::UInt16,
            2 => TypeCode::UInt32,
            3 => TypeCode::UInt64,
            4 => TypeCode::Hash128,
            5 => TypeCode::Hash256,
            6 => TypeCode::Amount,
            7 => TypeCode::Blob,
            8 => TypeCode::AccountId,
            14 => TypeCode::Object,
            15 => TypeCode::Array,
            16 => TypeCode::UInt8,
            17 => TypeCode::Hash160,
            18 => TypeCode::PathSet,
            19 => TypeCode::Vector256,
            20 => TypeCode::UInt96,
            21 => TypeCode::UInt192,
            22 => TypeCode::UInt384,
            23 => TypeCode::UInt512,
            24 => TypeCode::Issue,
            other => return Err(CoreError::UnknownTypeCode(other)),
        })
    }

    /// The wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True for types whose values carry a variable length prefix.
    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            TypeCode::Blob | TypeCode::AccountId | TypeCode::Vector256
        )
    }

    /// Width of fixed-size values, `None` for everything else.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TypeCode::UInt8 => Some(1),
            TypeCode::UInt16 => Some(2),
            TypeCode::UInt32 => Some(4),
            TypeCode::UInt64 => Some(8),
            TypeCode::UInt96 => Some(12),
            TypeCode::Hash128 => Some(16),
            TypeCode::Hash160 => Some(20),
            TypeCode::UInt192 => Some(24),
            TypeCode::Hash256 => Some(32),
            TypeCode::UInt384 => Some(48),
            TypeCode::UInt512 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
