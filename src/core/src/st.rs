//! The generic serialized object: an ordered map of typed fields.

use crate::account::Account;
use crate::amount::Amount;
use crate::codec::fields::{self, FieldId};
use crate::codec::types::TypeCode;
use crate::errors::CoreError;
use crate::hash::{Hash128, Hash160, Hash192, Hash256, Hash384, Hash512, Hash96, VariableLength};
use crate::path::{Issue, PathSet};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128(Hash128),
    Hash160(Hash160),
    Hash256(Hash256),
    UInt96(Hash96),
    UInt192(Hash192),
    UInt384(Hash384),
    UInt512(Hash512),
    Amount(Amount),
    Blob(VariableLength),
    AccountId(Account),
    Object(StObject),
    /// Each element is an object wrapped in its own field, e.g. `Memo`.
    Array(Vec<(FieldId, StObject)>),
    PathSet(PathSet),
    Vector256(Vec<Hash256>),
    Issue(Issue),
}

impl StValue {
    /// The type code this value serializes as.
    pub fn type_code(&self) -> TypeCode {
        match self {
            StValue::UInt8(_) => TypeCode::UInt8,
            StValue::UInt16(_) => TypeCode::UInt16,
            StValue::UInt32(_) => TypeCode::UInt32,
            StValue::UInt64(_) => TypeCode::UInt64,
            StValue::Hash128(_) => TypeCode::Hash128,
            StValue::Hash160(_) => TypeCode::Hash160,
            StValue::Hash256(_) => TypeCode::Hash256,
            StValue::UInt96(_) => TypeCode::UInt96,
            StValue::UInt192(_) => TypeCode::UInt192,
            StValue::UInt384(_) => TypeCode::UInt384,
            StValue::UInt512(_) => TypeCode::UInt512,
            StValue::Amount(_) => TypeCode::Amount,
            StValue::Blob(_) => TypeCode::Blob,
            StValue::AccountId(_) => TypeCode::AccountId,
            StValue::Object(_) => TypeCode::Object,
            StValue::Array(_) => TypeCode::Array,
            StValue::PathSet(_) => TypeCode::PathSet,
            StValue::Vector256(_) => TypeCode::Vector256,
            StValue::Issue(_) => TypeCode::Issue,
        }
    }
}

macro_rules! typed_getter {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&self, field: FieldId) -> Option<$ty> {
            match self.fields.get(&field) {
                Some(StValue::$variant(value)) => Some(value.clone()),
                _ => None,
            }
        }
    };
}

/// An ordered set of fields. Iteration is always in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StObject {
    fields: BTreeMap<FieldId, StValue>,
}

impl StObject {
    /// An empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, checking the value type against the dictionary.
    pub fn set(&mut self, field: FieldId, value: StValue) -> Result<(), CoreError> {
        if field.info().is_none() {
            return Err(CoreError::UnknownFieldCode {
                type_code: field.type_code.code(),
                field_code: field.field_code,
            });
        }
        if field == fields::END_OF_OBJECT || field == fields::END_OF_ARRAY {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} is a marker, not a field",
                field
            )));
        }
        if value.type_code() != field.type_code {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} holds {}, not {}",
                field,
                field.type_code,
                value.type_code()
            )));
        }
        if let StValue::Array(items) = &value {
            if let Some((item, _)) = items.iter().find(|(f, _)| f.type_code != TypeCode::Object) {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "array {} holds non-object {}",
                    field, item
                )));
            }
        }
        self.fields.insert(field, value);
        Ok(())
    }

    /// Builder form of [`StObject::set`].
    pub fn with(mut self, field: FieldId, value: StValue) -> Result<Self, CoreError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, field: FieldId) -> Option<StValue> {
        self.fields.remove(&field)
    }

    /// The value of a field.
    pub fn get(&self, field: FieldId) -> Option<&StValue> {
        self.fields.get(&field)
    }

    /// True when the field is present.
    pub fn contains(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in ascending priority.
    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, StValue> {
        self.fields.iter()
    }

    /// The lowest-priority field, which decides how an object is interpreted.
    pub fn first_field(&self) -> Option<(&FieldId, &StValue)> {
        self.fields.iter().next()
    }

    typed_getter!(
        /// A `UInt8` field.
        get_u8, UInt8, u8
    );
    typed_getter!(
        /// A `UInt16` field.
        get_u16, UInt16, u16
    );
    typed_getter!(
        /// A `UInt32` field.
        get_u32, UInt32, u32
    );
    typed_getter!(
        /// A `UInt64` field.
        get_u64, UInt64, u64
    );
    typed_getter!(
        /// A `Hash128` field.
        get_hash128, Hash128, Hash128
    );
    typed_getter!(
        /// A `Hash160` field.
        get_hash160, Hash160, Hash160
    );
    typed_getter!(
        /// A `Hash256` field.
        get_hash256, Hash256, Hash256
    );
    typed_getter!(
        /// An `Amount` field.
        get_amount, Amount, Amount
    );
    typed_getter!(
        /// An `AccountID` field.
        get_account, AccountId, Account
    );
    typed_getter!(
        /// A `Vector256` field.
        get_vector256, Vector256, Vec<Hash256>
    );
    typed_getter!(
        /// An `Issue` field.
        get_issue, Issue, Issue
    );

    /// A blob field's bytes.
    pub fn get_blob(&self, field: FieldId) -> Option<&[u8]> {
        match self.fields.get(&field) {
            Some(StValue::Blob(blob)) => Some(blob.as_bytes()),
            _ => None,
        }
    }

    /// A nested object.
    pub fn get_object(&self, field: FieldId) -> Option<&StObject> {
        match self.fields.get(&field) {
            Some(StValue::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// An array's elements.
    pub fn get_array(&self, field: FieldId) -> Option<&[(FieldId, StObject)]> {
        match self.fields.get(&field) {
            Some(StValue::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// A path set.
    pub fn get_paths(&self, field: FieldId) -> Option<&PathSet> {
        match self.fields.get(&field) {
            Some(StValue::PathSet(paths)) => Some(paths),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a StObject {
    type Item = (&'a FieldId, &'a StValue);
    type IntoIter = btree_map::Iter<'a, FieldId, StValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
