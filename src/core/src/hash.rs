//! Fixed-width hashes and variable-length byte strings.

use crate::errors::CoreError;
use std::fmt;
use std::str::FromStr;

macro_rules! fixed_hash {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            /// Copies a hash out of a slice of exactly `LEN` bytes.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
                if bytes.len() != $len {
                    return Err(CoreError::InvalidHex(format!(
                        "{} needs {} bytes, got {}",
                        stringify!($name),
                        $len,
                        bytes.len()
                    )));
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(bytes);
                Ok(Self(out))
            }

            /// Parses hex text of exactly `2 * LEN` digits, either case.
            pub fn from_hex(text: &str) -> Result<Self, CoreError> {
                let bytes = hex::decode(text)?;
                Self::from_slice(&bytes)
            }

            /// Returns true if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Returns the bytes by value.
            pub fn to_bytes(self) -> [u8; $len] {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = String::deserialize(deserializer)?;
                Self::from_hex(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_hash!(
    /// A 96-bit value.
    Hash96,
    12
);
fixed_hash!(
    /// A 128-bit hash (e.g. `EmailHash`).
    Hash128,
    16
);
fixed_hash!(
    /// A 160-bit hash (e.g. `TakerPaysCurrency`).
    Hash160,
    20
);
fixed_hash!(
    /// A 192-bit value.
    Hash192,
    24
);
fixed_hash!(
    /// A 256-bit hash: transaction ids, ledger indexes, trie node hashes.
    Hash256,
    32
);
fixed_hash!(
    /// A 384-bit value.
    Hash384,
    48
);
fixed_hash!(
    /// A 512-bit value.
    Hash512,
    64
);

impl Hash256 {
    /// Returns the nibble (4-bit digit) at `depth`, most significant first.
    ///
    /// Depth 0 is the high nibble of byte 0; a 256-bit key has 64 nibbles.
    pub fn nibble(&self, depth: usize) -> usize {
        let byte = self.0[depth / 2];
        if depth % 2 == 0 {
            (byte >> 4) as usize
        } else {
            (byte & 0x0F) as usize
        }
    }

    /// Bytewise exclusive or.
    pub fn xor(&self, other: &Hash256) -> Hash256 {
        let mut out = [0u8; 32];
        for (i, b) in out.iter_mut().enumerate() {
            *b = self.0[i] ^ other.0[i];
        }
        Hash256(out)
    }
}

/// A variable-length byte string, as carried by blob fields.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VariableLength(pub Vec<u8>);

impl VariableLength {
    /// Wraps owned bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses hex text.
    pub fn from_hex(text: &str) -> Result<Self, CoreError> {
        Ok(Self(hex::decode(text)?))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for VariableLength {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for VariableLength {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for VariableLength {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for VariableLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl fmt::Debug for VariableLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableLength({})", self)
    }
}

impl serde::Serialize for VariableLength {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for VariableLength {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
