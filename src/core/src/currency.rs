//! Currency codes.
//!
//! A currency is 20 bytes. All zeros is the native currency. A standard code
//! keeps three ASCII characters in bytes 12..15 with everything else zero.
//! A leading `0x01` marks a demurrage code, kept opaque. Anything else is a
//! custom code shown as 40 hex digits.

use crate::errors::CoreError;
use std::fmt;
use std::str::FromStr;

/// Name of the native currency.
pub const NATIVE_CODE: &str = "XRP";

/// A 20-byte currency code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Currency(pub [u8; 20]);

/// How a currency code is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyKind {
    /// The native currency.
    Native,
    /// A three-character ISO-style code.
    Standard,
    /// An interest-bearing code (first byte `0x01`).
    Demurrage,
    /// Any other 160-bit code.
    Custom,
}

impl Currency {
    /// The native currency.
    pub const NATIVE: Currency = Currency([0u8; 20]);

    /// Builds a standard code from three ASCII characters.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(CoreError::InvalidCurrency(code.to_string()));
        }
        if code == NATIVE_CODE {
            return Ok(Currency::NATIVE);
        }
        let mut out = [0u8; 20];
        out[12..15].copy_from_slice(bytes);
        Ok(Currency(out))
    }

    /// Copies a code out of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 20 {
            return Err(CoreError::InvalidCurrency(hex::encode_upper(bytes)));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Currency(out))
    }

    /// Returns true for the native currency.
    pub fn is_native(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Classifies the code.
    pub fn kind(&self) -> CurrencyKind {
        if self.is_native() {
            CurrencyKind::Native
        } else if self.0[0] == 0x01 {
            CurrencyKind::Demurrage
        } else if self.0[..12].iter().all(|b| *b == 0)
            && self.0[15..].iter().all(|b| *b == 0)
            && self.0[12..15].iter().all(|b| b.is_ascii_graphic())
        {
            CurrencyKind::Standard
        } else {
            CurrencyKind::Custom
        }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            CurrencyKind::Native => f.write_str(NATIVE_CODE),
            CurrencyKind::Standard => {
                // Checked ASCII in kind().
                for b in &self.0[12..15] {
                    write!(f, "{}", *b as char)?;
                }
                Ok(())
            }
            CurrencyKind::Demurrage | CurrencyKind::Custom => {
                f.write_str(&hex::encode_upper(self.0))
            }
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self)
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            3 => Currency::from_code(s),
            40 => {
                let bytes =
                    hex::decode(s).map_err(|_| CoreError::InvalidCurrency(s.to_string()))?;
                Currency::from_slice(&bytes)
            }
            _ => Err(CoreError::InvalidCurrency(s.to_string())),
        }
    }
}

impl serde::Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
