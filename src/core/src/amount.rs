//! Amounts: a value with its currency and issuer.

use crate::account::Account;
use crate::currency::{Currency, NATIVE_CODE};
use crate::errors::CoreError;
use crate::value::Value;
use serde_json::json;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A value in a currency. Currency and issuer are zero for native amounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    /// The fixed-point value
    pub value: Value,
    /// The currency, native for drops
    pub currency: Currency,
    /// The issuing account, zero for drops
    pub issuer: Account,
}

impl Amount {
    /// A native amount.
    pub fn native(value: Value) -> Result<Self, CoreError> {
        if !value.is_native() {
            return Err(CoreError::DomainMismatch(format!(
                "{} is not a native value",
                value
            )));
        }
        Ok(Self {
            value,
            currency: Currency::NATIVE,
            issuer: Account::ZERO,
        })
    }

    /// A native amount of `drops`.
    pub fn from_drops(drops: i64) -> Result<Self, CoreError> {
        Amount::native(Value::from_drops(drops)?)
    }

    /// An issued amount.
    pub fn issued(value: Value, currency: Currency, issuer: Account) -> Result<Self, CoreError> {
        if value.is_native() {
            return Err(CoreError::DomainMismatch(format!(
                "{} is a native value",
                value
            )));
        }
        if currency.is_native() {
            return Err(CoreError::InvalidCurrency(
                "issued amounts cannot use the native currency".to_string(),
            ));
        }
        Ok(Self {
            value,
            currency,
            issuer,
        })
    }

    /// True for drops.
    pub fn is_native(&self) -> bool {
        self.value.is_native()
    }

    /// True for either zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Same currency and issuer, new value.
    fn with_value(&self, value: Value) -> Amount {
        Amount {
            value,
            currency: self.currency,
            issuer: self.issuer,
        }
    }

    /// The amount with its sign flipped.
    pub fn negate(&self) -> Amount {
        self.with_value(self.value.negate())
    }

    /// The magnitude.
    pub fn abs(&self) -> Amount {
        self.with_value(self.value.abs())
    }

    /// Orders two amounts of the same domain.
    pub fn compare(&self, other: &Amount) -> Result<Ordering, CoreError> {
        self.value.compare(&other.value)
    }

    /// Sum; currency and issuer come from the non-zero operand.
    ///
    /// Two non-zero issued amounts must share currency and issuer.
    pub fn add(&self, other: &Amount) -> Result<Amount, CoreError> {
        if !self.is_zero()
            && !other.is_zero()
            && (self.currency != other.currency || self.issuer != other.issuer)
        {
            return Err(CoreError::DomainMismatch(format!("{} + {}", self, other)));
        }
        let value = self.value.add(&other.value)?;
        let template = if self.is_zero() { other } else { self };
        Ok(template.with_value(value))
    }

    /// Difference; currency and issuer come from the non-zero operand.
    pub fn subtract(&self, other: &Amount) -> Result<Amount, CoreError> {
        self.add(&other.negate())
    }

    /// Product in this amount's domain, currency and issuer.
    pub fn multiply(&self, other: &Amount) -> Result<Amount, CoreError> {
        Ok(self.with_value(self.value.multiply(&other.value)?))
    }

    /// Quotient in this amount's domain, currency and issuer.
    pub fn divide(&self, other: &Amount) -> Result<Amount, CoreError> {
        Ok(self.with_value(self.value.divide(&other.value)?))
    }

    /// `self / other` as a currency-less issued value, e.g. an offer's quality.
    pub fn ratio(&self, other: &Amount) -> Result<Value, CoreError> {
        let numerator = Value::new(
            false,
            self.value.is_negative(),
            self.value.mantissa(),
            if self.is_native() { 0 } else { self.value.offset() },
        )?;
        let denominator = Value::new(
            false,
            other.value.is_negative(),
            other.value.mantissa(),
            if other.is_native() { 0 } else { other.value.offset() },
        )?;
        numerator.divide(&denominator)
    }

    /// Appends the wire form: 8 bytes, plus currency and issuer when issued.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_wire().to_be_bytes());
        if !self.is_native() {
            out.extend_from_slice(self.currency.as_bytes());
            out.extend_from_slice(self.issuer.as_bytes());
        }
    }

    /// The wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(48);
        self.write_to(&mut out);
        out
    }

    /// Reads an amount off the front of `input`, returning it with the bytes used.
    pub fn read_from(input: &[u8]) -> Result<(Amount, usize), CoreError> {
        if input.len() < 8 {
            return Err(CoreError::short_read(8, input.len()));
        }
        let mut head = [0u8; 8];
        head.copy_from_slice(&input[..8]);
        let value = Value::from_wire(u64::from_be_bytes(head))?;
        if value.is_native() {
            return Ok((Amount::native(value)?, 8));
        }
        if input.len() < 48 {
            return Err(CoreError::short_read(48, input.len()));
        }
        let currency = Currency::from_slice(&input[8..28])?;
        let issuer = Account::from_slice(&input[28..48])?;
        // Issued zero may travel with any currency, so skip the native check.
        Ok((
            Amount {
                value,
                currency,
                issuer,
            },
            48,
        ))
    }

    /// The JSON form: a drops string, or `{value, currency, issuer}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self.value.drops() {
            Some(drops) => serde_json::Value::String(drops.to_string()),
            None => json!({
                "value": self.value.to_string(),
                "currency": self.currency.to_string(),
                "issuer": self.issuer.to_string(),
            }),
        }
    }

    /// Parses the JSON form.
    pub fn from_json(value: &serde_json::Value) -> Result<Amount, CoreError> {
        match value {
            serde_json::Value::String(drops) => {
                if !drops.bytes().enumerate().all(|(i, b)| {
                    b.is_ascii_digit() || (i == 0 && b == b'-')
                }) {
                    return Err(CoreError::InvalidNumberLiteral(drops.clone()));
                }
                let drops: i64 = drops
                    .parse()
                    .map_err(|_| CoreError::InvalidNumberLiteral(drops.clone()))?;
                Amount::from_drops(drops)
            }
            serde_json::Value::Object(map) => {
                let text = |key: &str| {
                    map.get(key)
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| CoreError::InvalidJson(format!("amount needs \"{}\"", key)))
                };
                let currency: Currency = text("currency")?.parse()?;
                if currency.is_native() {
                    return Amount::native(Value::parse(text("value")?, true)?);
                }
                let value = Value::parse(text("value")?, false)?;
                let issuer: Account = text("issuer")?.parse()?;
                Amount::issued(value, currency, issuer)
            }
            other => Err(CoreError::InvalidJson(format!("not an amount: {}", other))),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "{}/{}", self.value, NATIVE_CODE)
        } else {
            write!(f, "{}/{}/{}", self.value, self.currency, self.issuer)
        }
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self)
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    /// Accepts `"<units>/XRP"`, `"<value>/<currency>/<issuer>"`, or a bare
    /// integer of drops.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [drops] => {
                let drops: i64 = drops
                    .parse()
                    .map_err(|_| CoreError::InvalidNumberLiteral(s.to_string()))?;
                Amount::from_drops(drops)
            }
            [value, currency] => {
                let currency: Currency = currency.parse()?;
                if !currency.is_native() {
                    return Err(CoreError::InvalidCurrency(format!(
                        "{} needs an issuer",
                        currency
                    )));
                }
                Amount::native(Value::parse(value, true)?)
            }
            [value, currency, issuer] => {
                let currency: Currency = currency.parse()?;
                let issuer: Account = issuer.parse()?;
                Amount::issued(Value::parse(value, false)?, currency, issuer)
            }
            _ => Err(CoreError::InvalidNumberLiteral(s.to_string())),
        }
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Amount::from_json(&value).map_err(serde::de::Error::custom)
    }
}
