//! Payment paths and the `Issue` (currency plus issuer) pair.

use crate::account::Account;
use crate::currency::Currency;
use crate::errors::CoreError;
use serde_json::json;
use std::fmt;

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_END: u8 = 0x00;

/// One hop of a payment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PathStep {
    /// Ripple through this account
    pub account: Option<Account>,
    /// Convert into this currency
    pub currency: Option<Currency>,
    /// Issuer of the converted currency
    pub issuer: Option<Account>,
}

/// A sequence of hops.
pub type Path = Vec<PathStep>;

/// Alternative paths for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathSet(pub Vec<Path>);

impl PathSet {
    /// Appends the wire form.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(PATH_SEPARATOR);
            }
            for step in path {
                let mut kind = 0u8;
                if step.account.is_some() {
                    kind |= STEP_ACCOUNT;
                }
                if step.currency.is_some() {
                    kind |= STEP_CURRENCY;
                }
                if step.issuer.is_some() {
                    kind |= STEP_ISSUER;
                }
                out.push(kind);
                if let Some(account) = &step.account {
                    out.extend_from_slice(account.as_bytes());
                }
                if let Some(currency) = &step.currency {
                    out.extend_from_slice(currency.as_bytes());
                }
                if let Some(issuer) = &step.issuer {
                    out.extend_from_slice(issuer.as_bytes());
                }
            }
        }
        out.push(PATH_END);
    }

    /// Reads a path set off the front of `input`, returning it with the bytes used.
    pub fn read_from(input: &[u8]) -> Result<(PathSet, usize), CoreError> {
        let mut paths = Vec::new();
        let mut current: Path = Vec::new();
        let mut pos = 0;
        let take = |pos: &mut usize| -> Result<[u8; 20], CoreError> {
            if input.len() < *pos + 20 {
                return Err(CoreError::short_read(20, input.len().saturating_sub(*pos)));
            }
            let mut out = [0u8; 20];
            out.copy_from_slice(&input[*pos..*pos + 20]);
            *pos += 20;
            Ok(out)
        };
        loop {
            let kind = *input.get(pos).ok_or_else(|| CoreError::short_read(1, 0))?;
            pos += 1;
            match kind {
                PATH_END => {
                    paths.push(current);
                    return Ok((PathSet(paths), pos));
                }
                PATH_SEPARATOR => paths.push(std::mem::take(&mut current)),
                kind if kind & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) != 0 => {
                    return Err(CoreError::UnexpectedFieldType(format!(
                        "path step type {:#04x}",
                        kind
                    )));
                }
                kind => {
                    let mut step = PathStep::default();
                    if kind & STEP_ACCOUNT != 0 {
                        step.account = Some(Account(take(&mut pos)?));
                    }
                    if kind & STEP_CURRENCY != 0 {
                        step.currency = Some(Currency(take(&mut pos)?));
                    }
                    if kind & STEP_ISSUER != 0 {
                        step.issuer = Some(Account(take(&mut pos)?));
                    }
                    current.push(step);
                }
            }
        }
    }

    /// JSON: an array of paths, each an array of step objects.
    pub fn to_json(&self) -> serde_json::Value {
        let paths: Vec<serde_json::Value> = self
            .0
            .iter()
            .map(|path| {
                let steps: Vec<serde_json::Value> = path
                    .iter()
                    .map(|step| {
                        let mut object = serde_json::Map::new();
                        if let Some(account) = &step.account {
                            object.insert("account".into(), json!(account.to_string()));
                        }
                        if let Some(currency) = &step.currency {
                            object.insert("currency".into(), json!(currency.to_string()));
                        }
                        if let Some(issuer) = &step.issuer {
                            object.insert("issuer".into(), json!(issuer.to_string()));
                        }
                        serde_json::Value::Object(object)
                    })
                    .collect();
                serde_json::Value::Array(steps)
            })
            .collect();
        serde_json::Value::Array(paths)
    }

    /// Parses the JSON form.
    pub fn from_json(value: &serde_json::Value) -> Result<PathSet, CoreError> {
        let not_paths = || CoreError::InvalidJson(format!("not a path set: {}", value));
        let mut paths = Vec::new();
        for path in value.as_array().ok_or_else(not_paths)? {
            let mut steps = Vec::new();
            for step in path.as_array().ok_or_else(not_paths)? {
                let object = step.as_object().ok_or_else(not_paths)?;
                let text = |key: &str| object.get(key).and_then(|v| v.as_str());
                steps.push(PathStep {
                    account: text("account").map(str::parse).transpose()?,
                    currency: text("currency").map(str::parse).transpose()?,
                    issuer: text("issuer").map(str::parse).transpose()?,
                });
            }
            paths.push(steps);
        }
        Ok(PathSet(paths))
    }
}

/// A currency and, unless native, its issuer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Issue {
    /// The currency
    pub currency: Currency,
    /// The issuer, zero for the native currency
    pub issuer: Account,
}

impl Issue {
    /// The native currency.
    pub const NATIVE: Issue = Issue {
        currency: Currency::NATIVE,
        issuer: Account::ZERO,
    };

    /// Appends the wire form: currency, then issuer unless native.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.currency.as_bytes());
        if !self.currency.is_native() {
            out.extend_from_slice(self.issuer.as_bytes());
        }
    }

    /// Reads an issue off the front of `input`, returning it with the bytes used.
    pub fn read_from(input: &[u8]) -> Result<(Issue, usize), CoreError> {
        if input.len() < 20 {
            return Err(CoreError::short_read(20, input.len()));
        }
        let currency = Currency::from_slice(&input[..20])?;
        if currency.is_native() {
            return Ok((Issue::NATIVE, 20));
        }
        if input.len() < 40 {
            return Err(CoreError::short_read(40, input.len()));
        }
        let issuer = Account::from_slice(&input[20..40])?;
        Ok((Issue { currency, issuer }, 40))
    }

    /// JSON: `{"currency": "XRP"}` or `{"currency", "issuer"}`.
    pub fn to_json(&self) -> serde_json::Value {
        if self.currency.is_native() {
            json!({ "currency": self.currency.to_string() })
        } else {
            json!({
                "currency": self.currency.to_string(),
                "issuer": self.issuer.to_string(),
            })
        }
    }

    /// Parses the JSON form.
    pub fn from_json(value: &serde_json::Value) -> Result<Issue, CoreError> {
        let currency: Currency = value
            .get("currency")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::InvalidJson(format!("not an issue: {}", value)))?
            .parse()?;
        if currency.is_native() {
            return Ok(Issue::NATIVE);
        }
        let issuer: Account = value
            .get("issuer")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::InvalidJson(format!("issue needs an issuer: {}", value)))?
            .parse()?;
        Ok(Issue { currency, issuer })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.currency.is_native() {
            write!(f, "{}", self.currency)
        } else {
            write!(f, "{}/{}", self.currency, self.issuer)
        }
    }
}

impl fmt::Debug for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Issue({})", self)
    }
}
