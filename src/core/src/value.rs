//! Fixed-point decimal values for native and issued amounts.
//!
//! A value is `(-1)^negative * num * 10^offset`. Native values count drops and
//! always have offset 0. Issued values keep a 16-digit mantissa in
//! `[10^15, 10^16 - 1]` and an offset in `[-96, 80]`; zero is the special
//! `(0, -100)`. Every constructor and arithmetic result is canonical.

use crate::errors::CoreError;
use std::cmp::Ordering;
use std::fmt;

/// Largest number of drops a native value may hold.
pub const MAX_NATIVE: u64 = 9_000_000_000_000_000_000;
/// Smallest canonical issued mantissa.
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
/// Largest canonical issued mantissa.
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
/// Smallest issued offset before a value underflows to zero.
pub const MIN_OFFSET: i64 = -96;
/// Largest issued offset.
pub const MAX_OFFSET: i64 = 80;
/// Offset carried by issued zero.
pub const ZERO_OFFSET: i64 = -100;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const NATIVE_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;
const MANTISSA_MASK: u64 = 0x003F_FFFF_FFFF_FFFF;

const TEN_14: u128 = 100_000_000_000_000;
const TEN_17: u128 = 100_000_000_000_000_000;

/// A canonical fixed-point value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    /// True for drops of the native currency
    native: bool,
    /// True when the value is below zero; never set on zero
    negative: bool,
    /// The mantissa
    num: u64,
    /// The decimal exponent
    offset: i64,
}

impl Value {
    /// Native zero.
    pub const NATIVE_ZERO: Value = Value {
        native: true,
        negative: false,
        num: 0,
        offset: 0,
    };

    /// Issued zero.
    pub const ISSUED_ZERO: Value = Value {
        native: false,
        negative: false,
        num: 0,
        offset: ZERO_OFFSET,
    };

    /// Builds and canonicalizes a value from its parts.
    pub fn new(native: bool, negative: bool, num: u64, offset: i64) -> Result<Self, CoreError> {
        let mut value = Value {
            native,
            negative,
            num,
            offset,
        };
        value.canonicalize()?;
        Ok(value)
    }

    /// A native value of `drops`.
    pub fn from_drops(drops: i64) -> Result<Self, CoreError> {
        Value::new(true, drops < 0, drops.unsigned_abs(), 0)
    }

    /// An issued value of `mantissa * 10^offset`.
    pub fn issued(mantissa: i64, offset: i64) -> Result<Self, CoreError> {
        Value::new(false, mantissa < 0, mantissa.unsigned_abs(), offset)
    }

    /// The zero of the given domain.
    pub fn zero(native: bool) -> Self {
        if native {
            Value::NATIVE_ZERO
        } else {
            Value::ISSUED_ZERO
        }
    }

    /// True for drops of the native currency.
    pub fn is_native(&self) -> bool {
        self.native
    }

    /// True when below zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// True for either zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// The mantissa.
    pub fn mantissa(&self) -> u64 {
        self.num
    }

    /// The decimal exponent.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The signed number of drops, for native values.
    pub fn drops(&self) -> Option<i64> {
        if !self.native {
            return None;
        }
        // num <= MAX_NATIVE < i64::MAX
        let drops = self.num as i64;
        Some(if self.negative { -drops } else { drops })
    }

    /// Brings the value into canonical form.
    ///
    /// Issued values below the smallest offset become zero; anything too large
    /// for the domain fails with `AmountOverflow`. Calling this twice changes
    /// nothing the second time.
    pub fn canonicalize(&mut self) -> Result<(), CoreError> {
        if self.native {
            if self.num == 0 {
                *self = Value::NATIVE_ZERO;
                return Ok(());
            }
            while self.offset < 0 && self.num != 0 {
                self.num /= 10;
                self.offset += 1;
            }
            if self.num == 0 {
                *self = Value::NATIVE_ZERO;
                return Ok(());
            }
            while self.offset > 0 {
                self.num = self
                    .num
                    .checked_mul(10)
                    .ok_or_else(|| CoreError::AmountOverflow(format!("native {}e{}", self.num, self.offset)))?;
                self.offset -= 1;
            }
            if self.num > MAX_NATIVE {
                return Err(CoreError::AmountOverflow(format!(
                    "{} drops exceeds the native maximum",
                    self.num
                )));
            }
            return Ok(());
        }

        if self.num == 0 {
            *self = Value::ISSUED_ZERO;
            return Ok(());
        }
        // Scaling moves the offset by at most 15 down or 4 up.
        if self.offset < MIN_OFFSET - 4 {
            *self = Value::ISSUED_ZERO;
            return Ok(());
        }
        if self.offset > MAX_OFFSET + 15 {
            return Err(CoreError::AmountOverflow(format!(
                "{}e{} exceeds the issued maximum",
                self.num, self.offset
            )));
        }
        while self.num < MIN_MANTISSA {
            self.num *= 10;
            self.offset -= 1;
        }
        while self.num > MAX_MANTISSA {
            self.num /= 10;
            self.offset += 1;
        }
        if self.offset < MIN_OFFSET {
            *self = Value::ISSUED_ZERO;
            return Ok(());
        }
        if self.offset > MAX_OFFSET {
            return Err(CoreError::AmountOverflow(format!(
                "{}e{} exceeds the issued maximum",
                self.num, self.offset
            )));
        }
        Ok(())
    }

    /// The value with its sign flipped. Zero stays positive.
    pub fn negate(&self) -> Self {
        let mut out = *self;
        if out.num != 0 {
            out.negative = !out.negative;
        }
        out
    }

    /// The magnitude.
    pub fn abs(&self) -> Self {
        let mut out = *self;
        out.negative = false;
        out
    }

    fn check_domain(&self, other: &Value, op: &str) -> Result<(), CoreError> {
        if self.native != other.native {
            return Err(CoreError::DomainMismatch(format!("{} {} {}", self, op, other)));
        }
        Ok(())
    }

    /// Orders two values of the same domain.
    pub fn compare(&self, other: &Value) -> Result<Ordering, CoreError> {
        self.check_domain(other, "<=>")?;
        if self.negative != other.negative {
            return Ok(if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            });
        }
        let magnitude = if self.native {
            self.num.cmp(&other.num)
        } else if self.num == 0 || other.num == 0 {
            self.num.cmp(&other.num)
        } else {
            self.offset
                .cmp(&other.offset)
                .then(self.num.cmp(&other.num))
        };
        Ok(if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        })
    }

    fn signed_num(&self) -> i128 {
        if self.negative {
            -(self.num as i128)
        } else {
            self.num as i128
        }
    }

    /// Sum of two values of the same domain.
    ///
    /// Issued operands are aligned to the larger offset by dropping digits
    /// from the smaller one.
    pub fn add(&self, other: &Value) -> Result<Value, CoreError> {
        self.check_domain(other, "+")?;
        if self.is_zero() {
            return Ok(*other);
        }
        if other.is_zero() {
            return Ok(*self);
        }

        if self.native {
            let sum = self.signed_num() + other.signed_num();
            let magnitude = sum.unsigned_abs();
            if magnitude > MAX_NATIVE as u128 {
                return Err(CoreError::AmountOverflow(format!("{} + {}", self, other)));
            }
            return Value::new(true, sum < 0, magnitude as u64, 0);
        }

        let (mut a, mut a_offset) = (self.signed_num(), self.offset);
        let (mut b, mut b_offset) = (other.signed_num(), other.offset);
        while a_offset < b_offset {
            a /= 10;
            a_offset += 1;
        }
        while b_offset < a_offset {
            b /= 10;
            b_offset += 1;
        }
        let sum = a + b;
        // Two 16-digit mantissas cannot overflow u64.
        Value::new(false, sum < 0, sum.unsigned_abs() as u64, a_offset)
    }

    /// Difference of two values of the same domain.
    pub fn subtract(&self, other: &Value) -> Result<Value, CoreError> {
        self.add(&other.negate())
    }

    /// Mantissa and offset scaled into `[10^15, 10^16 - 1]`.
    fn widened(&self) -> (u64, i64) {
        scaled(self.num as u128, self.offset)
    }

    /// Product of two values; the result takes this value's domain.
    pub fn multiply(&self, other: &Value) -> Result<Value, CoreError> {
        if self.is_zero() || other.is_zero() {
            return Ok(Value::zero(self.native));
        }
        let negative = self.negative != other.negative;

        if self.native && other.native {
            let min = self.num.min(other.num);
            let max = self.num.max(other.num);
            if min <= 3_000_000_000 && (max >> 32) * min <= 2_095_475_792 {
                let product = min
                    .checked_mul(max)
                    .ok_or_else(|| CoreError::AmountOverflow(format!("{} * {}", self, other)))?;
                return Value::new(true, negative, product, 0);
            }
        }

        let (a, a_offset) = self.widened();
        let (b, b_offset) = other.widened();
        let product = (a as u128 * b as u128) / TEN_14 + 7;
        let (num, offset) = narrowed(product, a_offset + b_offset + 14, || {
            format!("{} * {}", self, other)
        })?;
        Value::new(self.native, negative, num, offset)
    }

    /// Quotient of two values; the result takes this value's domain.
    pub fn divide(&self, other: &Value) -> Result<Value, CoreError> {
        if other.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Value::zero(self.native));
        }
        let negative = self.negative != other.negative;
        let (a, a_offset) = self.widened();
        let (b, b_offset) = other.widened();
        let quotient = (a as u128 * TEN_17) / b as u128 + 5;
        let (num, offset) = narrowed(quotient, a_offset - b_offset - 17, || {
            format!("{} / {}", self, other)
        })?;
        Value::new(self.native, negative, num, offset)
    }

    /// The 64-bit wire form.
    pub fn to_wire(&self) -> u64 {
        if self.native {
            let mut bits = self.num & NATIVE_MASK;
            if !self.negative {
                bits |= POSITIVE_BIT;
            }
            return bits;
        }
        if self.num == 0 {
            return NOT_NATIVE_BIT;
        }
        let mut bits = NOT_NATIVE_BIT | (self.num & MANTISSA_MASK);
        if !self.negative {
            bits |= POSITIVE_BIT;
        }
        bits | (((self.offset + 97) as u64) << 54)
    }

    /// Reads the 64-bit wire form, rejecting non-canonical encodings.
    pub fn from_wire(bits: u64) -> Result<Value, CoreError> {
        let negative = bits & POSITIVE_BIT == 0;
        if bits & NOT_NATIVE_BIT == 0 {
            let num = bits & NATIVE_MASK;
            if num > MAX_NATIVE {
                return Err(CoreError::AmountOverflow(format!("native wire {:#018x}", bits)));
            }
            if num == 0 && negative {
                return Err(CoreError::AmountOverflow(format!(
                    "negative native zero {:#018x}",
                    bits
                )));
            }
            return Ok(Value {
                native: true,
                negative: negative && num != 0,
                num,
                offset: 0,
            });
        }

        if bits == NOT_NATIVE_BIT {
            return Ok(Value::ISSUED_ZERO);
        }
        let num = bits & MANTISSA_MASK;
        let offset = ((bits >> 54) & 0xFF) as i64 - 97;
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&num) || !(MIN_OFFSET..=MAX_OFFSET).contains(&offset)
        {
            return Err(CoreError::AmountOverflow(format!(
                "non-canonical issued wire {:#018x}",
                bits
            )));
        }
        Ok(Value {
            native: false,
            negative,
            num,
            offset,
        })
    }

    /// Parses decimal text: `[-+]digits[.digits][e[-+]digits]`.
    ///
    /// Native text is in whole units, so `"1.5"` is 1 500 000 drops.
    pub fn parse(text: &str, native: bool) -> Result<Value, CoreError> {
        let invalid = || CoreError::InvalidNumberLiteral(text.to_string());
        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (number, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let (integer, fraction) = match number.find('.') {
            Some(i) => (&number[..i], &number[i + 1..]),
            None => (number, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty() || !all_digits(integer) || !all_digits(fraction) {
            return Err(invalid());
        }
        if number.contains('.') && fraction.is_empty() {
            return Err(invalid());
        }

        let mut offset: i64 = match exponent {
            Some(e) => {
                let digits = e.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(e);
                if digits.is_empty() || !all_digits(digits) || digits.len() > 6 {
                    return Err(invalid());
                }
                e.parse::<i64>().map_err(|_| invalid())?
            }
            None => 0,
        };
        offset -= fraction.len() as i64;

        let mut digits: String = integer.chars().chain(fraction.chars()).collect();
        let leading_zeros = digits.len() - digits.trim_start_matches('0').len();
        digits.drain(..leading_zeros);
        while digits.len() > 18 {
            digits.pop();
            offset += 1;
        }
        let num = if digits.is_empty() {
            0
        } else {
            digits.parse::<u64>().map_err(|_| invalid())?
        };

        if native {
            offset += 6;
        }
        Value::new(native, negative, num, offset)
    }

    /// A floating-point approximation in whole units, for display only.
    pub fn as_f64(&self) -> f64 {
        let magnitude = if self.native {
            self.num as f64 / 1_000_000.0
        } else {
            self.num as f64 * 10f64.powi(self.offset as i32)
        };
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// The rate encoding used in book directories: offset+100 in the top
    /// byte, mantissa below.
    pub fn to_rate(&self) -> u64 {
        if self.num == 0 {
            return 0;
        }
        let (num, offset) = self.widened();
        (((offset + 100) as u64) << 56) | num
    }
}

/// Scales a non-zero mantissa into `[10^15, 10^16 - 1]`, dropping low digits.
fn scaled(mut num: u128, mut offset: i64) -> (u64, i64) {
    if num == 0 {
        return (0, offset);
    }
    while num < MIN_MANTISSA as u128 {
        num *= 10;
        offset -= 1;
    }
    while num > MAX_MANTISSA as u128 {
        num /= 10;
        offset += 1;
    }
    // num <= MAX_MANTISSA
    (num as u64, offset)
}

/// A 128-bit intermediate brought back to a 16-digit mantissa.
fn narrowed(
    num: u128,
    offset: i64,
    describe: impl Fn() -> String,
) -> Result<(u64, i64), CoreError> {
    let (num, offset) = scaled(num, offset);
    if offset > MAX_OFFSET {
        return Err(CoreError::AmountOverflow(describe()));
    }
    Ok((num, offset))
}

fn expand(digits: &str, offset: i64) -> (String, String) {
    let point = digits.len() as i64 + offset;
    if point >= digits.len() as i64 {
        let mut integer = digits.to_string();
        integer.extend(std::iter::repeat('0').take(offset as usize));
        (integer, String::new())
    } else if point > 0 {
        (
            digits[..point as usize].to_string(),
            digits[point as usize..].to_string(),
        )
    } else {
        let mut fraction: String = std::iter::repeat('0').take((-point) as usize).collect();
        fraction.push_str(digits);
        ("0".to_string(), fraction)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num == 0 {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }
        if !self.native && self.offset != 0 && (self.offset < -25 || self.offset > -5) {
            return write!(f, "{}e{}", self.num, self.offset);
        }

        let (integer, fraction) = if self.native {
            expand(&self.num.to_string(), -6)
        } else {
            expand(&self.num.to_string(), self.offset)
        };
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            f.write_str(&integer)
        } else {
            write!(f, "{}.{}", integer, fraction)
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value({}{}{}e{})",
            if self.native { "native " } else { "" },
            if self.negative { "-" } else { "" },
            self.num,
            self.offset
        )
    }
}
