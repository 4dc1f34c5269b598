//! Tests for values and amounts.

use anyhow::Result;
use rand::Rng;
use ripple_core::{
    account::Account,
    amount::Amount,
    currency::Currency,
    value::{Value, MAX_MANTISSA, MAX_NATIVE, MIN_MANTISSA},
    CoreError,
};
use serde_json::json;

fn issued(text: &str) -> Value {
    Value::parse(text, false).unwrap()
}

/// Tests multiplication and division of issued values.
#[test]
fn test_issued_arithmetic() -> Result<()> {
    crate::init_tracing();
    assert_eq!(issued("1000").multiply(&issued("0.001"))?.to_string(), "1");
    assert_eq!(issued("1").divide(&issued("-200"))?.to_string(), "-0.005");
    assert_eq!(
        issued("1").divide(&Value::ISSUED_ZERO),
        Err(CoreError::DivisionByZero)
    );
    Ok(())
}

/// Tests arithmetic on full amounts keeps currency and issuer.
#[test]
fn test_amount_arithmetic() -> Result<()> {
    let usd = Currency::from_code("USD")?;
    let issuer = Account([9; 20]);
    let a = Amount::issued(issued("12.5"), usd, issuer)?;
    let b = Amount::issued(issued("2.5"), usd, issuer)?;

    let sum = a.add(&b)?;
    assert_eq!(sum.value.to_string(), "15");
    assert_eq!(sum.currency, usd);
    assert_eq!(sum.issuer, issuer);
    assert_eq!(a.subtract(&b)?.value.to_string(), "10");
    assert_eq!(a.divide(&b)?.value.to_string(), "5");

    let drops = Amount::from_drops(1_000)?;
    assert!(matches!(a.add(&drops), Err(CoreError::DomainMismatch(_))));
    Ok(())
}

/// Tests native products and quotients at the edge of the native range.
#[test]
fn test_native_arithmetic_at_the_maximum() -> Result<()> {
    let max = Amount::from_drops(MAX_NATIVE as i64)?;
    let usd = Currency::from_code("USD")?;
    let one_usd = Amount::issued(issued("1"), usd, Account([9; 20]))?;

    assert_eq!(max.multiply(&one_usd)?, max);
    assert_eq!(max.divide(&one_usd)?, max);
    assert!(matches!(
        max.multiply(&Amount::from_drops(2)?),
        Err(CoreError::AmountOverflow(_))
    ));
    assert!(matches!(
        max.divide(&Amount::issued(issued("0.5"), usd, Account([9; 20]))?),
        Err(CoreError::AmountOverflow(_))
    ));
    assert!(matches!(
        Amount::from_drops(100_000_000_000_000_000)?
            .multiply(&Amount::from_drops(18_446_744_073_709_552)?),
        Err(CoreError::AmountOverflow(_))
    ));

    // The issued side of a mixed product keeps its currency.
    let price = one_usd.multiply(&Amount::from_drops(2_500_000)?)?;
    assert_eq!(price.currency, usd);
    assert_eq!(price.value.to_string(), "2500000");
    Ok(())
}

/// Tests that issued amounts of different issues do not add.
#[test]
fn test_cross_issue_addition() -> Result<()> {
    let issuer = Account([9; 20]);
    let usd = Amount::issued(issued("1"), Currency::from_code("USD")?, issuer)?;
    let eur = Amount::issued(issued("1"), Currency::from_code("EUR")?, issuer)?;
    assert!(matches!(usd.add(&eur), Err(CoreError::DomainMismatch(_))));
    assert!(matches!(usd.subtract(&eur), Err(CoreError::DomainMismatch(_))));
    Ok(())
}

/// Tests the wire form of the smallest canonical mantissa.
#[test]
fn test_wire_amount_round_trip() -> Result<()> {
    let value = Value::new(false, false, 1_000_000_000_000_000, 0)?;
    let bits = value.to_wire();
    assert_ne!(bits & (1 << 63), 0);
    assert_ne!(bits & (1 << 62), 0);

    let decoded = Value::from_wire(u64::from_be_bytes(bits.to_be_bytes()))?;
    assert_eq!(decoded, value);
    assert!(!decoded.is_native());
    assert!(!decoded.is_negative());
    assert_eq!(decoded.mantissa(), 1_000_000_000_000_000);
    assert_eq!(decoded.offset(), 0);
    Ok(())
}

/// Tests that canonicalization is idempotent over random inputs.
#[test]
fn test_canonicalization_idempotence() {
    let mut rng = rand::thread_rng();
    for _ in 0..2_000 {
        let native: bool = rng.gen_bool(0.2);
        let num: u64 = if native {
            rng.gen_range(0..100_000_000_000)
        } else {
            rng.gen_range(0..u64::MAX / 4)
        };
        let offset: i64 = if native { 0 } else { rng.gen_range(-120..90) };
        let value = match Value::new(native, rng.gen(), num, offset) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if !value.is_native() && !value.is_zero() {
            assert!((MIN_MANTISSA..=MAX_MANTISSA).contains(&value.mantissa()));
        }
        let mut again = value;
        again.canonicalize().unwrap();
        assert_eq!(again, value);
        assert_eq!(Value::from_wire(value.to_wire()).unwrap(), value);
    }
}

/// Tests the full wire form of issued and native amounts.
#[test]
fn test_amount_bytes() -> Result<()> {
    let amount = Amount::issued(issued("-0.25"), Currency::from_code("EUR")?, Account([3; 20]))?;
    let bytes = amount.to_bytes();
    assert_eq!(bytes.len(), 48);
    let (decoded, used) = Amount::read_from(&bytes)?;
    assert_eq!(used, 48);
    assert_eq!(decoded, amount);

    let drops = Amount::from_drops(-7)?;
    let bytes = drops.to_bytes();
    assert_eq!(bytes.len(), 8);
    assert_eq!(bytes[0] & 0x40, 0);
    assert_eq!(Amount::read_from(&bytes)?.0, drops);

    assert!(matches!(
        Amount::read_from(&bytes[..5]),
        Err(CoreError::ShortRead { .. })
    ));
    Ok(())
}

/// Tests the JSON forms.
#[test]
fn test_amount_json() -> Result<()> {
    let drops = Amount::from_drops(25)?;
    assert_eq!(drops.to_json(), json!("25"));
    assert_eq!(Amount::from_json(&json!("25"))?, drops);

    let issuer = Account([5; 20]);
    let amount = Amount::issued(issued("1.5"), Currency::from_code("USD")?, issuer)?;
    let value = amount.to_json();
    assert_eq!(value["value"], json!("1.5"));
    assert_eq!(value["currency"], json!("USD"));
    assert_eq!(value["issuer"], json!(issuer.to_string()));
    assert_eq!(Amount::from_json(&value)?, amount);

    assert!(Amount::from_json(&json!("1.5")).is_err());
    assert!(Amount::from_json(&json!(12)).is_err());
    Ok(())
}
