//! Tests for the binary codec and the typed objects built on it.

use anyhow::Result;
use ripple_core::{
    account::Account,
    amount::Amount,
    codec::{self, fields, Encoder},
    crypto::hash::sha512_half,
    currency::Currency,
    hash::Hash256,
    hashing::{account_root_index, Hashable},
    objects::{
        self, AffectedNode, Decoded, LedgerEntry, LedgerEntryType, NodeEffect, Transaction,
        TransactionMeta, TransactionResult, TransactionType, TransactionWithMetaData, Validation,
    },
    st::{StObject, StValue},
    value::Value,
};

fn payment() -> Result<Transaction> {
    let memo = StObject::new()
        .with(fields::MEMO_TYPE, StValue::Blob(b"text/plain".to_vec().into()))?
        .with(fields::MEMO_DATA, StValue::Blob(b"hello".to_vec().into()))?;
    let amount = Amount::issued(
        Value::parse("42.5", false)?,
        Currency::from_code("USD")?,
        Account([8; 20]),
    )?;
    Ok(Transaction::new(
        TransactionType::Payment,
        Account([1; 20]),
        7,
        Amount::from_drops(12)?,
    )?
    .with(fields::DESTINATION, StValue::AccountId(Account([2; 20])))?
    .with(fields::AMOUNT, StValue::Amount(amount))?
    .with(fields::DESTINATION_TAG, StValue::UInt32(99))?
    .with(fields::TXN_SIGNATURE, StValue::Blob(vec![0xAB; 70].into()))?
    .with(fields::MEMOS, StValue::Array(vec![(fields::MEMO, memo)]))?)
}

fn account_root() -> Result<LedgerEntry> {
    let account = Account([1; 20]);
    Ok(
        LedgerEntry::new(LedgerEntryType::AccountRoot, account_root_index(&account))?
            .with(fields::ACCOUNT, StValue::AccountId(account))?
            .with(fields::SEQUENCE, StValue::UInt32(8))?
            .with(fields::BALANCE, StValue::Amount(Amount::from_drops(99_988)?))?
            .with(fields::OWNER_COUNT, StValue::UInt32(0))?
            .with(fields::PREVIOUS_TXN_ID, StValue::Hash256(Hash256([3; 32])))?
            .with(fields::PREVIOUS_TXN_LGR_SEQ, StValue::UInt32(10))?,
    )
}

/// Tests that typed objects survive their canonical bytes.
#[test]
fn test_round_trips() -> Result<()> {
    crate::init_tracing();
    let tx = payment()?;
    tx.validate()?;
    let bytes = tx.to_bytes()?;
    assert_eq!(Transaction::from_bytes(&bytes)?, tx);
    assert_eq!(objects::decode(&bytes)?, Decoded::Transaction(tx.clone()));

    let entry = account_root()?;
    entry.validate()?;
    let bytes = entry.to_bytes()?;
    assert_eq!(LedgerEntry::from_bytes(&bytes, entry.index())?, entry);
    match objects::decode(&bytes)? {
        Decoded::LedgerEntry(decoded) => assert_eq!(decoded.entry_type(), LedgerEntryType::AccountRoot),
        other => panic!("decoded as {:?}", other),
    }

    let validation = Validation::new(10, Hash256([5; 32]), 700_000_000, 1)?;
    assert_eq!(Validation::from_bytes(&validation.to_bytes()?)?, validation);

    let mut effect = NodeEffect::new(LedgerEntryType::AccountRoot, entry.index());
    effect.final_fields = Some(StObject::new().with(
        fields::BALANCE,
        StValue::Amount(Amount::from_drops(99_988)?),
    )?);
    let mut meta = TransactionMeta::new(0, TransactionResult::SUCCESS);
    meta.affected_nodes.push(AffectedNode::Modified(effect));
    assert_eq!(TransactionMeta::from_bytes(&meta.to_bytes()?)?, meta);
    Ok(())
}

/// Tests that the JSON form carries the same object.
#[test]
fn test_json_round_trips() -> Result<()> {
    let tx = payment()?;
    let json = tx.to_json();
    assert_eq!(json["TransactionType"], "Payment");
    assert_eq!(json["Amount"]["currency"], "USD");
    assert_eq!(Transaction::from_json(&json)?, tx);

    let entry = account_root()?;
    assert_eq!(LedgerEntry::from_json(&entry.to_json())?, entry);
    Ok(())
}

/// Tests ids against independently computed prefixed hashes.
#[test]
fn test_hash_agreement() -> Result<()> {
    let tx = payment()?;
    let mut preimage = b"TXN\0".to_vec();
    preimage.extend_from_slice(&tx.to_bytes()?);
    assert_eq!(tx.id()?, sha512_half(&preimage));
    assert_eq!(tx.hash()?, tx.id()?);

    let entry = account_root()?;
    let mut preimage = b"MLN\0".to_vec();
    preimage.extend_from_slice(&entry.to_bytes()?);
    preimage.extend_from_slice(entry.index().as_bytes());
    assert_eq!(entry.hash()?, sha512_half(&preimage));

    let meta = TransactionMeta::new(2, TransactionResult::SUCCESS);
    let item = TransactionWithMetaData::new(tx.clone(), meta);
    let mut preimage = b"SND\0".to_vec();
    preimage.extend_from_slice(&item.leaf_data()?);
    preimage.extend_from_slice(tx.id()?.as_bytes());
    assert_eq!(item.hash()?, sha512_half(&preimage));
    Ok(())
}

/// Tests that fields are emitted in strictly increasing priority.
#[test]
fn test_field_order() -> Result<()> {
    for object in [payment()?.into_object(), account_root()?.object().clone()] {
        let mut expected = Encoder::new();
        let mut last: Option<u32> = None;
        for (field, value) in &object {
            if let Some(previous) = last {
                assert!(field.priority() > previous, "{} out of order", field);
            }
            last = Some(field.priority());
            expected.write_field(*field, value)?;
        }
        assert_eq!(codec::encode(&object)?, expected.finish());
    }
    Ok(())
}

/// Tests that the signing body leaves out exactly the not-signing fields.
#[test]
fn test_signing_filter() -> Result<()> {
    let object = payment()?.into_object();
    let mut signing_only = object.clone();
    let excluded: Vec<_> = object
        .iter()
        .map(|(field, _)| *field)
        .filter(|field| !field.is_signing())
        .collect();
    assert_eq!(excluded, vec![fields::TXN_SIGNATURE]);
    for field in excluded {
        signing_only.remove(field);
    }
    assert_eq!(
        codec::encode_for_signing(&object)?,
        codec::encode(&signing_only)?
    );
    Ok(())
}

/// Tests that truncated input is reported, never panics.
#[test]
fn test_truncated_input() -> Result<()> {
    let bytes = payment()?.to_bytes()?;
    for cut in 1..bytes.len() {
        // Some prefixes happen to end on a field boundary and decode fine.
        let _ = codec::decode(&bytes[..cut]);
    }
    assert!(codec::decode(&bytes[..bytes.len() - 1]).is_err());
    Ok(())
}
