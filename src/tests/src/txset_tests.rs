//! Tests for canonical transaction set ordering.

use anyhow::Result;
use ripple_core::{
    account::Account,
    amount::Amount,
    base58::HashNetwork,
    hash::Hash256,
    objects::{
        Transaction, TransactionMeta, TransactionResult, TransactionType,
        TransactionWithMetaData,
    },
    trie::{MemoryNodeStore, NodeKind, TrieBuilder},
    txset::{canonical_order, CanonicalKey, CanonicalTxSet},
};

fn account_set(account: Account, sequence: u32) -> Result<Transaction> {
    Ok(Transaction::new(
        TransactionType::AccountSet,
        account,
        sequence,
        Amount::from_drops(10)?,
    )?)
}

/// Tests that the last closed ledger hash decides which account goes first.
#[test]
fn test_salt_swaps_accounts() -> Result<()> {
    crate::init_tracing();
    let a1 = Account::from_base58("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh", HashNetwork::Ripple)?;
    let a2 = Account(a1.0.map(|b| !b));
    let t1 = account_set(a1, 4)?;
    let t2 = account_set(a2, 4)?;

    let salt = Hash256::zero();
    let first_wins = a1.widen() < a2.widen();
    let ordered = canonical_order(vec![t1.clone(), t2.clone()], &salt)?;
    assert_eq!(ordered[0].account(), if first_wins { a1 } else { a2 });

    // The accounts differ in their top bit, so salting that bit swaps them.
    let mut bytes = [0u8; 32];
    bytes[0] = 0x80;
    let flipped_salt = Hash256(bytes);
    assert_ne!(
        CanonicalKey::of(&salt, &t1)? < CanonicalKey::of(&salt, &t2)?,
        CanonicalKey::of(&flipped_salt, &t1)? < CanonicalKey::of(&flipped_salt, &t2)?
    );
    let flipped = canonical_order(vec![t1, t2], &flipped_salt)?;
    assert_eq!(flipped[0].account(), ordered[1].account());
    Ok(())
}

/// Tests that the canonical order feeds a transaction trie deterministically.
#[test]
fn test_canonical_set_builds_the_same_trie() -> Result<()> {
    let salt = Hash256([0x3C; 32]);
    let mut forward = CanonicalTxSet::new(salt);
    let mut backward = CanonicalTxSet::new(salt);
    let txs: Vec<Transaction> = (1..=6u8)
        .map(|i| account_set(Account([i.wrapping_mul(53); 20]), u32::from(i)))
        .collect::<Result<_>>()?;
    for tx in &txs {
        forward.insert(tx.clone())?;
    }
    for tx in txs.iter().rev() {
        backward.insert(tx.clone())?;
    }
    let a: Vec<Transaction> = forward.iter().cloned().collect();
    let b: Vec<Transaction> = backward.iter().cloned().collect();
    assert_eq!(a, b);

    let store = MemoryNodeStore::new();
    let mut roots = Vec::new();
    for set in [a, b] {
        let mut trie = TrieBuilder::new(NodeKind::Transaction);
        for (position, tx) in set.into_iter().enumerate() {
            let meta = TransactionMeta::new(position as u32, TransactionResult::SUCCESS);
            trie.insert_transaction(&TransactionWithMetaData::new(tx, meta))?;
        }
        roots.push(trie.flush(&store, 3)?);
    }
    assert_eq!(roots[0], roots[1]);
    Ok(())
}
