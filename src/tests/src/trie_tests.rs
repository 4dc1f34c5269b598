//! Tests for the state and transaction tries.

use anyhow::Result;
use rand::Rng;
use ripple_core::{
    account::Account,
    amount::Amount,
    codec::fields,
    config::CoreConfig,
    crypto::hash::sha512_half,
    hash::Hash256,
    hashing::{account_root_index, Hashable},
    objects::{
        LedgerEntry, LedgerEntryType, LedgerHeader, Transaction, TransactionMeta,
        TransactionResult, TransactionType, TransactionWithMetaData,
    },
    st::StValue,
    trie::{self, Action, LeafNode, MemoryNodeStore, Node, NodeKind, TrieBuilder},
};
use std::collections::HashSet;

fn random_leaves(count: usize) -> Vec<(Hash256, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut index = [0u8; 32];
            rng.fill(&mut index);
            let len = rng.gen_range(1..64);
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            (Hash256(index), data)
        })
        .collect()
}

// Straight from the definition: MIN\0 over sixteen child hashes, MLN\0 over
// data and index, leaves at their shallowest unique depth.
fn reference_root(leaves: &[&(Hash256, Vec<u8>)], depth: usize) -> Hash256 {
    let mut preimage = b"MIN\0".to_vec();
    for branch in 0..16 {
        let group: Vec<&(Hash256, Vec<u8>)> = leaves
            .iter()
            .copied()
            .filter(|(index, _)| index.nibble(depth) == branch)
            .collect();
        let child = match group.len() {
            0 => Hash256::zero(),
            1 => {
                let mut leaf = b"MLN\0".to_vec();
                leaf.extend_from_slice(&group[0].1);
                leaf.extend_from_slice(group[0].0.as_bytes());
                sha512_half(&leaf)
            }
            _ => reference_root(&group, depth + 1),
        };
        preimage.extend_from_slice(child.as_bytes());
    }
    sha512_half(&preimage)
}

fn builder_for(leaves: &[(Hash256, Vec<u8>)]) -> Result<TrieBuilder> {
    let mut builder = TrieBuilder::new(NodeKind::State);
    for (index, data) in leaves {
        builder.insert(LeafNode::new(NodeKind::State, *index, data.clone()))?;
    }
    Ok(builder)
}

/// Tests the root hash against the recursive definition.
#[test]
fn test_root_matches_definition() -> Result<()> {
    crate::init_tracing();
    for count in [1, 2, 17, 200] {
        let leaves = random_leaves(count);
        let refs: Vec<&(Hash256, Vec<u8>)> = leaves.iter().collect();
        assert_eq!(builder_for(&leaves)?.root_hash(), reference_root(&refs, 0));
    }
    Ok(())
}

/// Tests a state trie of ledger entries behind a stored ledger header.
#[test]
fn test_ledger_with_state_and_transactions() -> Result<()> {
    let config = CoreConfig::default();
    let store = MemoryNodeStore::new();

    let mut state = TrieBuilder::new(NodeKind::State);
    let mut entries = Vec::new();
    for i in 1..=5u8 {
        let account = Account([i; 20]);
        let entry = LedgerEntry::new(LedgerEntryType::AccountRoot, account_root_index(&account))?
            .with(fields::ACCOUNT, StValue::AccountId(account))?
            .with(fields::SEQUENCE, StValue::UInt32(1))?
            .with(fields::BALANCE, StValue::Amount(Amount::from_drops(1_000 * i64::from(i))?))?
            .with(fields::OWNER_COUNT, StValue::UInt32(0))?
            .with(fields::PREVIOUS_TXN_ID, StValue::Hash256(Hash256([i; 32])))?
            .with(fields::PREVIOUS_TXN_LGR_SEQ, StValue::UInt32(1))?;
        state.insert_entry(&entry)?;
        entries.push(entry);
    }
    let account_hash = state.flush(&store, config.store.default_ledger_sequence)?;

    let tx = Transaction::new(
        TransactionType::AccountSet,
        Account([1; 20]),
        1,
        Amount::from_drops(10)?,
    )?;
    let item = TransactionWithMetaData::new(tx.clone(), TransactionMeta::new(0, TransactionResult::SUCCESS));
    let mut txs = TrieBuilder::new(NodeKind::Transaction);
    txs.insert_transaction(&item)?;
    let transaction_hash = txs.flush(&store, config.store.default_ledger_sequence)?;

    let header = LedgerHeader {
        sequence: 2,
        total_drops: 100_000_000_000,
        parent_hash: Hash256([9; 32]),
        transaction_hash,
        account_hash,
        parent_close_time: 700_000_000,
        close_time: 700_000_010,
        close_resolution: 10,
        close_flags: 0,
    };
    let ledger_hash = header.store(&store)?;
    assert_eq!(ledger_hash, header.hash()?);
    let loaded = LedgerHeader::load(&store, &ledger_hash)?;
    assert_eq!(loaded, header);

    for entry in &entries {
        let leaf = trie::find_leaf(&store, &loaded.account_hash, &entry.index())?
            .expect("entry in state trie");
        assert_eq!(LedgerEntry::from_bytes(&leaf.data, leaf.index)?, *entry);
        assert_eq!(Node::Leaf(leaf).hash(), entry.hash()?);
    }

    let leaf = trie::find_leaf(&store, &loaded.transaction_hash, &tx.id()?)?
        .expect("transaction in transaction trie");
    let mut bytes = leaf.data.clone();
    bytes.extend_from_slice(leaf.index.as_bytes());
    assert_eq!(TransactionWithMetaData::from_bytes(&bytes)?, item);
    assert_eq!(Node::Leaf(leaf).hash(), item.hash()?);
    Ok(())
}

/// Tests diff order and that every emitted node is only on its side.
#[test]
fn test_diff_order_and_sides() -> Result<()> {
    let store = MemoryNodeStore::new();
    let mut leaves = random_leaves(60);
    let left = builder_for(&leaves)?.flush(&store, 1)?;

    // Change some, drop some, add some.
    leaves[3].1.push(0xFF);
    leaves[10].1 = vec![1, 2, 3];
    leaves.truncate(50);
    leaves.extend(random_leaves(8));
    let right = builder_for(&leaves)?.flush(&store, 2)?;

    let entries = trie::diff(&store, &left, &right)?;
    assert!(!entries.is_empty());
    assert_eq!(entries, trie::diff(&store, &left, &right)?);

    for pair in entries.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.action >= b.action);
        if a.action == b.action {
            assert!(a.depth <= b.depth);
        }
    }

    let positions = |root: &Hash256| -> Result<HashSet<(usize, Hash256)>> {
        Ok(trie::fill(&store, root)?
            .into_iter()
            .map(|n| (n.depth, n.hash))
            .collect())
    };
    let (on_left, on_right) = (positions(&left)?, positions(&right)?);
    for entry in &entries {
        let key = (entry.depth, entry.node.hash());
        match entry.action {
            Action::Addition => {
                assert!(on_right.contains(&key));
                assert!(!on_left.contains(&key));
            }
            Action::Deletion => {
                assert!(on_left.contains(&key));
                assert!(!on_right.contains(&key));
            }
        }
    }
    Ok(())
}

/// Tests diff against the empty trie.
#[test]
fn test_diff_from_nothing() -> Result<()> {
    let store = MemoryNodeStore::new();
    let leaves = random_leaves(20);
    let root = builder_for(&leaves)?.flush(&store, 1)?;
    let all = trie::fill(&store, &root)?;

    let added = trie::diff(&store, &Hash256::zero(), &root)?;
    assert_eq!(added.len(), all.len());
    assert!(added.iter().all(|e| e.action == Action::Addition));

    let removed = trie::diff(&store, &root, &Hash256::zero())?;
    assert_eq!(removed.len(), all.len());
    assert!(removed.iter().all(|e| e.action == Action::Deletion));
    Ok(())
}
