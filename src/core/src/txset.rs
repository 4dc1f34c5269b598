//! Canonical ordering of a candidate transaction set.
//!
//! Every participant has to apply the same transactions in the same order.
//! Sorting by account alone would let an account that sorts low always go
//! first, so the account is salted with the last closed ledger's hash before
//! comparing. The salt changes every ledger, which reshuffles accounts while
//! keeping one account's transactions in sequence order.

use crate::account::Account;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::objects::transaction::Transaction;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// The sort key of one transaction under a given salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey {
    /// The widened account XOR the salt
    pub account: Hash256,
    pub sequence: u32,
    /// Breaks ties between transactions with the same account and sequence
    pub txid: Hash256,
}

impl CanonicalKey {
    pub fn new(salt: &Hash256, account: &Account, sequence: u32, txid: Hash256) -> Self {
        Self {
            account: account.widen().xor(salt),
            sequence,
            txid,
        }
    }

    /// The key of `tx` under `salt`.
    pub fn of(salt: &Hash256, tx: &Transaction) -> Result<Self, CoreError> {
        Ok(Self::new(salt, &tx.account(), tx.sequence(), tx.id()?))
    }
}

/// A set of transactions held in canonical order.
#[derive(Debug, Clone)]
pub struct CanonicalTxSet {
    salt: Hash256,
    txs: BTreeMap<CanonicalKey, Transaction>,
}

impl CanonicalTxSet {
    /// An empty set salted with the last closed ledger hash.
    pub fn new(last_closed_ledger: Hash256) -> Self {
        Self {
            salt: last_closed_ledger,
            txs: BTreeMap::new(),
        }
    }

    pub fn salt(&self) -> Hash256 {
        self.salt
    }

    /// Adds a transaction. Returns false if it was already present.
    pub fn insert(&mut self, tx: Transaction) -> Result<bool, CoreError> {
        let key = CanonicalKey::of(&self.salt, &tx)?;
        trace!("Adding {} at sequence {} to canonical set", key.txid, key.sequence);
        Ok(self.txs.insert(key, tx).is_none())
    }

    /// Removes a transaction by id.
    pub fn remove(&mut self, txid: &Hash256) -> Option<Transaction> {
        let key = *self.txs.keys().find(|key| key.txid == *txid)?;
        self.txs.remove(&key)
    }

    pub fn contains(&self, txid: &Hash256) -> bool {
        self.txs.keys().any(|key| key.txid == *txid)
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Re-keys every transaction under a new salt.
    pub fn reset(&mut self, last_closed_ledger: Hash256) {
        let salt = last_closed_ledger;
        self.txs = std::mem::take(&mut self.txs)
            .into_iter()
            .map(|(key, tx)| {
                let account = key.account.xor(&self.salt).xor(&salt);
                (
                    CanonicalKey {
                        account,
                        ..key
                    },
                    tx,
                )
            })
            .collect();
        self.salt = salt;
        debug!("Re-salted canonical set of {} with {}", self.txs.len(), salt);
    }

    /// Transactions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.txs.values()
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.txs.into_values().collect()
    }
}

/// Sorts `txs` into canonical order for the given last closed ledger hash.
pub fn canonical_order(
    txs: Vec<Transaction>,
    last_closed_ledger: &Hash256,
) -> Result<Vec<Transaction>, CoreError> {
    let mut keyed = txs
        .into_iter()
        .map(|tx| Ok((CanonicalKey::of(last_closed_ledger, &tx)?, tx)))
        .collect::<Result<Vec<_>, CoreError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, tx)| tx).collect())
}
