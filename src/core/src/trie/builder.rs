//! Building a trie from its leaves.
//!
//! The root is always an inner node. Every leaf sits at the shallowest depth
//! where its nibble path is unique among the leaves, so leaves sharing a
//! long prefix hang off a chain of single-child inner nodes.

use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::objects::ledger_entry::LedgerEntry;
use crate::objects::metadata::TransactionWithMetaData;
use crate::trie::node::{InnerNode, LeafNode, Node, NodeKind, BRANCHES};
use crate::trie::store::NodeStore;
use std::collections::BTreeMap;
use tracing::debug;

/// Every node of a built trie, children before parents, and its root.
#[derive(Debug, Clone)]
pub struct BuiltTrie {
    /// Zero for an empty trie
    pub root: Hash256,
    pub nodes: Vec<Node>,
}

/// Collects leaves and builds the trie over them.
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    kind: NodeKind,
    leaves: BTreeMap<Hash256, LeafNode>,
}

impl TrieBuilder {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            leaves: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Adds a leaf, replacing any leaf with the same index.
    pub fn insert(&mut self, leaf: LeafNode) -> Result<(), CoreError> {
        if leaf.kind != self.kind {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{:?} leaf in a {:?} trie",
                leaf.kind, self.kind
            )));
        }
        self.leaves.insert(leaf.index, leaf);
        Ok(())
    }

    /// Adds a ledger entry under its index.
    pub fn insert_entry(&mut self, entry: &LedgerEntry) -> Result<(), CoreError> {
        self.insert(LeafNode::new(NodeKind::State, entry.index(), entry.to_bytes()?))
    }

    /// Adds a transaction with metadata under its transaction id.
    pub fn insert_transaction(&mut self, item: &TransactionWithMetaData) -> Result<(), CoreError> {
        self.insert(LeafNode::new(
            NodeKind::Transaction,
            item.transaction.id()?,
            item.leaf_data()?,
        ))
    }

    pub fn remove(&mut self, index: &Hash256) -> Option<LeafNode> {
        self.leaves.remove(index)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Builds every node.
    pub fn build(&self) -> BuiltTrie {
        if self.leaves.is_empty() {
            return BuiltTrie {
                root: Hash256::zero(),
                nodes: Vec::new(),
            };
        }
        let leaves: Vec<&LeafNode> = self.leaves.values().collect();
        let mut nodes = Vec::new();
        let root = self.build_inner(0, &leaves, &mut nodes);
        BuiltTrie { root, nodes }
    }

    /// The root hash; zero for an empty trie.
    pub fn root_hash(&self) -> Hash256 {
        self.build().root
    }

    /// Writes every node to `store` and returns the root hash.
    pub fn flush(&self, store: &dyn NodeStore, ledger_sequence: u32) -> Result<Hash256, CoreError> {
        let built = self.build();
        for node in &built.nodes {
            store.insert(node.hash(), node.to_store_value(ledger_sequence))?;
        }
        debug!(
            "Flushed {} nodes of {:?} trie {}",
            built.nodes.len(),
            self.kind,
            built.root
        );
        Ok(built.root)
    }

    // `leaves` is sorted by index, so each branch's leaves are contiguous.
    fn build_inner(&self, depth: usize, leaves: &[&LeafNode], nodes: &mut Vec<Node>) -> Hash256 {
        let mut inner = InnerNode::new(self.kind);
        let mut start = 0;
        while start < leaves.len() {
            let branch = leaves[start].index.nibble(depth);
            let end = start
                + leaves[start..]
                    .iter()
                    .take_while(|leaf| leaf.index.nibble(depth) == branch)
                    .count();
            let group = &leaves[start..end];
            let child = if group.len() == 1 {
                let leaf = Node::Leaf(group[0].clone());
                let hash = leaf.hash();
                nodes.push(leaf);
                hash
            } else {
                self.build_inner(depth + 1, group, nodes)
            };
            debug_assert!(branch < BRANCHES);
            inner.set_child(branch, child);
            start = end;
        }
        let node = Node::Inner(inner);
        let hash = node.hash();
        nodes.push(node);
        hash
    }
}
