//! Trie nodes and their stored forms.

use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{prefixed_hash, HashPrefix};
use crate::trie::store::{self, NodeHeader, NodeStore, NodeType};
use std::fmt;
use tracing::debug;

/// Branching factor: one child per nibble.
pub const BRANCHES: usize = 16;

const CANONICAL_LEN: usize = BRANCHES * 32;

/// Which tree a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Ledger entries keyed by ledger index
    State,
    /// Transactions with metadata keyed by transaction id
    Transaction,
}

impl NodeKind {
    /// The prefix leaves of this tree hash under.
    pub fn leaf_prefix(&self) -> HashPrefix {
        match self {
            NodeKind::State => HashPrefix::LeafNode,
            NodeKind::Transaction => HashPrefix::TxNode,
        }
    }

    /// The stored node type.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::State => NodeType::AccountNode,
            NodeKind::Transaction => NodeType::TransactionNode,
        }
    }

    fn from_node_type(hash: &Hash256, node_type: NodeType) -> Result<Self, CoreError> {
        match node_type {
            NodeType::AccountNode => Ok(NodeKind::State),
            NodeType::TransactionNode => Ok(NodeKind::Transaction),
            NodeType::Ledger => Err(CoreError::CorruptNode {
                hash: *hash,
                reason: "a ledger header is not a trie node".to_string(),
            }),
        }
    }
}

/// An inner node: sixteen child hashes, zero where a branch is empty.
#[derive(Clone, PartialEq, Eq)]
pub struct InnerNode {
    pub kind: NodeKind,
    pub children: [Hash256; BRANCHES],
}

impl InnerNode {
    /// A node with no children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: [Hash256::zero(); BRANCHES],
        }
    }

    pub fn child(&self, branch: usize) -> Hash256 {
        self.children[branch]
    }

    pub fn set_child(&mut self, branch: usize, hash: Hash256) {
        self.children[branch] = hash;
    }

    /// Number of non-empty branches.
    pub fn child_count(&self) -> usize {
        self.children.iter().filter(|c| !c.is_zero()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.child_count() == 0
    }

    /// `SHA-512-half(MIN\0 ∥ 16 × 32 bytes)`.
    pub fn hash(&self) -> Hash256 {
        prefixed_hash(HashPrefix::InnerNode, &self.to_canonical())
    }

    /// All sixteen slots, in order.
    pub fn to_canonical(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CANONICAL_LEN);
        for child in &self.children {
            out.extend_from_slice(child.as_bytes());
        }
        out
    }

    /// `{branch u8, hash}` for each non-empty slot.
    pub fn to_compressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.child_count() * 33);
        for (branch, child) in self.children.iter().enumerate() {
            if !child.is_zero() {
                out.push(branch as u8);
                out.extend_from_slice(child.as_bytes());
            }
        }
        out
    }

    /// Parses the canonical form.
    pub fn from_canonical(kind: NodeKind, bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != CANONICAL_LEN {
            return Err(CoreError::short_read(CANONICAL_LEN, bytes.len()));
        }
        let mut node = Self::new(kind);
        for (branch, chunk) in bytes.chunks(32).enumerate() {
            node.children[branch] = Hash256::from_slice(chunk)?;
        }
        Ok(node)
    }

    /// Parses the compressed form. Branches must be ascending.
    pub fn from_compressed(kind: NodeKind, bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() % 33 != 0 {
            return Err(CoreError::UnexpectedFieldType(format!(
                "compressed inner node of {} bytes",
                bytes.len()
            )));
        }
        let mut node = Self::new(kind);
        let mut last: Option<usize> = None;
        for entry in bytes.chunks(33) {
            let branch = entry[0] as usize;
            if branch >= BRANCHES || last.map_or(false, |l| branch <= l) {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "bad branch {} in compressed inner node",
                    branch
                )));
            }
            node.children[branch] = Hash256::from_slice(&entry[1..])?;
            last = Some(branch);
        }
        Ok(node)
    }
}

impl fmt::Debug for InnerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InnerNode({:?}, {} children)", self.kind, self.child_count())
    }
}

/// A leaf: an item and the 256-bit key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub kind: NodeKind,
    pub index: Hash256,
    /// Entry bytes for state leaves; `VL(tx) ∥ VL(meta)` for transaction leaves
    pub data: Vec<u8>,
}

impl LeafNode {
    pub fn new(kind: NodeKind, index: Hash256, data: Vec<u8>) -> Self {
        Self { kind, index, data }
    }

    /// `SHA-512-half(prefix ∥ data ∥ index)`.
    pub fn hash(&self) -> Hash256 {
        prefixed_hash(self.kind.leaf_prefix(), &self.body())
    }

    fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.data.len() + 32);
        body.extend_from_slice(&self.data);
        body.extend_from_slice(self.index.as_bytes());
        body
    }
}

/// Either kind of node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Inner(InnerNode),
    Leaf(LeafNode),
}

impl Node {
    pub fn hash(&self) -> Hash256 {
        match self {
            Node::Inner(inner) => inner.hash(),
            Node::Leaf(leaf) => leaf.hash(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Inner(inner) => inner.kind,
            Node::Leaf(leaf) => leaf.kind,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The stored form, stamped with `ledger_sequence`.
    pub fn to_store_value(&self, ledger_sequence: u32) -> Vec<u8> {
        let header = NodeHeader::new(ledger_sequence, self.kind().node_type());
        match self {
            Node::Inner(inner) => {
                store::encode_value(header, HashPrefix::InnerNode, &inner.to_canonical())
            }
            Node::Leaf(leaf) => store::encode_value(header, leaf.kind.leaf_prefix(), &leaf.body()),
        }
    }

    /// Parses a stored value and checks it hashes to `hash`.
    ///
    /// Inner nodes may be stored in either canonical or compressed form.
    pub fn from_store_value(hash: &Hash256, value: &[u8]) -> Result<Self, CoreError> {
        let (header, prefix, body) = store::decode_value(hash, value)?;
        let kind = NodeKind::from_node_type(hash, header.node_type)?;
        let corrupt = |reason: String| CoreError::CorruptNode {
            hash: *hash,
            reason,
        };
        let node = if prefix == HashPrefix::InnerNode {
            let inner = if body.len() == CANONICAL_LEN {
                InnerNode::from_canonical(kind, body)
            } else {
                InnerNode::from_compressed(kind, body)
            };
            Node::Inner(inner.map_err(|e| corrupt(e.to_string()))?)
        } else if prefix == kind.leaf_prefix() {
            if body.len() < 32 {
                return Err(corrupt(format!("{} byte leaf has no index", body.len())));
            }
            let (data, index) = body.split_at(body.len() - 32);
            Node::Leaf(LeafNode::new(kind, Hash256::from_slice(index)?, data.to_vec()))
        } else {
            return Err(corrupt(format!("prefix {} in a {:?} tree", prefix, kind)));
        };
        if node.hash() != *hash {
            return Err(corrupt(format!("content hashes to {}", node.hash())));
        }
        Ok(node)
    }
}

/// Loads the node stored under `hash`.
pub fn fetch_node(store: &dyn NodeStore, hash: &Hash256) -> Result<Node, CoreError> {
    match store.get(hash)? {
        Some(value) => Node::from_store_value(hash, &value),
        None => {
            debug!("Node {} not in store", hash);
            Err(CoreError::NodeNotFound(*hash))
        }
    }
}
