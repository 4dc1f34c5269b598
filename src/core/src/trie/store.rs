//! Content-addressed node storage.
//!
//! A stored value is an 8-byte header (ledger sequence, node type, three
//! reserved bytes) followed by the node's hash prefix and body, so a value
//! can be rehashed and checked against its key without knowing its type in
//! advance.

use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::HashPrefix;
use byteorder::{BigEndian, ByteOrder};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// What a stored node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A ledger header
    Ledger,
    /// A state trie node
    AccountNode,
    /// A transaction trie node
    TransactionNode,
}

impl NodeType {
    pub fn code(&self) -> u8 {
        match self {
            NodeType::Ledger => 1,
            NodeType::AccountNode => 3,
            NodeType::TransactionNode => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(NodeType::Ledger),
            3 => Some(NodeType::AccountNode),
            4 => Some(NodeType::TransactionNode),
            _ => None,
        }
    }
}

/// The header in front of every stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader {
    /// The ledger the node was written for
    pub ledger_sequence: u32,
    pub node_type: NodeType,
}

impl NodeHeader {
    /// Encoded width.
    pub const LEN: usize = 8;

    pub fn new(ledger_sequence: u32, node_type: NodeType) -> Self {
        Self {
            ledger_sequence,
            node_type,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        BigEndian::write_u32(&mut out[0..4], self.ledger_sequence);
        out[4] = self.node_type.code();
        out
    }

    /// Parses a header; `hash` is only used in errors.
    pub fn from_bytes(hash: &Hash256, bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() < Self::LEN {
            return Err(corrupt(hash, format!("{} byte value has no header", bytes.len())));
        }
        let node_type = NodeType::from_code(bytes[4])
            .ok_or_else(|| corrupt(hash, format!("unknown node type {}", bytes[4])))?;
        Ok(Self {
            ledger_sequence: BigEndian::read_u32(&bytes[0..4]),
            node_type,
        })
    }
}

fn corrupt(hash: &Hash256, reason: String) -> CoreError {
    CoreError::CorruptNode {
        hash: *hash,
        reason,
    }
}

/// Builds a stored value: header, prefix, body.
pub fn encode_value(header: NodeHeader, prefix: HashPrefix, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NodeHeader::LEN + 4 + body.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&prefix.bytes());
    out.extend_from_slice(body);
    out
}

/// Splits a stored value into header, prefix and body.
pub fn decode_value<'a>(
    hash: &Hash256,
    value: &'a [u8],
) -> Result<(NodeHeader, HashPrefix, &'a [u8]), CoreError> {
    let header = NodeHeader::from_bytes(hash, value)?;
    let rest = &value[NodeHeader::LEN..];
    if rest.len() < 4 {
        return Err(corrupt(hash, "value has no hash prefix".to_string()));
    }
    let prefix = HashPrefix::from_bytes(&rest[..4])
        .ok_or_else(|| corrupt(hash, format!("unknown hash prefix {}", hex::encode(&rest[..4]))))?;
    Ok((header, prefix, &rest[4..]))
}

/// A map from node hash to stored value.
pub trait NodeStore: Send + Sync {
    /// The value stored under `hash`, if any.
    fn get(&self, hash: &Hash256) -> Result<Option<Vec<u8>>, CoreError>;

    /// Stores `value` under `hash`, replacing any previous value.
    fn insert(&self, hash: Hash256, value: Vec<u8>) -> Result<(), CoreError>;

    /// True when something is stored under `hash`.
    fn contains(&self, hash: &Hash256) -> Result<bool, CoreError> {
        Ok(self.get(hash)?.is_some())
    }
}

/// A node store held in memory. Readers proceed concurrently; writers are
/// serialized.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: RwLock<HashMap<Hash256, Vec<u8>>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> Result<usize, CoreError> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| CoreError::StoreError(e.to_string()))?;
        Ok(nodes.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(&self, hash: &Hash256) -> Result<Option<Vec<u8>>, CoreError> {
        let nodes = self
            .nodes
            .read()
            .map_err(|e| CoreError::StoreError(e.to_string()))?;
        Ok(nodes.get(hash).cloned())
    }

    fn insert(&self, hash: Hash256, value: Vec<u8>) -> Result<(), CoreError> {
        trace!("Storing {} bytes under {}", value.len(), hash);
        let mut nodes = self
            .nodes
            .write()
            .map_err(|e| CoreError::StoreError(e.to_string()))?;
        nodes.insert(hash, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_value_layout() {
        let header = NodeHeader::new(0x0102_0304, NodeType::AccountNode);
        let value = encode_value(header, HashPrefix::InnerNode, &[0xAA, 0xBB]);
        assert_eq!(
            value,
            vec![1, 2, 3, 4, 3, 0, 0, 0, b'M', b'I', b'N', 0, 0xAA, 0xBB]
        );
        let hash = Hash256::zero();
        let (decoded, prefix, body) = decode_value(&hash, &value).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(prefix, HashPrefix::InnerNode);
        assert_eq!(body, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_corrupt_values() {
        let hash = Hash256([1; 32]);
        assert!(matches!(
            decode_value(&hash, &[0, 0, 0, 0]),
            Err(CoreError::CorruptNode { .. })
        ));
        assert!(matches!(
            decode_value(&hash, &[0, 0, 0, 0, 2, 0, 0, 0, b'M', b'I', b'N', 0]),
            Err(CoreError::CorruptNode { .. })
        ));
        assert!(matches!(
            decode_value(&hash, &[0, 0, 0, 0, 1, 0, 0, 0, b'X', b'Y', b'Z', 0]),
            Err(CoreError::CorruptNode { .. })
        ));
    }

    #[test]
    fn test_concurrent_readers() {
        let store = Arc::new(MemoryNodeStore::new());
        for i in 0..16u8 {
            store.insert(Hash256([i; 32]), vec![i]).unwrap();
        }
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..16u8 {
                        assert_eq!(store.get(&Hash256([i; 32])).unwrap(), Some(vec![i]));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 16);
        assert!(!store.contains(&Hash256([99; 32])).unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let store = Arc::new(MemoryNodeStore::new());
        store.insert(Hash256([1; 32]), vec![1]).unwrap();
        let writer = Arc::clone(&store);
        let result = thread::spawn(move || {
            let _nodes = writer.nodes.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(store.len(), Err(CoreError::StoreError(_))));
        assert!(matches!(store.is_empty(), Err(CoreError::StoreError(_))));
        assert!(matches!(
            store.get(&Hash256([1; 32])),
            Err(CoreError::StoreError(_))
        ));
    }
}
