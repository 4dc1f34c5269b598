//! Ledger headers.

use crate::codec::decoder::Decoder;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable};
use crate::trie::store::{self, NodeHeader, NodeStore, NodeType};
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

/// Length of the hashed header layout.
pub const HEADER_LEN: usize = 4 + 8 + 32 * 3 + 4 + 4 + 1 + 1;

/// A closed ledger's header. Its hash is the ledger hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerHeader {
    pub sequence: u32,
    /// Native currency in existence, in drops
    pub total_drops: u64,
    pub parent_hash: Hash256,
    /// Root of the transaction trie
    pub transaction_hash: Hash256,
    /// Root of the state trie
    pub account_hash: Hash256,
    pub parent_close_time: u32,
    pub close_time: u32,
    /// Close time rounding, in seconds
    pub close_resolution: u8,
    pub close_flags: u8,
}

impl LedgerHeader {
    /// The fixed layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        BigEndian::write_u32(&mut out[0..4], self.sequence);
        BigEndian::write_u64(&mut out[4..12], self.total_drops);
        out[12..44].copy_from_slice(self.parent_hash.as_bytes());
        out[44..76].copy_from_slice(self.transaction_hash.as_bytes());
        out[76..108].copy_from_slice(self.account_hash.as_bytes());
        BigEndian::write_u32(&mut out[108..112], self.parent_close_time);
        BigEndian::write_u32(&mut out[112..116], self.close_time);
        out[116] = self.close_resolution;
        out[117] = self.close_flags;
        out
    }

    /// Parses the fixed layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != HEADER_LEN {
            return Err(CoreError::short_read(HEADER_LEN, bytes.len()));
        }
        let mut decoder = Decoder::new(bytes);
        Ok(Self {
            sequence: decoder.read_u32()?,
            total_drops: decoder.read_u64()?,
            parent_hash: decoder.read_hash256()?,
            transaction_hash: decoder.read_hash256()?,
            account_hash: decoder.read_hash256()?,
            parent_close_time: decoder.read_u32()?,
            close_time: decoder.read_u32()?,
            close_resolution: decoder.read_u8()?,
            close_flags: decoder.read_u8()?,
        })
    }

    /// Writes the header to `store` as a ledger node, returning its hash.
    pub fn store(&self, store: &dyn NodeStore) -> Result<Hash256, CoreError> {
        let hash = self.hash()?;
        let header = NodeHeader::new(self.sequence, NodeType::Ledger);
        store.insert(
            hash,
            store::encode_value(header, HashPrefix::LedgerMaster, &self.to_bytes()),
        )?;
        Ok(hash)
    }

    /// Reads the header stored under `hash`.
    pub fn load(store: &dyn NodeStore, hash: &Hash256) -> Result<Self, CoreError> {
        let value = store.get(hash)?.ok_or_else(|| {
            debug!("Ledger {} not in store", hash);
            CoreError::NodeNotFound(*hash)
        })?;
        let (_, prefix, body) = store::decode_value(hash, &value)?;
        if prefix != HashPrefix::LedgerMaster {
            return Err(CoreError::CorruptNode {
                hash: *hash,
                reason: format!("expected a ledger header, found prefix {}", prefix),
            });
        }
        let header = Self::from_bytes(body).map_err(|e| CoreError::CorruptNode {
            hash: *hash,
            reason: e.to_string(),
        })?;
        if header.hash()? != *hash {
            return Err(CoreError::CorruptNode {
                hash: *hash,
                reason: "header does not hash to its key".to_string(),
            });
        }
        Ok(header)
    }
}

impl Hashable for LedgerHeader {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::LedgerMaster
    }

    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha512_half;
    use crate::trie::store::MemoryNodeStore;

    fn header() -> LedgerHeader {
        LedgerHeader {
            sequence: 3,
            total_drops: 99_999_999_999_999_964,
            parent_hash: Hash256([1; 32]),
            transaction_hash: Hash256::zero(),
            account_hash: Hash256([3; 32]),
            parent_close_time: 0,
            close_time: 10,
            close_resolution: 30,
            close_flags: 0,
        }
    }

    #[test]
    fn test_layout_and_hash() {
        let h = header();
        let bytes = h.to_bytes();
        assert_eq!(bytes.len(), 118);
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        assert_eq!(bytes[116], 30);
        assert_eq!(LedgerHeader::from_bytes(&bytes).unwrap(), h);

        let mut preimage = b"LWR\0".to_vec();
        preimage.extend_from_slice(&bytes);
        assert_eq!(h.hash().unwrap(), sha512_half(&preimage));
    }

    #[test]
    fn test_store_and_load() {
        let store = MemoryNodeStore::new();
        let h = header();
        let hash = h.store(&store).unwrap();
        assert_eq!(LedgerHeader::load(&store, &hash).unwrap(), h);
        assert_eq!(
            LedgerHeader::load(&store, &Hash256([9; 32])),
            Err(CoreError::NodeNotFound(Hash256([9; 32])))
        );
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            LedgerHeader::from_bytes(&[0u8; 117]),
            Err(CoreError::ShortRead { .. })
        ));
    }
}
