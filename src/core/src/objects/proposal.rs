//! Consensus proposals.
//!
//! Unlike most messages a proposal is not a field object but a fixed
//! layout: sequence, close time, previous ledger and proposed transaction
//! set, then the length-prefixed public key and signature.

use crate::codec::decoder::Decoder;
use crate::codec::encoder::write_vl;
use crate::crypto::PublicKey;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable, Signable};
use byteorder::{BigEndian, ByteOrder};

const FIXED_LEN: usize = 4 + 4 + 32 + 32;

/// A validator's proposed transaction set for the next ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proposal {
    /// Revision of this validator's position within the round
    pub propose_seq: u32,
    pub close_time: u32,
    pub previous_ledger: Hash256,
    /// Root hash of the proposed transaction set
    pub transaction_hash: Hash256,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Proposal {
    /// An unsigned proposal.
    pub fn new(
        propose_seq: u32,
        close_time: u32,
        previous_ledger: Hash256,
        transaction_hash: Hash256,
    ) -> Self {
        Self {
            propose_seq,
            close_time,
            previous_ledger,
            transaction_hash,
            public_key: Vec::new(),
            signature: Vec::new(),
        }
    }

    fn fixed_part(&self) -> [u8; FIXED_LEN] {
        let mut out = [0u8; FIXED_LEN];
        BigEndian::write_u32(&mut out[0..4], self.propose_seq);
        BigEndian::write_u32(&mut out[4..8], self.close_time);
        out[8..40].copy_from_slice(self.previous_ledger.as_bytes());
        out[40..72].copy_from_slice(self.transaction_hash.as_bytes());
        out
    }

    /// Wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut out = self.fixed_part().to_vec();
        write_vl(&mut out, &self.public_key)?;
        write_vl(&mut out, &self.signature)?;
        Ok(out)
    }

    /// Parses wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut decoder = Decoder::new(bytes);
        let proposal = Self {
            propose_seq: decoder.read_u32()?,
            close_time: decoder.read_u32()?,
            previous_ledger: decoder.read_hash256()?,
            transaction_hash: decoder.read_hash256()?,
            public_key: decoder.read_vl()?.to_vec(),
            signature: decoder.read_vl()?.to_vec(),
        };
        if !decoder.is_empty() {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} trailing bytes after proposal",
                decoder.remaining()
            )));
        }
        Ok(proposal)
    }
}

impl Hashable for Proposal {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::Proposal
    }

    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        self.to_bytes()
    }
}

impl Signable for Proposal {
    fn signing_prefix(&self) -> HashPrefix {
        HashPrefix::Proposal
    }

    fn signing_body(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.fixed_part().to_vec())
    }

    fn signing_public_key(&self) -> Option<&[u8]> {
        if self.public_key.is_empty() {
            None
        } else {
            Some(&self.public_key)
        }
    }

    fn signature(&self) -> Option<&[u8]> {
        if self.signature.is_empty() {
            None
        } else {
            Some(&self.signature)
        }
    }

    fn set_signing_public_key(&mut self, key: &PublicKey) -> Result<(), CoreError> {
        self.public_key = key.as_bytes().to_vec();
        Ok(())
    }

    fn set_signature(&mut self, signature: Vec<u8>) -> Result<(), CoreError> {
        self.signature = signature;
        Ok(())
    }
}
