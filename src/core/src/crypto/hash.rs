//! Digest helpers: SHA-512 halves and quarters, double SHA-256, account hashing.

use crate::hash::{Hash128, Hash160, Hash256};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// An incremental SHA-512 whose output is truncated to 256 bits.
#[derive(Default, Clone)]
pub struct Sha512Half(Sha512);

impl Sha512Half {
    /// Creates an empty hasher.
    pub fn new() -> Self {
        Self(Sha512::new())
    }

    /// Feeds bytes into the hasher.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    /// Consumes the hasher and returns the first 32 bytes of the digest.
    pub fn finish(self) -> Hash256 {
        let result = self.0.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result[..32]);
        Hash256(hash)
    }
}

/// First 32 bytes of SHA-512.
pub fn sha512_half(data: &[u8]) -> Hash256 {
    let mut hasher = Sha512Half::new();
    hasher.update(data);
    hasher.finish()
}

/// First 32 bytes of SHA-512 over the concatenation of `parts`.
pub fn sha512_half_of(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512Half::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finish()
}

/// First 16 bytes of SHA-512.
pub fn sha512_quarter(data: &[u8]) -> Hash128 {
    let result = Sha512::digest(data);
    let mut out = [0u8; 16];
    out.copy_from_slice(&result[..16]);
    Hash128(out)
}

/// SHA-256 applied twice, as used by the base58 checksum.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// RIPEMD-160 of SHA-256: the account identifier of a public key.
pub fn sha256_ripemd160(data: &[u8]) -> Hash160 {
    let inner = Sha256::digest(data);
    let outer = Ripemd160::digest(inner);
    let mut out = [0u8; 20];
    out.copy_from_slice(&outer);
    Hash160(out)
}
