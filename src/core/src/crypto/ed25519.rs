//! Ed25519 keys. Public keys travel with a leading `0xED` byte.

use crate::crypto::hash::sha512_half;
use crate::crypto::seed::Seed;
use crate::errors::CoreError;
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signature, Signer, Verifier};

/// Prefix byte marking a 33-byte public key as Ed25519.
pub const ED25519_PREFIX: u8 = 0xED;

/// An Ed25519 key pair.
pub struct Ed25519Key {
    /// The raw 32-byte secret
    secret: [u8; 32],
    /// The derived public key
    public: PublicKey,
}

impl Ed25519Key {
    /// Derives the key of a seed: the secret is the seed's SHA-512 half.
    pub fn from_seed(seed: &Seed) -> Result<Self, CoreError> {
        let secret = sha512_half(seed.as_bytes());
        Self::from_secret_bytes(secret.as_bytes())
    }

    /// Wraps a raw 32-byte secret.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let secret =
            SecretKey::from_bytes(bytes).map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;
        let public = PublicKey::from(&secret);
        let mut raw = [0u8; 32];
        raw.copy_from_slice(bytes);
        Ok(Self {
            secret: raw,
            public,
        })
    }

    /// The 33-byte public key, `0xED` followed by the curve point.
    pub fn public_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = ED25519_PREFIX;
        out[1..].copy_from_slice(self.public.as_bytes());
        out
    }

    /// The raw 32-byte secret.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret
    }

    /// Signs the whole message; Ed25519 hashes internally.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let secret = SecretKey::from_bytes(&self.secret)
            .map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;
        let keypair = Keypair {
            secret,
            public: self.public,
        };
        Ok(keypair.sign(message).to_bytes().to_vec())
    }
}

impl Clone for Ed25519Key {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret,
            public: self.public,
        }
    }
}

impl PartialEq for Ed25519Key {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for Ed25519Key {}

impl std::fmt::Debug for Ed25519Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Key({})", hex::encode_upper(self.public_bytes()))
    }
}

/// Verifies a signature made by the 33-byte, `0xED`-prefixed `public_key`.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CoreError> {
    if public_key.len() != 33 || public_key[0] != ED25519_PREFIX {
        return Err(CoreError::BadSignatureFormat(format!(
            "not an Ed25519 public key: {}",
            hex::encode_upper(public_key)
        )));
    }
    let public = PublicKey::from_bytes(&public_key[1..])
        .map_err(|e| CoreError::BadSignatureFormat(format!("public key: {}", e)))?;
    let signature = Signature::try_from(signature)
        .map_err(|e| CoreError::BadSignatureFormat(format!("signature: {}", e)))?;
    Ok(public.verify(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_derivation_is_deterministic() {
        let seed = Seed::from_passphrase("masterpassphrase");
        let a = Ed25519Key::from_seed(&seed).unwrap();
        let b = Ed25519Key::from_seed(&seed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.public_bytes()[0], ED25519_PREFIX);
    }

    #[test]
    fn test_signatures_are_reproducible() {
        let key = Ed25519Key::from_seed(&Seed::from_passphrase("alice")).unwrap();
        let first = key.sign(b"STX\0payload").unwrap();
        let second = key.sign(b"STX\0payload").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(verify(&key.public_bytes(), b"STX\0payload", &first).unwrap());
        assert!(!verify(&key.public_bytes(), b"STX\0payloae", &first).unwrap());
    }

    #[test]
    fn test_bad_key_and_signature() {
        let key = Ed25519Key::from_seed(&Seed::random()).unwrap();
        assert!(verify(&key.public_bytes()[1..], b"m", &[0u8; 64]).is_err());
        assert!(verify(&key.public_bytes(), b"m", &[0u8; 10]).is_err());
    }
}
