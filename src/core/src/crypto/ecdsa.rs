//! secp256k1 keys with the family-generator derivation and DER signatures.
//!
//! A seed yields a root key by hashing `seed || counter` until the digest is a
//! valid scalar. Account keys add a second, sequence-specific scalar derived
//! from the root public key.

use crate::crypto::hash::{sha512_half, Sha512Half};
use crate::crypto::seed::Seed;
use crate::errors::CoreError;
use crate::hash::Hash256;
use lazy_static::lazy_static;
use secp256k1::{ecdsa, All, Message, PublicKey, Scalar, Secp256k1, SecretKey};
use tracing::debug;

lazy_static! {
    static ref SECP256K1: Secp256k1<All> = Secp256k1::new();
}

/// An ECDSA key pair on secp256k1.
#[derive(Clone, PartialEq, Eq)]
pub struct EcdsaKey {
    /// The private scalar
    secret: SecretKey,
    /// The corresponding point
    public: PublicKey,
}

impl EcdsaKey {
    /// Derives the root (generator) key of a family.
    pub fn root_from_seed(seed: &Seed) -> Result<Self, CoreError> {
        let secret = first_valid_scalar(|counter| {
            let mut hasher = Sha512Half::new();
            hasher.update(seed.as_bytes());
            hasher.update(counter.to_be_bytes());
            hasher.finish()
        })?;
        Ok(Self::from_secret(secret))
    }

    /// Derives the account key at `sequence` from this root key.
    pub fn account(&self, sequence: u32) -> Result<Self, CoreError> {
        let root_public = self.public_bytes();
        let tweak = first_valid_scalar(|sub| {
            let mut hasher = Sha512Half::new();
            hasher.update(root_public);
            hasher.update(sequence.to_be_bytes());
            hasher.update(sub.to_be_bytes());
            hasher.finish()
        })?;
        let scalar = Scalar::from_be_bytes(tweak.secret_bytes())
            .map_err(|_| CoreError::BadSignatureFormat("derived scalar out of range".into()))?;
        let secret = self
            .secret
            .add_tweak(&scalar)
            .map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;
        Ok(Self::from_secret(secret))
    }

    /// Derives the account key at `sequence` straight from a seed.
    pub fn from_seed(seed: &Seed, sequence: u32) -> Result<Self, CoreError> {
        Self::root_from_seed(seed)?.account(sequence)
    }

    /// Wraps a raw 32-byte private scalar.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(&SECP256K1, &secret);
        Self { secret, public }
    }

    /// The 33-byte compressed public key.
    pub fn public_bytes(&self) -> [u8; 33] {
        self.public.serialize()
    }

    /// The 32-byte private scalar.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// Signs a 32-byte digest, returning a DER signature with low S.
    pub fn sign_hash(&self, hash: &Hash256) -> Result<Vec<u8>, CoreError> {
        let message = Message::from_slice(hash.as_bytes())
            .map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;
        let signature = SECP256K1.sign_ecdsa(&message, &self.secret);
        Ok(signature.serialize_der().to_vec())
    }

    /// Signs a message by its SHA-512 half.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        self.sign_hash(&sha512_half(message))
    }
}

impl std::fmt::Debug for EcdsaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EcdsaKey({})", hex::encode_upper(self.public_bytes()))
    }
}

/// Returns the first `SecretKey` produced by `candidate(0)`, `candidate(1)`, ...
///
/// A digest is valid when it lies strictly between zero and the curve order.
fn first_valid_scalar<F>(mut candidate: F) -> Result<SecretKey, CoreError>
where
    F: FnMut(u32) -> Hash256,
{
    for counter in 0..=u32::MAX {
        if let Ok(secret) = SecretKey::from_slice(candidate(counter).as_bytes()) {
            return Ok(secret);
        }
        debug!("Scalar candidate {} out of range, trying next", counter);
    }
    Err(CoreError::BadSignatureFormat(
        "no valid scalar in counter space".into(),
    ))
}

/// Verifies a DER signature over a 32-byte digest.
///
/// Signatures with a high S value are normalised first unless
/// `require_fully_canonical` is set, in which case they do not verify.
pub fn verify_hash(
    public_key: &[u8],
    hash: &Hash256,
    signature: &[u8],
    require_fully_canonical: bool,
) -> Result<bool, CoreError> {
    let public = PublicKey::from_slice(public_key)
        .map_err(|e| CoreError::BadSignatureFormat(format!("public key: {}", e)))?;
    let mut signature = ecdsa::Signature::from_der(signature)
        .map_err(|e| CoreError::BadSignatureFormat(format!("signature: {}", e)))?;
    let message = Message::from_slice(hash.as_bytes())
        .map_err(|e| CoreError::BadSignatureFormat(e.to_string()))?;

    let mut normalized = signature;
    normalized.normalize_s();
    if normalized != signature {
        if require_fully_canonical {
            debug!("Rejecting high-S signature under fully canonical rules");
            return Ok(false);
        }
        signature = normalized;
    }

    Ok(SECP256K1
        .verify_ecdsa(&message, &signature, &public)
        .is_ok())
}

/// Verifies a DER signature over the SHA-512 half of `message`.
pub fn verify(
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
    require_fully_canonical: bool,
) -> Result<bool, CoreError> {
    verify_hash(
        public_key,
        &sha512_half(message),
        signature,
        require_fully_canonical,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_key_is_deterministic() {
        let seed = Seed::from_passphrase("masterpassphrase");
        let a = EcdsaKey::root_from_seed(&seed).unwrap();
        let b = EcdsaKey::root_from_seed(&seed).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, a.account(0).unwrap());
    }

    #[test]
    fn test_accounts_differ_by_sequence() {
        let seed = Seed::from_passphrase("masterpassphrase");
        let root = EcdsaKey::root_from_seed(&seed).unwrap();
        assert_ne!(
            root.account(0).unwrap().public_bytes(),
            root.account(1).unwrap().public_bytes()
        );
    }

    #[test]
    fn test_sign_and_verify_hash() {
        let key = EcdsaKey::from_seed(&Seed::random(), 0).unwrap();
        let hash = sha512_half(b"Hello, nurse!");
        let signature = key.sign_hash(&hash).unwrap();
        assert!(verify_hash(&key.public_bytes(), &hash, &signature, true).unwrap());

        let other = sha512_half(b"Hello, doctor!");
        assert!(!verify_hash(&key.public_bytes(), &other, &signature, false).unwrap());
    }

    #[test]
    fn test_high_s_is_normalised_unless_strict() {
        let key = EcdsaKey::from_seed(&Seed::random(), 0).unwrap();
        let hash = sha512_half(b"canonical");
        let der = key.sign_hash(&hash).unwrap();

        // Flip S to n - S.
        let low = ecdsa::Signature::from_der(&der).unwrap();
        let compact = low.serialize_compact();
        let order: [u8; 32] = secp256k1::constants::CURVE_ORDER;
        let mut high_s = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let diff = order[i] as i16 - compact[32 + i] as i16 - borrow;
            if diff < 0 {
                high_s[i] = (diff + 256) as u8;
                borrow = 1;
            } else {
                high_s[i] = diff as u8;
                borrow = 0;
            }
        }
        let mut high = [0u8; 64];
        high[..32].copy_from_slice(&compact[..32]);
        high[32..].copy_from_slice(&high_s);
        let high_der = ecdsa::Signature::from_compact(&high)
            .unwrap()
            .serialize_der()
            .to_vec();

        assert!(verify_hash(&key.public_bytes(), &hash, &high_der, false).unwrap());
        assert!(!verify_hash(&key.public_bytes(), &hash, &high_der, true).unwrap());
    }

    #[test]
    fn test_malformed_inputs() {
        let key = EcdsaKey::from_seed(&Seed::random(), 0).unwrap();
        let hash = sha512_half(b"x");
        assert!(matches!(
            verify_hash(&[0x02; 5], &hash, &[0x30], false),
            Err(CoreError::BadSignatureFormat(_))
        ));
        assert!(matches!(
            verify_hash(&key.public_bytes(), &hash, &[0x30, 0x01], false),
            Err(CoreError::BadSignatureFormat(_))
        ));
        assert!(EcdsaKey::from_secret_bytes(&[0u8; 32]).is_err());
    }
}
