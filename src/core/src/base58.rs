//! Base58-check codec with network-specific alphabets and version bytes.

use crate::crypto::hash::double_sha256;
use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 58^10: base58 digits are produced and consumed ten at a time.
const BLOCK: u64 = 430_804_206_899_405_824;
const BLOCK_DIGITS: usize = 10;

/// The zero account (20 zero bytes, version 0) in the Ripple alphabet.
pub const ACCOUNT_ZERO: &str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";
/// The account whose id is the integer one.
pub const ACCOUNT_ONE: &str = "rrrrrrrrrrrrrrrrrrrrBZbvji";

/// Prefix of an Ed25519 family seed ("sEd...").
pub const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];

/// Which network's alphabet to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashNetwork {
    /// The Ripple alphabet (`r...` addresses).
    Ripple,
    /// The Bitcoin alphabet.
    Bitcoin,
    /// Litecoin shares the Bitcoin alphabet.
    Litecoin,
}

impl Default for HashNetwork {
    fn default() -> Self {
        HashNetwork::Ripple
    }
}

impl HashNetwork {
    /// The 58-character alphabet for this network.
    pub fn alphabet(&self) -> &'static [u8; 58] {
        match self {
            HashNetwork::Ripple => b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz",
            HashNetwork::Bitcoin | HashNetwork::Litecoin => {
                b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz"
            }
        }
    }

    fn index_of(&self, c: u8) -> Option<u64> {
        self.alphabet().iter().position(|a| *a == c).map(|i| i as u64)
    }
}

/// Version bytes of the base58 identities used on the Ripple network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// 20-byte account id.
    AccountId,
    /// 33-byte node (validator) public key.
    NodePublic,
    /// 32-byte node private key.
    NodePrivate,
    /// 16-byte family seed.
    FamilySeed,
    /// 32-byte account private key.
    AccountPrivate,
    /// 33-byte account public key.
    AccountPublic,
    /// 33-byte family generator (root public key).
    FamilyGenerator,
}

impl Version {
    /// The leading version byte.
    pub fn byte(&self) -> u8 {
        match self {
            Version::AccountId => 0,
            Version::NodePublic => 28,
            Version::NodePrivate => 32,
            Version::FamilySeed => 33,
            Version::AccountPrivate => 34,
            Version::AccountPublic => 35,
            Version::FamilyGenerator => 41,
        }
    }

    /// Length of the payload that follows the version byte.
    pub fn payload_len(&self) -> usize {
        match self {
            Version::AccountId => 20,
            Version::FamilySeed => 16,
            Version::NodePrivate | Version::AccountPrivate => 32,
            Version::NodePublic | Version::AccountPublic | Version::FamilyGenerator => 33,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.byte())
    }
}

/// Encodes raw bytes without a checksum.
pub fn encode(input: &[u8], network: HashNetwork) -> String {
    let alphabet = network.alphabet();
    let zeros = input.iter().take_while(|b| **b == 0).count();

    // Little-endian base58 digits.
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
    let mut number: Vec<u8> = input[zeros..].to_vec();
    while !number.is_empty() {
        let mut remainder: u128 = 0;
        let mut quotient = Vec::with_capacity(number.len());
        for byte in &number {
            let acc = (remainder << 8) | u128::from(*byte);
            let q = acc / u128::from(BLOCK);
            remainder = acc % u128::from(BLOCK);
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q as u8);
            }
        }
        let mut block = remainder as u64;
        for _ in 0..BLOCK_DIGITS {
            digits.push((block % 58) as u8);
            block /= 58;
        }
        number = quotient;
    }
    while digits.last() == Some(&0) {
        digits.pop();
    }

    let mut out = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        out.push(alphabet[0] as char);
    }
    for digit in digits.iter().rev() {
        out.push(alphabet[*digit as usize] as char);
    }
    out
}

/// Decodes base58 text without checking a checksum.
pub fn decode(input: &str, network: HashNetwork) -> Result<Vec<u8>, CoreError> {
    let bytes = input.as_bytes();
    let zero_char = network.alphabet()[0];
    let zeros = bytes.iter().take_while(|c| **c == zero_char).count();

    // Big-endian magnitude.
    let mut number: Vec<u8> = Vec::with_capacity(bytes.len());
    for chunk in bytes[zeros..].chunks(BLOCK_DIGITS) {
        let mut value: u64 = 0;
        let mut multiplier: u64 = 1;
        for c in chunk {
            let digit = network
                .index_of(*c)
                .ok_or_else(|| CoreError::BadBase58(format!("invalid character {:?}", *c as char)))?;
            value = value * 58 + digit;
            multiplier *= 58;
        }
        let mut carry = u128::from(value);
        for byte in number.iter_mut().rev() {
            let acc = u128::from(*byte) * u128::from(multiplier) + carry;
            *byte = (acc & 0xFF) as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            number.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend_from_slice(&number);
    Ok(out)
}

/// Appends the 4-byte double SHA-256 checksum and encodes.
pub fn encode_check(payload: &[u8], network: HashNetwork) -> String {
    let checksum = double_sha256(payload);
    let mut buf = Vec::with_capacity(payload.len() + 4);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&checksum[..4]);
    encode(&buf, network)
}

/// Decodes and verifies the trailing checksum, returning the payload.
///
/// On the Ripple network the aliases `"0"` and `"1"` stand for the zero and
/// one accounts.
pub fn decode_check(input: &str, network: HashNetwork) -> Result<Vec<u8>, CoreError> {
    let input = match (network, input) {
        (HashNetwork::Ripple, "0") => ACCOUNT_ZERO,
        (HashNetwork::Ripple, "1") => ACCOUNT_ONE,
        _ => input,
    };
    let raw = decode(input, network)?;
    if raw.len() < 5 {
        return Err(CoreError::BadBase58(format!(
            "decoded length {} is too short for a checksum",
            raw.len()
        )));
    }
    let (payload, checksum) = raw.split_at(raw.len() - 4);
    if double_sha256(payload)[..4] != *checksum {
        return Err(CoreError::BadChecksum);
    }
    Ok(payload.to_vec())
}

/// Encodes `payload` behind a version byte.
pub fn encode_versioned(version: Version, payload: &[u8], network: HashNetwork) -> String {
    encode_with_prefix(&[version.byte()], payload, network)
}

/// Encodes `payload` behind an arbitrary byte prefix.
pub fn encode_with_prefix(prefix: &[u8], payload: &[u8], network: HashNetwork) -> String {
    let mut buf = Vec::with_capacity(prefix.len() + payload.len());
    buf.extend_from_slice(prefix);
    buf.extend_from_slice(payload);
    encode_check(&buf, network)
}

/// Decodes text carrying `version`, returning the payload after the version byte.
pub fn decode_versioned(
    input: &str,
    version: Version,
    network: HashNetwork,
) -> Result<Vec<u8>, CoreError> {
    let raw = decode_check(input, network)?;
    if raw[0] != version.byte() {
        return Err(CoreError::BadVersion {
            expected: version.byte(),
            actual: raw[0],
        });
    }
    let payload = &raw[1..];
    if payload.len() != version.payload_len() {
        return Err(CoreError::BadBase58(format!(
            "{} payload must be {} bytes, got {}",
            version,
            version.payload_len(),
            payload.len()
        )));
    }
    Ok(payload.to_vec())
}

/// Decodes text carrying a multi-byte prefix and a payload of `payload_len` bytes.
pub fn decode_with_prefix(
    input: &str,
    prefix: &[u8],
    payload_len: usize,
    network: HashNetwork,
) -> Result<Vec<u8>, CoreError> {
    let raw = decode_check(input, network)?;
    if raw.len() != prefix.len() + payload_len || !raw.starts_with(prefix) {
        return Err(CoreError::BadVersion {
            expected: prefix.first().copied().unwrap_or_default(),
            actual: raw.first().copied().unwrap_or_default(),
        });
    }
    Ok(raw[prefix.len()..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_zero_account_encoding() {
        let payload = [0u8; 21];
        assert_eq!(encode_check(&payload, HashNetwork::Ripple), ACCOUNT_ZERO);
    }

    #[test]
    fn test_one_account_encoding() {
        let mut payload = [0u8; 21];
        payload[20] = 1;
        assert_eq!(encode_check(&payload, HashNetwork::Ripple), ACCOUNT_ONE);
    }

    #[test]
    fn test_aliases() {
        let zero = decode_check("0", HashNetwork::Ripple).unwrap();
        assert_eq!(zero, vec![0u8; 21]);
        let one = decode_check("1", HashNetwork::Ripple).unwrap();
        assert_eq!(one[20], 1);
    }

    #[test]
    fn test_bitcoin_alphabet_known_vector() {
        // "Hello World!" in the Bitcoin alphabet.
        assert_eq!(encode(b"Hello World!", HashNetwork::Bitcoin), "2NEpo7TZRRrLZSi2U");
        assert_eq!(
            decode("2NEpo7TZRRrLZSi2U", HashNetwork::Bitcoin).unwrap(),
            b"Hello World!".to_vec()
        );
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let input = [0u8, 0, 0, 1, 2, 3];
        let text = encode(&input, HashNetwork::Bitcoin);
        assert!(text.starts_with("111"));
        assert_eq!(decode(&text, HashNetwork::Bitcoin).unwrap(), input.to_vec());
    }

    #[test]
    fn test_random_round_trips() {
        let mut rng = rand::thread_rng();
        for len in 0..=64 {
            let mut bytes = vec![0u8; len];
            rng.fill(&mut bytes[..]);
            let text = encode_check(&bytes, HashNetwork::Ripple);
            assert_eq!(decode_check(&text, HashNetwork::Ripple).unwrap(), bytes);
        }
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(
            decode("0OIl", HashNetwork::Bitcoin),
            Err(CoreError::BadBase58(_))
        ));
        assert!(matches!(
            decode_check("rrr", HashNetwork::Ripple),
            Err(CoreError::BadBase58(_))
        ));

        // Swap two characters of a valid string to break the checksum.
        let mut chars: Vec<char> = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".chars().collect();
        chars.swap(5, 6);
        let broken: String = chars.into_iter().collect();
        assert!(matches!(
            decode_check(&broken, HashNetwork::Ripple),
            Err(CoreError::BadChecksum)
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let err = decode_versioned(
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            Version::FamilySeed,
            HashNetwork::Ripple,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::BadVersion {
                expected: 33,
                actual: 0
            }
        );
    }
}
