//! Hash functions, seeds and the two signature schemes.

pub mod ecdsa;
pub mod ed25519;
pub mod hash;
pub mod key;
pub mod seed;

pub use key::{Key, PublicKey};
pub use seed::{KeyType, Seed};
