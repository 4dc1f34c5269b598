//! Tests for seeds, key derivation and base58 identities.

use anyhow::Result;
use rand::Rng;
use ripple_core::{
    account::Account,
    base58::{self, HashNetwork, Version},
    crypto::{Key, KeyType, Seed},
    CoreError,
};

/// Tests the well-known genesis family.
#[test]
fn test_master_passphrase_family() -> Result<()> {
    crate::init_tracing();
    let seed = Seed::from_passphrase("masterpassphrase");
    assert_eq!(
        seed.to_base58(KeyType::Secp256k1),
        "snoPBrXtMeMyMHUVTgbuqAfg1SUTb"
    );

    let root = Key::root_from_seed(&seed, KeyType::Secp256k1)?;
    assert_eq!(
        root.public_key().to_base58(Version::NodePublic),
        "n94a1u4jAz288pZLtw6yFWVbi89YamiC6JBXPVUj5zmExe5fTVg9"
    );

    let account = Key::from_seed(&seed, KeyType::Secp256k1, 0)?;
    assert_eq!(
        account.account().to_base58(HashNetwork::Ripple),
        "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"
    );

    // The base58 seed leads back to the same account key
    let parsed = Key::from_seed_base58("snoPBrXtMeMyMHUVTgbuqAfg1SUTb")?;
    assert_eq!(parsed.account(), account.account());
    Ok(())
}

/// Tests that a single character decodes to the zero account.
#[test]
fn test_zero_account_alias() -> Result<()> {
    let payload = base58::decode_check("0", HashNetwork::Ripple)?;
    assert_eq!(payload, vec![0u8; 21]);

    let account = Account::from_base58("0", HashNetwork::Ripple)?;
    assert_eq!(account.as_bytes(), &[0u8; 20][..]);
    assert_eq!(account.to_string(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
    assert_eq!(account.to_string(), base58::ACCOUNT_ZERO);
    Ok(())
}

/// Tests base58 identity and checksums for random byte strings.
#[test]
fn test_base58_identity() -> Result<()> {
    let mut rng = rand::thread_rng();
    for len in 0..=64usize {
        let mut bytes = vec![0u8; len];
        rng.fill(bytes.as_mut_slice());
        // Leading zeros must survive as leading zero digits
        if len > 2 && rng.gen_bool(0.3) {
            bytes[0] = 0;
            bytes[1] = 0;
        }
        for network in [HashNetwork::Ripple, HashNetwork::Bitcoin] {
            let text = base58::encode(&bytes, network);
            assert_eq!(base58::decode(&text, network)?, bytes);

            if !bytes.is_empty() {
                let checked = base58::encode_check(&bytes, network);
                assert_eq!(base58::decode_check(&checked, network)?, bytes);
            }
        }
    }
    Ok(())
}

/// Tests that a corrupted character is caught by the checksum.
#[test]
fn test_checksum_catches_typos() {
    let text = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    let mut typo: Vec<char> = text.chars().collect();
    typo[5] = if typo[5] == 'a' { 'b' } else { 'a' };
    let typo: String = typo.into_iter().collect();
    assert_eq!(
        Account::from_base58(&typo, HashNetwork::Ripple),
        Err(CoreError::BadChecksum)
    );
}

/// Tests seeds of both schemes through their text form.
#[test]
fn test_random_seeds_round_trip() -> Result<()> {
    for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
        let seed = Seed::random();
        let text = seed.to_base58(key_type);
        let (parsed, parsed_type) = Seed::from_base58(&text)?;
        assert_eq!(parsed, seed);
        assert_eq!(parsed_type, key_type);

        let a = Key::from_seed(&seed, key_type, 0)?;
        let b = Key::from_seed_base58(&text)?;
        assert_eq!(a.public_key(), b.public_key());
    }
    Ok(())
}

/// Tests that the family produces distinct accounts per sequence.
#[test]
fn test_family_accounts_are_distinct() -> Result<()> {
    let seed = Seed::from_passphrase("masterpassphrase");
    let accounts: Vec<Account> = (0..4)
        .map(|seq| Key::from_seed(&seed, KeyType::Secp256k1, seq).map(|k| k.account()))
        .collect::<Result<_, _>>()?;
    for (i, a) in accounts.iter().enumerate() {
        for b in &accounts[i + 1..] {
            assert_ne!(a, b);
        }
    }
    Ok(())
}
