//! Tests for signing and verification across the signable objects.

use anyhow::Result;
use ripple_core::{
    account::Account,
    amount::Amount,
    codec::fields,
    config::SigningConfig,
    crypto::{
        ecdsa::{self, EcdsaKey},
        hash::sha512_half,
        Key, KeyType, Seed,
    },
    hash::Hash256,
    hashing::Signable,
    objects::{proposal::Proposal, Transaction, TransactionType, Validation},
    signing,
    st::StValue,
    CoreError,
};

fn master_seed() -> Seed {
    Seed::from_passphrase("masterpassphrase")
}

fn payment(key: &Key) -> Result<Transaction> {
    Ok(Transaction::new(
        TransactionType::Payment,
        key.account(),
        1,
        Amount::from_drops(10)?,
    )?
    .with(fields::DESTINATION, StValue::AccountId(Account([7; 20])))?
    .with(fields::AMOUNT, StValue::Amount(Amount::from_drops(1_000_000)?))?)
}

/// Tests ECDSA over a message digest with family account keys.
#[test]
fn test_sign_and_verify_digest() -> Result<()> {
    crate::init_tracing();
    let seed = master_seed();
    let first = EcdsaKey::from_seed(&seed, 0)?;
    let second = EcdsaKey::from_seed(&seed, 1)?;

    let digest = sha512_half(b"Hello, nurse!");
    let signature = first.sign_hash(&digest)?;
    assert!(ecdsa::verify_hash(&first.public_bytes(), &digest, &signature, false)?);
    assert!(!ecdsa::verify_hash(&second.public_bytes(), &digest, &signature, false)?);
    Ok(())
}

/// Tests that Ed25519 signatures of a transaction are reproducible.
#[test]
fn test_ed25519_reproducibility() -> Result<()> {
    let key = Key::from_seed(&master_seed(), KeyType::Ed25519, 0)?;
    let tx = payment(&key)?;
    let a = signing::sign(&tx, &key)?;
    let b = signing::sign(&tx, &key)?;
    assert_eq!(a.signature(), b.signature());
    assert_eq!(a.id()?, b.id()?);
    assert!(signing::verify(&a)?);
    Ok(())
}

/// Tests that every signed field is covered by the signature.
#[test]
fn test_verification_completeness() -> Result<()> {
    for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
        let key = Key::from_seed(&master_seed(), key_type, 0)?;
        let signed = signing::sign(&payment(&key)?, &key)?;
        assert!(signing::verify(&signed)?);
        signing::verify_or_error(&signed)?;

        let tampered = signed
            .clone()
            .with(fields::AMOUNT, StValue::Amount(Amount::from_drops(1_000_001)?))?;
        assert!(!signing::verify(&tampered)?);
        assert!(matches!(
            signing::verify_or_error(&tampered),
            Err(CoreError::VerificationFailed(_))
        ));

        let retagged = signed
            .clone()
            .with(fields::DESTINATION_TAG, StValue::UInt32(1))?;
        assert!(!signing::verify(&retagged)?);
    }
    Ok(())
}

/// Tests that signing returns a copy and leaves the input unsigned.
#[test]
fn test_signing_is_a_builder() -> Result<()> {
    let key = Key::from_seed(&master_seed(), KeyType::Secp256k1, 0)?;
    let tx = payment(&key)?;
    let signed = signing::sign(&tx, &key)?;
    assert_eq!(tx.signature(), None);
    assert_eq!(tx.signing_public_key(), Some(&[][..]));
    assert_eq!(
        signed.signing_public_key(),
        Some(key.public_key().as_bytes())
    );
    assert_ne!(tx.id()?, signed.id()?);
    Ok(())
}

/// Tests pseudo-transactions cannot be signed.
#[test]
fn test_pseudo_transactions_are_unsigned() -> Result<()> {
    let key = Key::from_seed(&master_seed(), KeyType::Secp256k1, 0)?;
    let tx = Transaction::pseudo(TransactionType::SetFee)?;
    assert!(signing::sign(&tx, &key).is_err());
    Ok(())
}

/// Tests validations and proposals through the same signing path.
#[test]
fn test_validations_and_proposals() -> Result<()> {
    let node = Key::root_from_seed(&master_seed(), KeyType::Secp256k1)?;

    let validation = Validation::new(12, Hash256([1; 32]), 700_000_000, 1)?;
    let signed = signing::sign(&validation, &node)?;
    signed.validate()?;
    assert!(signing::verify(&signed)?);
    let decoded = Validation::from_bytes(&signed.to_bytes()?)?;
    assert!(signing::verify(&decoded)?);

    let proposal = Proposal::new(0, 700_000_010, Hash256([2; 32]), Hash256([3; 32]));
    let signed = signing::sign(&proposal, &node)?;
    assert!(signing::verify(&signed)?);
    let decoded = Proposal::from_bytes(&signed.to_bytes()?)?;
    assert_eq!(decoded, signed);

    let mut moved = decoded;
    moved.close_time += 1;
    assert!(!signing::verify(&moved)?);
    Ok(())
}

/// Tests verification under a strict signing configuration.
#[test]
fn test_configured_verification() -> Result<()> {
    let key = Key::from_seed(&master_seed(), KeyType::Secp256k1, 0)?;
    let signed = signing::sign(&payment(&key)?, &key)?;
    // Fresh signatures are always low-S, so strict mode accepts them.
    let strict = SigningConfig {
        require_fully_canonical: true,
    };
    assert!(strict.verify(&signed)?);
    assert!(SigningConfig::default().verify(&signed)?);
    Ok(())
}

/// Tests a transaction co-signed by two accounts.
#[test]
fn test_multi_signing() -> Result<()> {
    let alice = Key::from_seed(&Seed::from_passphrase("alice"), KeyType::Secp256k1, 0)?;
    let bob = Key::from_seed(&Seed::from_passphrase("bob"), KeyType::Ed25519, 0)?;
    let owner = Key::from_seed(&master_seed(), KeyType::Secp256k1, 0)?;
    let tx = payment(&owner)?;

    let signed = signing::multi_sign(&tx, &alice, &alice.account())?;
    let signed = signing::multi_sign(&signed, &bob, &bob.account())?;
    assert!(signed.is_multi_signed());
    assert!(signing::check_multi_signature(&signed, false)?.is_empty());

    let tampered = signed.with(fields::SEQUENCE, StValue::UInt32(2))?;
    assert_eq!(signing::check_multi_signature(&tampered, false)?.len(), 2);
    Ok(())
}
