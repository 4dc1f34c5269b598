//! Signing and verification of transactions, validations and proposals.
//!
//! Signing is builder style: the input is left untouched and a signed copy
//! is returned. secp256k1 keys sign the SHA-512 half of the signing data,
//! Ed25519 keys sign the data itself; the public key prefix picks the
//! scheme on verification.

use crate::account::Account;
use crate::codec::{self, fields};
use crate::crypto::{Key, PublicKey};
use crate::errors::CoreError;
use crate::hashing::{HashPrefix, Signable};
use crate::objects::transaction::Transaction;
use crate::st::{StObject, StValue};
use tracing::{debug, warn};

/// Returns a copy of `object` carrying `key`'s public key and signature.
pub fn sign<T: Signable + Clone>(object: &T, key: &Key) -> Result<T, CoreError> {
    object.check_signable()?;
    let mut signed = object.clone();
    signed.set_signing_public_key(&key.public_key())?;
    let data = signed.signing_data()?;
    let signature = key.sign(&data)?;
    signed.set_signature(signature)?;
    Ok(signed)
}

/// Verifies an object's own signature, normalising high-S ECDSA signatures.
pub fn verify<T: Signable>(object: &T) -> Result<bool, CoreError> {
    verify_with(object, false)
}

/// Verifies an object's own signature.
///
/// A missing signature is `Ok(false)`; a missing or malformed public key is
/// an error.
pub fn verify_with<T: Signable>(object: &T, require_fully_canonical: bool) -> Result<bool, CoreError> {
    let public_key = match object.signing_public_key() {
        Some(bytes) if !bytes.is_empty() => PublicKey::from_slice(bytes)?,
        _ => {
            return Err(CoreError::BadSignatureFormat(
                "no signing public key".to_string(),
            ))
        }
    };
    let signature = match object.signature() {
        Some(signature) if !signature.is_empty() => signature,
        _ => {
            debug!("Object carries no signature");
            return Ok(false);
        }
    };
    let data = object.signing_data()?;
    public_key.verify(&data, signature, require_fully_canonical)
}

/// [`verify`], with a failed check turned into `VerificationFailed`.
pub fn verify_or_error<T: Signable>(object: &T) -> Result<(), CoreError> {
    if verify(object)? {
        Ok(())
    } else {
        Err(CoreError::VerificationFailed(
            "signature does not match content".to_string(),
        ))
    }
}

/// The data `account` signs when co-signing `tx`:
/// `SMT\0 ∥ signing fields ∥ account`.
///
/// A multi-signed transaction has an empty `SigningPubKey`, so the signing
/// fields are taken with it emptied.
pub fn multi_signing_data(tx: &Transaction, account: &Account) -> Result<Vec<u8>, CoreError> {
    let mut object = tx.object().clone();
    object.set(fields::SIGNING_PUB_KEY, StValue::Blob(Vec::new().into()))?;
    let mut data = HashPrefix::TxMultiSign.bytes().to_vec();
    data.extend_from_slice(&codec::encode_for_signing(&object)?);
    data.extend_from_slice(account.as_bytes());
    Ok(data)
}

/// Adds `account`'s signature, made with `key`, to `tx`'s `Signers`.
///
/// `Signers` stays sorted by account; a previous signature by the same
/// account is replaced. `SigningPubKey` is set empty.
pub fn multi_sign(tx: &Transaction, key: &Key, account: &Account) -> Result<Transaction, CoreError> {
    tx.validate()?;
    let data = multi_signing_data(tx, account)?;
    let signature = key.sign(&data)?;
    let signer = StObject::new()
        .with(fields::ACCOUNT, StValue::AccountId(*account))?
        .with(
            fields::SIGNING_PUB_KEY,
            StValue::Blob(key.public_key().as_bytes().into()),
        )?
        .with(fields::TXN_SIGNATURE, StValue::Blob(signature.into()))?;

    let mut signers: Vec<(codec::FieldId, StObject)> = tx
        .signers()
        .iter()
        .filter(|(_, s)| s.get_account(fields::ACCOUNT) != Some(*account))
        .cloned()
        .collect();
    signers.push((fields::SIGNER, signer));
    signers.sort_by_key(|(_, s)| s.get_account(fields::ACCOUNT).unwrap_or_default());

    let mut signed = tx.clone();
    signed.set(fields::SIGNING_PUB_KEY, StValue::Blob(Vec::new().into()))?;
    signed.set(fields::SIGNERS, StValue::Array(signers))?;
    Ok(signed)
}

/// Checks every signer of a multi-signed transaction, returning the
/// accounts whose signatures fail. An empty result means all verified.
pub fn check_multi_signature(
    tx: &Transaction,
    require_fully_canonical: bool,
) -> Result<Vec<Account>, CoreError> {
    if !tx.is_multi_signed() {
        return Err(CoreError::MissingField {
            field: fields::SIGNERS.name(),
            object: tx.transaction_type().name().to_string(),
        });
    }
    let mut failed = Vec::new();
    for (_, signer) in tx.signers() {
        let account = signer
            .get_account(fields::ACCOUNT)
            .ok_or_else(|| CoreError::MissingField {
                field: fields::ACCOUNT.name(),
                object: fields::SIGNER.name().to_string(),
            })?;
        let ok = match (
            signer.get_blob(fields::SIGNING_PUB_KEY),
            signer.get_blob(fields::TXN_SIGNATURE),
        ) {
            (Some(key), Some(signature)) => {
                let data = multi_signing_data(tx, &account)?;
                PublicKey::from_slice(key)
                    .and_then(|key| key.verify(&data, signature, require_fully_canonical))
                    .unwrap_or_else(|e| {
                        warn!("Signer {} has a malformed signature: {}", account, e);
                        false
                    })
            }
            _ => false,
        };
        if !ok {
            debug!("Signer {} failed verification", account);
            failed.push(account);
        }
    }
    Ok(failed)
}
