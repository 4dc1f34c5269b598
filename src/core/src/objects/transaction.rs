//! Transactions.

use crate::account::Account;
use crate::amount::Amount;
use crate::codec::fields::{self, FieldId};
use crate::codec::{self, json};
use crate::crypto::PublicKey;
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable, Signable};
use crate::objects::format::{self, Format};
use crate::st::{StObject, StValue};
use std::fmt;
use tracing::debug;

/// The supported transaction types and their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionType {
    Payment,
    EscrowCreate,
    EscrowFinish,
    AccountSet,
    EscrowCancel,
    SetRegularKey,
    OfferCreate,
    OfferCancel,
    TicketCreate,
    SignerListSet,
    TrustSet,
    AccountDelete,
    AmmCreate,
    AmmDeposit,
    AmmWithdraw,
    AmmVote,
    AmmBid,
    AmmDelete,
    EnableAmendment,
    SetFee,
}

impl TransactionType {
    /// Every supported type, in code order.
    pub const ALL: [TransactionType; 20] = [
        TransactionType::Payment,
        TransactionType::EscrowCreate,
        TransactionType::EscrowFinish,
        TransactionType::AccountSet,
        TransactionType::EscrowCancel,
        TransactionType::SetRegularKey,
        TransactionType::OfferCreate,
        TransactionType::OfferCancel,
        TransactionType::TicketCreate,
        TransactionType::SignerListSet,
        TransactionType::TrustSet,
        TransactionType::AccountDelete,
        TransactionType::AmmCreate,
        TransactionType::AmmDeposit,
        TransactionType::AmmWithdraw,
        TransactionType::AmmVote,
        TransactionType::AmmBid,
        TransactionType::AmmDelete,
        TransactionType::EnableAmendment,
        TransactionType::SetFee,
    ];

    /// The `TransactionType` field value.
    pub fn code(&self) -> u16 {
        match self {
            TransactionType::Payment => 0,
            TransactionType::EscrowCreate => 1,
            TransactionType::EscrowFinish => 2,
            TransactionType::AccountSet => 3,
            TransactionType::EscrowCancel => 4,
            TransactionType::SetRegularKey => 5,
            TransactionType::OfferCreate => 7,
            TransactionType::OfferCancel => 8,
            TransactionType::TicketCreate => 10,
            TransactionType::SignerListSet => 12,
            TransactionType::TrustSet => 20,
            TransactionType::AccountDelete => 21,
            TransactionType::AmmCreate => 35,
            TransactionType::AmmDeposit => 36,
            TransactionType::AmmWithdraw => 37,
            TransactionType::AmmVote => 38,
            TransactionType::AmmBid => 39,
            TransactionType::AmmDelete => 40,
            TransactionType::EnableAmendment => 100,
            TransactionType::SetFee => 101,
        }
    }

    /// Resolves a wire code.
    pub fn from_code(code: u16) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(CoreError::UnsupportedTransactionType(code))
    }

    /// The template describing this type's fields.
    pub fn format(&self) -> &'static Format {
        match self {
            TransactionType::Payment => &format::PAYMENT,
            TransactionType::EscrowCreate => &format::ESCROW_CREATE,
            TransactionType::EscrowFinish => &format::ESCROW_FINISH,
            TransactionType::AccountSet => &format::ACCOUNT_SET,
            TransactionType::EscrowCancel => &format::ESCROW_CANCEL,
            TransactionType::SetRegularKey => &format::SET_REGULAR_KEY,
            TransactionType::OfferCreate => &format::OFFER_CREATE,
            TransactionType::OfferCancel => &format::OFFER_CANCEL,
            TransactionType::TicketCreate => &format::TICKET_CREATE,
            TransactionType::SignerListSet => &format::SIGNER_LIST_SET,
            TransactionType::TrustSet => &format::TRUST_SET,
            TransactionType::AccountDelete => &format::ACCOUNT_DELETE,
            TransactionType::AmmCreate => &format::AMM_CREATE,
            TransactionType::AmmDeposit => &format::AMM_DEPOSIT,
            TransactionType::AmmWithdraw => &format::AMM_WITHDRAW,
            TransactionType::AmmVote => &format::AMM_VOTE,
            TransactionType::AmmBid => &format::AMM_BID,
            TransactionType::AmmDelete => &format::AMM_DELETE,
            TransactionType::EnableAmendment => &format::ENABLE_AMENDMENT,
            TransactionType::SetFee => &format::SET_FEE,
        }
    }

    /// The canonical name, e.g. `"AMMDeposit"`.
    pub fn name(&self) -> &'static str {
        self.format().name
    }

    /// Resolves a canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// True for types only the network itself injects.
    pub fn is_pseudo(&self) -> bool {
        matches!(self, TransactionType::EnableAmendment | TransactionType::SetFee)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A transaction: an object whose first field is `TransactionType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    tx_type: TransactionType,
    object: StObject,
}

impl Transaction {
    /// Starts a transaction with the fields every type requires.
    ///
    /// `SigningPubKey` starts empty; signing fills it in.
    pub fn new(
        tx_type: TransactionType,
        account: Account,
        sequence: u32,
        fee: Amount,
    ) -> Result<Self, CoreError> {
        let object = StObject::new()
            .with(fields::TRANSACTION_TYPE, StValue::UInt16(tx_type.code()))?
            .with(fields::ACCOUNT, StValue::AccountId(account))?
            .with(fields::SEQUENCE, StValue::UInt32(sequence))?
            .with(fields::FEE, StValue::Amount(fee))?
            .with(fields::SIGNING_PUB_KEY, StValue::Blob(Vec::new().into()))?;
        Ok(Self { tx_type, object })
    }

    /// Starts a pseudo-transaction: zero account, sequence and fee, no key.
    pub fn pseudo(tx_type: TransactionType) -> Result<Self, CoreError> {
        if !tx_type.is_pseudo() {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} is not a pseudo-transaction",
                tx_type
            )));
        }
        Self::new(tx_type, Account::ZERO, 0, Amount::from_drops(0)?)
    }

    /// Wraps an object, resolving its `TransactionType`.
    pub fn from_object(object: StObject) -> Result<Self, CoreError> {
        let code = object.get_u16(fields::TRANSACTION_TYPE).ok_or_else(|| {
            CoreError::MissingField {
                field: fields::TRANSACTION_TYPE.name(),
                object: "Transaction".to_string(),
            }
        })?;
        let tx_type = TransactionType::from_code(code)?;
        Ok(Self { tx_type, object })
    }

    /// Decodes canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Self::from_object(codec::decode(bytes)?)
    }

    /// Canonical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode(&self.object)
    }

    /// Parses the JSON form.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        Self::from_object(json::from_json(value)?)
    }

    /// The JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        json::to_json(&self.object)
    }

    /// Sets a field. `TransactionType` cannot be changed this way.
    pub fn set(&mut self, field: FieldId, value: StValue) -> Result<(), CoreError> {
        if field == fields::TRANSACTION_TYPE {
            return Err(CoreError::UnexpectedFieldType(
                "TransactionType is fixed at construction".to_string(),
            ));
        }
        self.object.set(field, value)
    }

    /// Builder form of [`Transaction::set`].
    pub fn with(mut self, field: FieldId, value: StValue) -> Result<Self, CoreError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Removes a field.
    pub fn remove(&mut self, field: FieldId) -> Option<StValue> {
        if field == fields::TRANSACTION_TYPE {
            return None;
        }
        self.object.remove(field)
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn object(&self) -> &StObject {
        &self.object
    }

    pub fn into_object(self) -> StObject {
        self.object
    }

    /// The sending account, zero if unset.
    pub fn account(&self) -> Account {
        self.object.get_account(fields::ACCOUNT).unwrap_or_default()
    }

    pub fn sequence(&self) -> u32 {
        self.object.get_u32(fields::SEQUENCE).unwrap_or(0)
    }

    pub fn flags(&self) -> u32 {
        self.object.get_u32(fields::FLAGS).unwrap_or(0)
    }

    pub fn fee(&self) -> Option<Amount> {
        self.object.get_amount(fields::FEE)
    }

    /// The `Signers` array; empty unless multi-signed.
    pub fn signers(&self) -> &[(FieldId, StObject)] {
        self.object.get_array(fields::SIGNERS).unwrap_or(&[])
    }

    /// True when the transaction carries a `Signers` array.
    pub fn is_multi_signed(&self) -> bool {
        self.object.contains(fields::SIGNERS)
    }

    /// The transaction id.
    pub fn id(&self) -> Result<Hash256, CoreError> {
        self.hash()
    }

    /// Checks the fields against this type's template.
    ///
    /// Pseudo-transactions must also come from the zero account and carry no
    /// signature.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.tx_type.format().validate(&self.object)?;
        if self.tx_type.is_pseudo() {
            if !self.account().is_zero() {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "{} must come from the zero account",
                    self.tx_type
                )));
            }
            if self.object.contains(fields::TXN_SIGNATURE) {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "{} cannot be signed",
                    self.tx_type
                )));
            }
        }
        Ok(())
    }
}

impl Hashable for Transaction {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::TransactionId
    }

    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        self.to_bytes()
    }
}

impl Signable for Transaction {
    fn signing_prefix(&self) -> HashPrefix {
        HashPrefix::TxSign
    }

    fn signing_body(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode_for_signing(&self.object)
    }

    fn signing_public_key(&self) -> Option<&[u8]> {
        self.object.get_blob(fields::SIGNING_PUB_KEY)
    }

    fn signature(&self) -> Option<&[u8]> {
        self.object.get_blob(fields::TXN_SIGNATURE)
    }

    fn set_signing_public_key(&mut self, key: &PublicKey) -> Result<(), CoreError> {
        self.object.set(
            fields::SIGNING_PUB_KEY,
            StValue::Blob(key.as_bytes().into()),
        )
    }

    fn set_signature(&mut self, signature: Vec<u8>) -> Result<(), CoreError> {
        self.object
            .set(fields::TXN_SIGNATURE, StValue::Blob(signature.into()))
    }

    fn check_signable(&self) -> Result<(), CoreError> {
        if self.tx_type.is_pseudo() {
            debug!("Refusing to sign pseudo-transaction {}", self.tx_type);
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} cannot be signed",
                self.tx_type
            )));
        }
        self.validate()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} #{}", self.tx_type, self.account(), self.sequence())
    }
}
