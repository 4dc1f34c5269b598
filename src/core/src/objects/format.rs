//! Declarative field templates for transactions, ledger entries and the
//! objects nested inside them.
//!
//! A template lists the fields an object may carry and which of them are
//! required. Decoding never consults templates; building and signing do.

use crate::codec::fields::{self, FieldId};
use crate::errors::CoreError;
use crate::st::{StObject, StValue};
use Requirement::{Optional, Required};

/// Whether a template field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must be present.
    Required,
    /// May be absent.
    Optional,
}

/// A field template.
#[derive(Debug)]
pub struct Format {
    /// The object kind, used in error messages
    pub name: &'static str,
    /// Fields shared by every object of this family
    pub common: &'static [(FieldId, Requirement)],
    /// Fields particular to this kind
    pub fields: &'static [(FieldId, Requirement)],
}

impl Format {
    /// The requirement for `field`, or `None` if the template does not allow it.
    pub fn requirement(&self, field: FieldId) -> Option<Requirement> {
        self.common
            .iter()
            .chain(self.fields.iter())
            .find(|(f, _)| *f == field)
            .map(|(_, r)| *r)
    }

    /// Checks that every required field is present and no foreign field is.
    ///
    /// Objects nested under a wrapper field with a template of its own
    /// (`Memo`, `Signer`, ...) are checked against that template too.
    pub fn validate(&self, object: &StObject) -> Result<(), CoreError> {
        for (field, requirement) in self.common.iter().chain(self.fields.iter()) {
            if *requirement == Required && !object.contains(*field) {
                return Err(CoreError::MissingField {
                    field: field.name(),
                    object: self.name.to_string(),
                });
            }
        }
        for (field, value) in object {
            if self.requirement(*field).is_none() {
                return Err(CoreError::UnexpectedFieldType(format!(
                    "{} is not a field of {}",
                    field, self.name
                )));
            }
            match value {
                StValue::Object(inner) => validate_inner(*field, inner)?,
                StValue::Array(items) => {
                    for (wrapper, inner) in items {
                        validate_inner(*wrapper, inner)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn validate_inner(wrapper: FieldId, object: &StObject) -> Result<(), CoreError> {
    match inner_format(wrapper) {
        Some(format) => format.validate(object),
        None => Ok(()),
    }
}

/// The template of an object nested under `wrapper`, if it has one.
///
/// Metadata field sets (`PreviousFields`, `FinalFields`, ...) are free-form.
pub fn inner_format(wrapper: FieldId) -> Option<&'static Format> {
    match wrapper {
        fields::MEMO => Some(&MEMO),
        fields::SIGNER => Some(&SIGNER),
        fields::SIGNER_ENTRY => Some(&SIGNER_ENTRY),
        fields::MAJORITY => Some(&MAJORITY),
        fields::VOTE_ENTRY => Some(&VOTE_ENTRY),
        fields::AUCTION_SLOT => Some(&AUCTION_SLOT),
        fields::AUTH_ACCOUNT => Some(&AUTH_ACCOUNT),
        _ => None,
    }
}

macro_rules! template {
    ($konst:ident, $name:literal, $common:expr, [$($field:ident: $req:ident),* $(,)?]) => {
        #[doc = concat!("Template of `", $name, "`.")]
        pub static $konst: Format = Format {
            name: $name,
            common: $common,
            fields: &[$((fields::$field, $req)),*],
        };
    };
}

/// Fields every transaction may carry.
pub static TRANSACTION_COMMON: &[(FieldId, Requirement)] = &[
    (fields::TRANSACTION_TYPE, Required),
    (fields::FLAGS, Optional),
    (fields::SOURCE_TAG, Optional),
    (fields::ACCOUNT, Required),
    (fields::SEQUENCE, Required),
    (fields::PREVIOUS_TXN_ID, Optional),
    (fields::LAST_LEDGER_SEQUENCE, Optional),
    (fields::ACCOUNT_TXN_ID, Optional),
    (fields::FEE, Required),
    (fields::MEMOS, Optional),
    (fields::SIGNING_PUB_KEY, Required),
    (fields::TICKET_SEQUENCE, Optional),
    (fields::TXN_SIGNATURE, Optional),
    (fields::SIGNERS, Optional),
    (fields::NETWORK_ID, Optional),
];

/// Fields every ledger entry may carry.
pub static LEDGER_ENTRY_COMMON: &[(FieldId, Requirement)] = &[
    (fields::LEDGER_ENTRY_TYPE, Required),
    (fields::FLAGS, Required),
    (fields::LEDGER_INDEX, Optional),
];

static NONE: &[(FieldId, Requirement)] = &[];

template!(PAYMENT, "Payment", TRANSACTION_COMMON, [
    DESTINATION: Required,
    AMOUNT: Required,
    SEND_MAX: Optional,
    PATHS: Optional,
    INVOICE_ID: Optional,
    DESTINATION_TAG: Optional,
    DELIVER_MIN: Optional,
]);
template!(ESCROW_CREATE, "EscrowCreate", TRANSACTION_COMMON, [
    DESTINATION: Required,
    AMOUNT: Required,
    CONDITION: Optional,
    CANCEL_AFTER: Optional,
    FINISH_AFTER: Optional,
    DESTINATION_TAG: Optional,
]);
template!(ESCROW_FINISH, "EscrowFinish", TRANSACTION_COMMON, [
    OWNER: Required,
    OFFER_SEQUENCE: Required,
    FULFILLMENT: Optional,
    CONDITION: Optional,
]);
template!(ACCOUNT_SET, "AccountSet", TRANSACTION_COMMON, [
    EMAIL_HASH: Optional,
    WALLET_LOCATOR: Optional,
    WALLET_SIZE: Optional,
    MESSAGE_KEY: Optional,
    DOMAIN: Optional,
    TRANSFER_RATE: Optional,
    SET_FLAG: Optional,
    CLEAR_FLAG: Optional,
    TICK_SIZE: Optional,
]);
template!(ESCROW_CANCEL, "EscrowCancel", TRANSACTION_COMMON, [
    OWNER: Required,
    OFFER_SEQUENCE: Required,
]);
template!(SET_REGULAR_KEY, "SetRegularKey", TRANSACTION_COMMON, [
    REGULAR_KEY: Optional,
]);
template!(OFFER_CREATE, "OfferCreate", TRANSACTION_COMMON, [
    TAKER_PAYS: Required,
    TAKER_GETS: Required,
    EXPIRATION: Optional,
    OFFER_SEQUENCE: Optional,
]);
template!(OFFER_CANCEL, "OfferCancel", TRANSACTION_COMMON, [
    OFFER_SEQUENCE: Required,
]);
template!(TICKET_CREATE, "TicketCreate", TRANSACTION_COMMON, [
    TICKET_COUNT: Required,
]);
template!(SIGNER_LIST_SET, "SignerListSet", TRANSACTION_COMMON, [
    SIGNER_QUORUM: Required,
    SIGNER_ENTRIES: Optional,
]);
template!(TRUST_SET, "TrustSet", TRANSACTION_COMMON, [
    LIMIT_AMOUNT: Optional,
    QUALITY_IN: Optional,
    QUALITY_OUT: Optional,
]);
template!(ACCOUNT_DELETE, "AccountDelete", TRANSACTION_COMMON, [
    DESTINATION: Required,
    DESTINATION_TAG: Optional,
]);
template!(AMM_CREATE, "AMMCreate", TRANSACTION_COMMON, [
    AMOUNT: Required,
    AMOUNT2: Required,
    TRADING_FEE: Required,
]);
template!(AMM_DEPOSIT, "AMMDeposit", TRANSACTION_COMMON, [
    ASSET: Required,
    ASSET2: Required,
    AMOUNT: Optional,
    AMOUNT2: Optional,
    E_PRICE: Optional,
    LP_TOKEN_OUT: Optional,
    TRADING_FEE: Optional,
]);
template!(AMM_WITHDRAW, "AMMWithdraw", TRANSACTION_COMMON, [
    ASSET: Required,
    ASSET2: Required,
    AMOUNT: Optional,
    AMOUNT2: Optional,
    E_PRICE: Optional,
    LP_TOKEN_IN: Optional,
]);
template!(AMM_VOTE, "AMMVote", TRANSACTION_COMMON, [
    ASSET: Required,
    ASSET2: Required,
    TRADING_FEE: Required,
]);
template!(AMM_BID, "AMMBid", TRANSACTION_COMMON, [
    ASSET: Required,
    ASSET2: Required,
    BID_MIN: Optional,
    BID_MAX: Optional,
    AUTH_ACCOUNTS: Optional,
]);
template!(AMM_DELETE, "AMMDelete", TRANSACTION_COMMON, [
    ASSET: Required,
    ASSET2: Required,
]);
template!(ENABLE_AMENDMENT, "EnableAmendment", TRANSACTION_COMMON, [
    LEDGER_SEQUENCE: Required,
    AMENDMENT: Required,
]);
template!(SET_FEE, "SetFee", TRANSACTION_COMMON, [
    LEDGER_SEQUENCE: Optional,
    BASE_FEE: Optional,
    REFERENCE_FEE_UNITS: Optional,
    RESERVE_BASE: Optional,
    RESERVE_INCREMENT: Optional,
    BASE_FEE_DROPS: Optional,
    RESERVE_BASE_DROPS: Optional,
    RESERVE_INCREMENT_DROPS: Optional,
]);

template!(ACCOUNT_ROOT, "AccountRoot", LEDGER_ENTRY_COMMON, [
    ACCOUNT: Required,
    SEQUENCE: Required,
    BALANCE: Required,
    OWNER_COUNT: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
    ACCOUNT_TXN_ID: Optional,
    REGULAR_KEY: Optional,
    EMAIL_HASH: Optional,
    WALLET_LOCATOR: Optional,
    WALLET_SIZE: Optional,
    MESSAGE_KEY: Optional,
    TRANSFER_RATE: Optional,
    DOMAIN: Optional,
    TICK_SIZE: Optional,
    TICKET_COUNT: Optional,
    AMM_ID: Optional,
]);
template!(DIRECTORY_NODE, "DirectoryNode", LEDGER_ENTRY_COMMON, [
    OWNER: Optional,
    TAKER_PAYS_CURRENCY: Optional,
    TAKER_PAYS_ISSUER: Optional,
    TAKER_GETS_CURRENCY: Optional,
    TAKER_GETS_ISSUER: Optional,
    EXCHANGE_RATE: Optional,
    INDEXES: Required,
    ROOT_INDEX: Required,
    INDEX_NEXT: Optional,
    INDEX_PREVIOUS: Optional,
    PREVIOUS_TXN_ID: Optional,
    PREVIOUS_TXN_LGR_SEQ: Optional,
]);
template!(AMENDMENTS, "Amendments", LEDGER_ENTRY_COMMON, [
    AMENDMENTS: Optional,
    MAJORITIES: Optional,
    PREVIOUS_TXN_ID: Optional,
    PREVIOUS_TXN_LGR_SEQ: Optional,
]);
template!(LEDGER_HASHES, "LedgerHashes", LEDGER_ENTRY_COMMON, [
    FIRST_LEDGER_SEQUENCE: Optional,
    LAST_LEDGER_SEQUENCE: Optional,
    HASHES: Required,
]);
template!(OFFER, "Offer", LEDGER_ENTRY_COMMON, [
    ACCOUNT: Required,
    SEQUENCE: Required,
    TAKER_PAYS: Required,
    TAKER_GETS: Required,
    BOOK_DIRECTORY: Required,
    BOOK_NODE: Required,
    OWNER_NODE: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
    EXPIRATION: Optional,
]);
template!(RIPPLE_STATE, "RippleState", LEDGER_ENTRY_COMMON, [
    BALANCE: Required,
    LOW_LIMIT: Required,
    HIGH_LIMIT: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
    LOW_NODE: Optional,
    LOW_QUALITY_IN: Optional,
    LOW_QUALITY_OUT: Optional,
    HIGH_NODE: Optional,
    HIGH_QUALITY_IN: Optional,
    HIGH_QUALITY_OUT: Optional,
]);
template!(FEE_SETTINGS, "FeeSettings", LEDGER_ENTRY_COMMON, [
    BASE_FEE: Optional,
    REFERENCE_FEE_UNITS: Optional,
    RESERVE_BASE: Optional,
    RESERVE_INCREMENT: Optional,
    BASE_FEE_DROPS: Optional,
    RESERVE_BASE_DROPS: Optional,
    RESERVE_INCREMENT_DROPS: Optional,
    PREVIOUS_TXN_ID: Optional,
    PREVIOUS_TXN_LGR_SEQ: Optional,
]);
template!(ESCROW, "Escrow", LEDGER_ENTRY_COMMON, [
    ACCOUNT: Required,
    DESTINATION: Required,
    AMOUNT: Required,
    CONDITION: Optional,
    CANCEL_AFTER: Optional,
    FINISH_AFTER: Optional,
    SOURCE_TAG: Optional,
    DESTINATION_TAG: Optional,
    OWNER_NODE: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
    DESTINATION_NODE: Optional,
]);
template!(SIGNER_LIST, "SignerList", LEDGER_ENTRY_COMMON, [
    OWNER_NODE: Required,
    SIGNER_QUORUM: Required,
    SIGNER_ENTRIES: Required,
    SIGNER_LIST_ID: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
]);
template!(TICKET, "Ticket", LEDGER_ENTRY_COMMON, [
    ACCOUNT: Required,
    OWNER_NODE: Required,
    TICKET_SEQUENCE: Required,
    PREVIOUS_TXN_ID: Required,
    PREVIOUS_TXN_LGR_SEQ: Required,
]);
template!(AMM, "AMM", LEDGER_ENTRY_COMMON, [
    ACCOUNT: Required,
    TRADING_FEE: Optional,
    VOTE_SLOTS: Optional,
    AUCTION_SLOT: Optional,
    LP_TOKEN_BALANCE: Required,
    ASSET: Required,
    ASSET2: Required,
    OWNER_NODE: Required,
]);

template!(MEMO, "Memo", NONE, [
    MEMO_TYPE: Optional,
    MEMO_DATA: Optional,
    MEMO_FORMAT: Optional,
]);
template!(SIGNER, "Signer", NONE, [
    ACCOUNT: Required,
    SIGNING_PUB_KEY: Required,
    TXN_SIGNATURE: Required,
]);
template!(SIGNER_ENTRY, "SignerEntry", NONE, [
    ACCOUNT: Required,
    SIGNER_WEIGHT: Required,
]);
template!(MAJORITY, "Majority", NONE, [
    AMENDMENT: Required,
    CLOSE_TIME: Required,
]);
template!(VOTE_ENTRY, "VoteEntry", NONE, [
    ACCOUNT: Required,
    TRADING_FEE: Required,
    VOTE_WEIGHT: Required,
]);
template!(AUCTION_SLOT, "AuctionSlot", NONE, [
    ACCOUNT: Required,
    EXPIRATION: Required,
    DISCOUNTED_FEE: Optional,
    PRICE: Required,
    AUTH_ACCOUNTS: Optional,
]);
template!(AUTH_ACCOUNT, "AuthAccount", NONE, [
    ACCOUNT: Required,
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;

    #[test]
    fn test_missing_required_field() {
        let object = StObject::new()
            .with(fields::ACCOUNT, StValue::AccountId(Account::ONE))
            .unwrap();
        let err = SIGNER_ENTRY.validate(&object).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingField {
                field: "SignerWeight",
                object: "SignerEntry".to_string()
            }
        );
    }

    #[test]
    fn test_foreign_field() {
        let object = StObject::new()
            .with(fields::ACCOUNT, StValue::AccountId(Account::ONE))
            .unwrap()
            .with(fields::SIGNER_WEIGHT, StValue::UInt16(1))
            .unwrap()
            .with(fields::SEQUENCE, StValue::UInt32(1))
            .unwrap();
        assert!(matches!(
            SIGNER_ENTRY.validate(&object),
            Err(CoreError::UnexpectedFieldType(_))
        ));
    }

    #[test]
    fn test_nested_objects_are_checked() {
        let bad_memo = StObject::new()
            .with(fields::ACCOUNT, StValue::AccountId(Account::ONE))
            .unwrap();
        let object = StObject::new()
            .with(fields::MEMOS, StValue::Array(vec![(fields::MEMO, bad_memo)]))
            .unwrap();
        let format = Format {
            name: "Test",
            common: NONE,
            fields: &[(fields::MEMOS, Optional)],
        };
        assert!(format.validate(&object).is_err());
        assert_eq!(format.requirement(fields::MEMOS), Some(Optional));
        assert_eq!(format.requirement(fields::FEE), None);
    }

    #[test]
    fn test_common_fields_apply() {
        assert_eq!(PAYMENT.requirement(fields::FEE), Some(Required));
        assert_eq!(PAYMENT.requirement(fields::DESTINATION), Some(Required));
        assert_eq!(ACCOUNT_ROOT.requirement(fields::LEDGER_INDEX), Some(Optional));
    }
}
