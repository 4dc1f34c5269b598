//! The field dictionary.
//!
//! Every serialized field is identified by `(type code, field code)`. The
//! table below fixes the names, and with them the wire contract; objects are
//! emitted in ascending `(type << 16) | field` order.

use crate::codec::types::TypeCode;
use crate::errors::CoreError;
use lazy_static::lazy_static;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Identity of a serialized field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    /// The value type
    pub type_code: TypeCode,
    /// The field within that type
    pub field_code: u8,
}

/// A dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// The canonical name, as used in JSON
    pub name: &'static str,
    /// The wire identity
    pub id: FieldId,
    /// False for fields left out of signing bodies
    pub signing: bool,
}

macro_rules! field_table {
    (@signing) => { true };
    (@signing not_signing) => { false };
    ($($konst:ident: $name:literal, $type_code:ident, $code:literal $(, $flag:ident)?;)*) => {
        $(
            #[doc = concat!("`", $name, "`")]
            pub const $konst: FieldId = FieldId::new(TypeCode::$type_code, $code);
        )*

        static FIELDS: &[FieldInfo] = &[
            $(FieldInfo {
                name: $name,
                id: $konst,
                signing: field_table!(@signing $($flag)?),
            },)*
        ];
    };
}

field_table! {
    LEDGER_ENTRY_TYPE: "LedgerEntryType", UInt16, 1;
    TRANSACTION_TYPE: "TransactionType", UInt16, 2;
    SIGNER_WEIGHT: "SignerWeight", UInt16, 3;
    TRANSFER_FEE: "TransferFee", UInt16, 4;
    TRADING_FEE: "TradingFee", UInt16, 5;
    DISCOUNTED_FEE: "DiscountedFee", UInt16, 6;
    VERSION: "Version", UInt16, 16;

    NETWORK_ID: "NetworkID", UInt32, 1;
    FLAGS: "Flags", UInt32, 2;
    SOURCE_TAG: "SourceTag", UInt32, 3;
    SEQUENCE: "Sequence", UInt32, 4;
    PREVIOUS_TXN_LGR_SEQ: "PreviousTxnLgrSeq", UInt32, 5;
    LEDGER_SEQUENCE: "LedgerSequence", UInt32, 6;
    CLOSE_TIME: "CloseTime", UInt32, 7;
    PARENT_CLOSE_TIME: "ParentCloseTime", UInt32, 8;
    SIGNING_TIME: "SigningTime", UInt32, 9;
    EXPIRATION: "Expiration", UInt32, 10;
    TRANSFER_RATE: "TransferRate", UInt32, 11;
    WALLET_SIZE: "WalletSize", UInt32, 12;
    OWNER_COUNT: "OwnerCount", UInt32, 13;
    DESTINATION_TAG: "DestinationTag", UInt32, 14;
    HIGH_QUALITY_IN: "HighQualityIn", UInt32, 16;
    HIGH_QUALITY_OUT: "HighQualityOut", UInt32, 17;
    LOW_QUALITY_IN: "LowQualityIn", UInt32, 18;
    LOW_QUALITY_OUT: "LowQualityOut", UInt32, 19;
    QUALITY_IN: "QualityIn", UInt32, 20;
    QUALITY_OUT: "QualityOut", UInt32, 21;
    LOAD_FEE: "LoadFee", UInt32, 24;
    OFFER_SEQUENCE: "OfferSequence", UInt32, 25;
    FIRST_LEDGER_SEQUENCE: "FirstLedgerSequence", UInt32, 26;
    LAST_LEDGER_SEQUENCE: "LastLedgerSequence", UInt32, 27;
    TRANSACTION_INDEX: "TransactionIndex", UInt32, 28;
    REFERENCE_FEE_UNITS: "ReferenceFeeUnits", UInt32, 30;
    RESERVE_BASE: "ReserveBase", UInt32, 31;
    RESERVE_INCREMENT: "ReserveIncrement", UInt32, 32;
    SET_FLAG: "SetFlag", UInt32, 33;
    CLEAR_FLAG: "ClearFlag", UInt32, 34;
    SIGNER_QUORUM: "SignerQuorum", UInt32, 35;
    CANCEL_AFTER: "CancelAfter", UInt32, 36;
    FINISH_AFTER: "FinishAfter", UInt32, 37;
    SIGNER_LIST_ID: "SignerListID", UInt32, 38;
    TICKET_COUNT: "TicketCount", UInt32, 40;
    TICKET_SEQUENCE: "TicketSequence", UInt32, 41;
    VOTE_WEIGHT: "VoteWeight", UInt32, 48;

    INDEX_NEXT: "IndexNext", UInt64, 1;
    INDEX_PREVIOUS: "IndexPrevious", UInt64, 2;
    BOOK_NODE: "BookNode", UInt64, 3;
    OWNER_NODE: "OwnerNode", UInt64, 4;
    BASE_FEE: "BaseFee", UInt64, 5;
    EXCHANGE_RATE: "ExchangeRate", UInt64, 6;
    LOW_NODE: "LowNode", UInt64, 7;
    HIGH_NODE: "HighNode", UInt64, 8;
    DESTINATION_NODE: "DestinationNode", UInt64, 9;
    COOKIE: "Cookie", UInt64, 10;

    EMAIL_HASH: "EmailHash", Hash128, 1;

    TAKER_PAYS_CURRENCY: "TakerPaysCurrency", Hash160, 1;
    TAKER_PAYS_ISSUER: "TakerPaysIssuer", Hash160, 2;
    TAKER_GETS_CURRENCY: "TakerGetsCurrency", Hash160, 3;
    TAKER_GETS_ISSUER: "TakerGetsIssuer", Hash160, 4;

    LEDGER_HASH: "LedgerHash", Hash256, 1;
    PARENT_HASH: "ParentHash", Hash256, 2;
    TRANSACTION_HASH: "TransactionHash", Hash256, 3;
    ACCOUNT_HASH: "AccountHash", Hash256, 4;
    PREVIOUS_TXN_ID: "PreviousTxnID", Hash256, 5;
    LEDGER_INDEX: "LedgerIndex", Hash256, 6;
    WALLET_LOCATOR: "WalletLocator", Hash256, 7;
    ROOT_INDEX: "RootIndex", Hash256, 8;
    ACCOUNT_TXN_ID: "AccountTxnID", Hash256, 9;
    AMM_ID: "AMMID", Hash256, 14;
    BOOK_DIRECTORY: "BookDirectory", Hash256, 16;
    INVOICE_ID: "InvoiceID", Hash256, 17;
    AMENDMENT: "Amendment", Hash256, 19;
    DIGEST: "Digest", Hash256, 21;
    CONSENSUS_HASH: "ConsensusHash", Hash256, 23;
    VALIDATED_HASH: "ValidatedHash", Hash256, 25;

    AMOUNT: "Amount", Amount, 1;
    BALANCE: "Balance", Amount, 2;
    LIMIT_AMOUNT: "LimitAmount", Amount, 3;
    TAKER_PAYS: "TakerPays", Amount, 4;
    TAKER_GETS: "TakerGets", Amount, 5;
    LOW_LIMIT: "LowLimit", Amount, 6;
    HIGH_LIMIT: "HighLimit", Amount, 7;
    FEE: "Fee", Amount, 8;
    SEND_MAX: "SendMax", Amount, 9;
    DELIVER_MIN: "DeliverMin", Amount, 10;
    AMOUNT2: "Amount2", Amount, 11;
    BID_MIN: "BidMin", Amount, 12;
    BID_MAX: "BidMax", Amount, 13;
    DELIVERED_AMOUNT: "DeliveredAmount", Amount, 18;
    BASE_FEE_DROPS: "BaseFeeDrops", Amount, 22;
    RESERVE_BASE_DROPS: "ReserveBaseDrops", Amount, 23;
    RESERVE_INCREMENT_DROPS: "ReserveIncrementDrops", Amount, 24;
    LP_TOKEN_OUT: "LPTokenOut", Amount, 25;
    LP_TOKEN_IN: "LPTokenIn", Amount, 26;
    E_PRICE: "EPrice", Amount, 27;
    PRICE: "Price", Amount, 28;
    LP_TOKEN_BALANCE: "LPTokenBalance", Amount, 31;

    PUBLIC_KEY: "PublicKey", Blob, 1;
    MESSAGE_KEY: "MessageKey", Blob, 2;
    SIGNING_PUB_KEY: "SigningPubKey", Blob, 3;
    TXN_SIGNATURE: "TxnSignature", Blob, 4, not_signing;
    SIGNATURE: "Signature", Blob, 6, not_signing;
    DOMAIN: "Domain", Blob, 7;
    MEMO_TYPE: "MemoType", Blob, 12;
    MEMO_DATA: "MemoData", Blob, 13;
    MEMO_FORMAT: "MemoFormat", Blob, 14;
    FULFILLMENT: "Fulfillment", Blob, 16;
    CONDITION: "Condition", Blob, 17;
    MASTER_SIGNATURE: "MasterSignature", Blob, 18, not_signing;

    ACCOUNT: "Account", AccountId, 1;
    OWNER: "Owner", AccountId, 2;
    DESTINATION: "Destination", AccountId, 3;
    ISSUER: "Issuer", AccountId, 4;
    AUTHORIZE: "Authorize", AccountId, 5;
    UNAUTHORIZE: "Unauthorize", AccountId, 6;
    REGULAR_KEY: "RegularKey", AccountId, 8;

    END_OF_OBJECT: "EndOfObject", Object, 1;
    TRANSACTION_META_DATA: "TransactionMetaData", Object, 2;
    CREATED_NODE: "CreatedNode", Object, 3;
    DELETED_NODE: "DeletedNode", Object, 4;
    MODIFIED_NODE: "ModifiedNode", Object, 5;
    PREVIOUS_FIELDS: "PreviousFields", Object, 6;
    FINAL_FIELDS: "FinalFields", Object, 7;
    NEW_FIELDS: "NewFields", Object, 8;
    MEMO: "Memo", Object, 10;
    SIGNER_ENTRY: "SignerEntry", Object, 11;
    SIGNER: "Signer", Object, 16;
    MAJORITY: "Majority", Object, 18;
    VOTE_ENTRY: "VoteEntry", Object, 25;
    AUCTION_SLOT: "AuctionSlot", Object, 26;
    AUTH_ACCOUNT: "AuthAccount", Object, 27;

    END_OF_ARRAY: "EndOfArray", Array, 1;
    SIGNERS: "Signers", Array, 3, not_signing;
    SIGNER_ENTRIES: "SignerEntries", Array, 4;
    AFFECTED_NODES: "AffectedNodes", Array, 8;
    MEMOS: "Memos", Array, 9;
    VOTE_SLOTS: "VoteSlots", Array, 12;
    MAJORITIES: "Majorities", Array, 16;
    AUTH_ACCOUNTS: "AuthAccounts", Array, 25;

    CLOSE_RESOLUTION: "CloseResolution", UInt8, 1;
    METHOD: "Method", UInt8, 2;
    TRANSACTION_RESULT: "TransactionResult", UInt8, 3;
    TICK_SIZE: "TickSize", UInt8, 16;
    UNL_MODIFY_DISABLING: "UNLModifyDisabling", UInt8, 17;

    PATHS: "Paths", PathSet, 1;

    INDEXES: "Indexes", Vector256, 1;
    HASHES: "Hashes", Vector256, 2;
    AMENDMENTS: "Amendments", Vector256, 3;

    ASSET: "Asset", Issue, 3;
    ASSET2: "Asset2", Issue, 4;
}

lazy_static! {
    static ref BY_ID: HashMap<FieldId, &'static FieldInfo> =
        FIELDS.iter().map(|info| (info.id, info)).collect();
    static ref BY_NAME: HashMap<&'static str, &'static FieldInfo> =
        FIELDS.iter().map(|info| (info.name, info)).collect();
}

impl FieldId {
    /// Builds an identity without checking the dictionary.
    pub const fn new(type_code: TypeCode, field_code: u8) -> Self {
        Self {
            type_code,
            field_code,
        }
    }

    /// Resolves wire codes against the dictionary.
    pub fn lookup(type_code: u8, field_code: u8) -> Result<Self, CoreError> {
        let id = FieldId::new(TypeCode::from_u8(type_code)?, field_code);
        if BY_ID.contains_key(&id) {
            Ok(id)
        } else {
            Err(CoreError::UnknownFieldCode {
                type_code,
                field_code,
            })
        }
    }

    /// Resolves a field name.
    pub fn by_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).map(|info| info.id)
    }

    /// The dictionary entry, if any.
    pub fn info(&self) -> Option<&'static FieldInfo> {
        BY_ID.get(self).copied()
    }

    /// The canonical name, or `"Unknown"`.
    pub fn name(&self) -> &'static str {
        self.info().map(|info| info.name).unwrap_or("Unknown")
    }

    /// Sort key: `(type << 16) | field`.
    pub fn priority(&self) -> u32 {
        (u32::from(self.type_code.code()) << 16) | u32::from(self.field_code)
    }

    /// False for fields left out of signing bodies.
    pub fn is_signing(&self) -> bool {
        self.info().map(|info| info.signing).unwrap_or(true)
    }

    /// Appends the 1 to 3 byte field tag.
    pub fn write_tag(&self, out: &mut Vec<u8>) {
        let type_code = self.type_code.code();
        let field_code = self.field_code;
        match (type_code < 16, field_code < 16) {
            (true, true) => out.push(type_code << 4 | field_code),
            (true, false) => out.extend_from_slice(&[type_code << 4, field_code]),
            (false, true) => out.extend_from_slice(&[field_code, type_code]),
            (false, false) => out.extend_from_slice(&[0, type_code, field_code]),
        }
    }
}

impl PartialOrd for FieldId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.name(),
            self.type_code.code(),
            self.field_code
        )
    }
}

/// Every dictionary entry, in table order.
pub fn all_fields() -> &'static [FieldInfo] {
    FIELDS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(field: FieldId) -> Vec<u8> {
        let mut out = Vec::new();
        field.write_tag(&mut out);
        out
    }

    #[test]
    fn test_tag_forms() {
        assert_eq!(tag(TRANSACTION_TYPE), vec![0x12]);
        assert_eq!(tag(END_OF_OBJECT), vec![0xE1]);
        assert_eq!(tag(END_OF_ARRAY), vec![0xF1]);
        assert_eq!(tag(LAST_LEDGER_SEQUENCE), vec![0x20, 27]);
        assert_eq!(tag(TRANSACTION_RESULT), vec![0x03, 16]);
        assert_eq!(tag(TICK_SIZE), vec![0x00, 16, 16]);
    }

    #[test]
    fn test_names_and_codes_are_unique() {
        assert_eq!(BY_ID.len(), FIELDS.len());
        assert_eq!(BY_NAME.len(), FIELDS.len());
        for info in all_fields() {
            assert_eq!(FieldId::by_name(info.name), Some(info.id));
            assert_eq!(
                FieldId::lookup(info.id.type_code.code(), info.id.field_code).unwrap(),
                info.id
            );
        }
    }

    #[test]
    fn test_signing_flags() {
        let not_signing: Vec<&str> = all_fields()
            .iter()
            .filter(|info| !info.signing)
            .map(|info| info.name)
            .collect();
        assert_eq!(
            not_signing,
            vec!["TxnSignature", "Signature", "MasterSignature", "Signers"]
        );
        assert!(SIGNING_PUB_KEY.is_signing());
    }

    #[test]
    fn test_priority_order() {
        assert!(TRANSACTION_TYPE < FLAGS);
        assert!(FLAGS < SEQUENCE);
        assert!(SIGNING_PUB_KEY < TXN_SIGNATURE);
        assert!(ACCOUNT < MEMOS);
        assert!(MEMOS < TRANSACTION_RESULT);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(FieldId::lookup(9, 1), Err(CoreError::UnknownTypeCode(9)));
        assert_eq!(
            FieldId::lookup(2, 250),
            Err(CoreError::UnknownFieldCode {
                type_code: 2,
                field_code: 250
            })
        );
    }
}
